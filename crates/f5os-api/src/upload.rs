// File upload
//
// Image and file transfers use a single multipart POST. The caller builds
// the multipart body and names its boundary through `content_type`; the
// device reply is handed back untouched, whatever its status.

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::Method;
use tracing::{Instrument, debug};

use crate::error::Error;
use crate::session::{ApiResponse, Session};

pub const FILE_UPLOAD_ID_HEADER: &str = "File-Upload-Id";

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(value).map_err(|e| Error::InvalidHeader {
        name,
        message: e.to_string(),
    })
}

impl Session {
    /// POST a prepared multipart body to `{root}{path}`.
    ///
    /// Only transport failures are errors. Non-2xx replies are returned
    /// as-is so the caller can read the device's upload status.
    pub async fn upload(
        &self,
        path: &str,
        body: impl Into<reqwest::Body>,
        upload_id: &str,
        content_type: &str,
    ) -> Result<ApiResponse, Error> {
        let url = self.data_url(path)?;
        let upload_id = header_value(FILE_UPLOAD_ID_HEADER, upload_id)?;
        let content_type = header_value("Content-Type", content_type)?;
        let body = body.into();

        async move {
            debug!(%url, "uploading file");
            let resp = self
                .request(Method::POST, url)?
                .header(FILE_UPLOAD_ID_HEADER, upload_id)
                .header(CONTENT_TYPE, content_type)
                .body(body)
                .send()
                .await?;

            let status = resp.status();
            let bytes = resp.bytes().await?;
            debug!(status = status.as_u16(), "upload response");
            Ok(ApiResponse::new(status, bytes))
        }
        .instrument(self.span().clone())
        .await
    }
}
