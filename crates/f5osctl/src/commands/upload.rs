use f5os_api::Session;

use crate::cli::UploadArgs;
use crate::error::CliError;

use super::util;

pub async fn handle(
    session: &Session,
    args: UploadArgs,
    on_err: &impl Fn(f5os_api::Error) -> CliError,
) -> Result<(), CliError> {
    let body = tokio::fs::read(&args.file)
        .await
        .map_err(|source| CliError::Io {
            path: args.file.display().to_string(),
            source,
        })?;

    let resp = session
        .upload(&args.path, body, &args.upload_id, &args.content_type)
        .await
        .map_err(on_err)?;

    if !resp.status().is_success() {
        return Err(CliError::Api {
            status: resp.status().as_u16(),
            message: resp.text().into_owned(),
        });
    }
    util::print_body(resp.body())
}
