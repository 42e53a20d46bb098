// Session authentication
//
// F5OS issues a token in the `X-Auth-Token` header of a basic-auth GET
// against the AAA subtree. The token then replaces credentials on every
// later request. There is no logout endpoint.

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::session::{AUTH_TOKEN_HEADER, Session, SessionConfig, URI_ROOT, YANG_DATA_JSON};

/// Login resource, relative to the data root.
pub const URI_LOGIN: &str = "/openconfig-system:system/aaa";

impl Session {
    /// Authenticate with username/password and return the issued token.
    ///
    /// A 401 fails with the status line and body. Any other status is
    /// accepted; a response without the token header yields an empty
    /// token, which the device rejects on the first authenticated call.
    pub(crate) async fn login(
        http: &reqwest::Client,
        base_url: &Url,
        config: &SessionConfig,
    ) -> Result<SecretString, Error> {
        let base = base_url.as_str().trim_end_matches('/');
        let url = Url::parse(&format!("{base}{URI_ROOT}{URI_LOGIN}"))?;

        debug!(%url, "logging in");

        let mut builder = http
            .get(url)
            .timeout(config.timeout)
            .header(CONTENT_TYPE, YANG_DATA_JSON)
            .basic_auth(&config.username, Some(config.password.expose_secret()));
        if let Some(ua) = config.user_agent.as_deref() {
            builder = builder.header(reqwest::header::USER_AGENT, ua);
        }

        let resp = builder.send().await?;
        let status = resp.status();

        let token = resp
            .headers()
            .get(AUTH_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();

        let body = resp.text().await;
        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: format!("{status} with error: {}", body.unwrap_or_default()),
            });
        }
        body?;

        if token.is_empty() {
            warn!(status = status.as_u16(), "login response carried no auth token");
        } else {
            debug!("login successful");
        }
        Ok(SecretString::from(token))
    }
}
