// F5OS session and request executor
//
// A `Session` owns the token obtained at login, the shared HTTP client and
// the detected platform. Every RESTCONF call goes through `execute`, which
// applies the status policy: 2xx and 404 hand back the raw body, other
// failing statuses become `Error::Api` from the first envelope entry.

use std::borrow::Cow;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderValue, USER_AGENT};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{Instrument, Span, debug, info, info_span, trace};
use url::Url;

use crate::error::Error;
use crate::models::RestconfErrorEnvelope;
use crate::platform::{self, PlatformType};
use crate::transport::{DEFAULT_TIMEOUT, TransportConfig, normalize_host};

/// Prefix of every data resource.
pub const URI_ROOT: &str = "/restconf/data";

/// Media type sent on every request.
pub const YANG_DATA_JSON: &str = "application/yang-data+json";

pub(crate) const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

// ── Configuration ────────────────────────────────────────────────────

/// Everything needed to open a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Hostname, address or URL. `https://` is assumed without a scheme.
    pub host: String,
    pub username: String,
    pub password: SecretString,
    /// Applied when `host` has no port of its own.
    pub port: Option<u16>,
    pub transport: TransportConfig,
    /// Per-call timeout, applied to each HTTP request separately.
    pub timeout: Duration,
    /// Optional caller tag sent as `User-Agent`.
    pub user_agent: Option<String>,
    /// Feature telemetry opt-in, carried for callers.
    pub teem: bool,
}

impl SessionConfig {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<SecretString>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            port: None,
            transport: TransportConfig::default(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            teem: false,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

// ── Response ─────────────────────────────────────────────────────────

/// Status and raw body of a request that the executor let through.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    body: Bytes,
}

impl ApiResponse {
    pub(crate) fn new(status: StatusCode, body: Bytes) -> Self {
        Self { status, body }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The resource addressed by the request does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice(&self.body).map_err(|e| {
            let text = self.text();
            let preview: String = text.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: text.into_owned(),
            }
        })
    }
}

/// Apply the status policy to a finished exchange.
pub(crate) fn classify_response(status: StatusCode, body: Bytes) -> Result<ApiResponse, Error> {
    if status.is_success() || status == StatusCode::NOT_FOUND {
        return Ok(ApiResponse::new(status, body));
    }

    if status.is_client_error() || status.is_server_error() {
        let first = RestconfErrorEnvelope::from_slice(&body)
            .and_then(|env| env.errors.error.into_iter().next())
            .and_then(|e| {
                let message = e.error_message?;
                Some((e.error_type, e.error_tag, e.error_path, message))
            });

        return Err(match first {
            Some((error_type, error_tag, error_path, message)) => Error::Api {
                status: status.as_u16(),
                error_type,
                error_tag,
                error_path,
                message,
            },
            None => Error::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            },
        });
    }

    Err(Error::UnexpectedStatus {
        status: status.as_u16(),
    })
}

// ── Session ──────────────────────────────────────────────────────────

/// An authenticated connection to one F5OS system.
///
/// The token and HTTP client are fixed at construction and shared by every
/// call. Nothing refreshes the token: when it expires, calls fail with a
/// 401-class error and the caller opens a new session.
pub struct Session {
    http: reqwest::Client,
    base_url: Url,
    token: SecretString,
    timeout: Duration,
    user_agent: Option<String>,
    teem: bool,
    platform: Option<PlatformType>,
    span: Span,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("platform", &self.platform)
            .field("teem", &self.teem)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Log in and classify the platform using a client built from
    /// `config.transport`.
    pub async fn connect(config: &SessionConfig) -> Result<Self, Error> {
        let http = config.transport.build_client()?;
        Self::connect_with_client(config, http).await
    }

    /// Log in and classify the platform over a caller-supplied client.
    pub async fn connect_with_client(
        config: &SessionConfig,
        http: reqwest::Client,
    ) -> Result<Self, Error> {
        let base_url = normalize_host(&config.host, config.port)?;
        let span = info_span!("f5os", host = %base_url.as_str().trim_end_matches('/'));

        async move {
            info!("session creation starts");
            let token = Self::login(&http, &base_url, config).await?;

            let mut session = Self {
                http,
                base_url,
                token,
                timeout: config.timeout,
                user_agent: config.user_agent.clone(),
                teem: config.teem,
                platform: None,
                span: Span::current(),
            };
            session.platform = platform::classify(&session).await;

            info!(platform = ?session.platform, "session creation success");
            Ok(session)
        }
        .instrument(span)
        .await
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Normalized base URL of the device.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Platform detected at login, `None` when classification failed.
    pub fn platform(&self) -> Option<PlatformType> {
        self.platform
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn teem(&self) -> bool {
        self.teem
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    pub(crate) fn span(&self) -> &Span {
        &self.span
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Absolute URL of a data resource: `{base}/restconf/data{path}`.
    pub fn data_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{URI_ROOT}{path}"))?)
    }

    // ── Request plumbing ─────────────────────────────────────────────

    pub(crate) fn token_header(&self) -> Result<HeaderValue, Error> {
        let mut value = HeaderValue::from_str(self.token.expose_secret()).map_err(|e| {
            Error::InvalidHeader {
                name: AUTH_TOKEN_HEADER,
                message: e.to_string(),
            }
        })?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Start a request carrying the token, timeout and caller tag.
    pub(crate) fn request(
        &self,
        method: Method,
        url: Url,
    ) -> Result<reqwest::RequestBuilder, Error> {
        let mut builder = self
            .http
            .request(method, url)
            .timeout(self.timeout)
            .header(AUTH_TOKEN_HEADER, self.token_header()?);
        if let Some(ua) = self.user_agent.as_deref() {
            builder = builder.header(USER_AGENT, ua);
        }
        Ok(builder)
    }

    /// Send one request and return the status and body, unclassified.
    pub(crate) async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&[u8]>,
    ) -> Result<(StatusCode, Bytes), Error> {
        match body.filter(|b| !b.is_empty()) {
            Some(b) => trace!(%method, %url, body = %String::from_utf8_lossy(b), "request"),
            None => trace!(%method, %url, "request"),
        }

        let mut builder = self
            .request(method, url)?
            .header(CONTENT_TYPE, YANG_DATA_JSON);
        if let Some(b) = body {
            builder = builder.body(b.to_vec());
        }

        let resp = builder.send().await?;
        let status = resp.status();
        debug!(status = status.as_u16(), "response");
        let bytes = resp.bytes().await?;
        Ok((status, bytes))
    }

    /// Send one request and apply the status policy.
    pub async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<&[u8]>,
    ) -> Result<ApiResponse, Error> {
        async move {
            let (status, bytes) = self.send(method, url, body).await?;
            classify_response(status, bytes)
        }
        .instrument(self.span.clone())
        .await
    }

    // ── Verb helpers ─────────────────────────────────────────────────

    /// `GET {root}{path}`.
    pub async fn get(&self, path: &str) -> Result<ApiResponse, Error> {
        let url = self.data_url(path)?;
        self.execute(Method::GET, url, None).await
    }

    /// `PUT {root}{path}`.
    pub async fn put(&self, path: &str, body: &[u8]) -> Result<ApiResponse, Error> {
        let url = self.data_url(path)?;
        self.execute(Method::PUT, url, Some(body)).await
    }

    /// `PATCH {root}{path}`.
    pub async fn patch(&self, path: &str, body: &[u8]) -> Result<ApiResponse, Error> {
        let url = self.data_url(path)?;
        self.execute(Method::PATCH, url, Some(body)).await
    }

    /// `POST {root}{path}`.
    pub async fn post(&self, path: &str, body: &[u8]) -> Result<ApiResponse, Error> {
        let url = self.data_url(path)?;
        self.execute(Method::POST, url, Some(body)).await
    }

    /// `DELETE {root}{path}`. The response body is only logged.
    pub async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.data_url(path)?;
        let resp = self.execute(Method::DELETE, url, None).await?;
        if !resp.body().is_empty() {
            trace!(path, response = %resp.text(), "delete response");
        }
        Ok(())
    }
}
