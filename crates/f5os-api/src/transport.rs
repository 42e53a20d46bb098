// Transport configuration and host normalization.
//
// F5OS management endpoints present self-signed certificates, so every
// client built here accepts invalid certificates. Callers needing another
// posture pass their own `reqwest::Client` to `Session::connect_with_client`.

use std::time::Duration;

use url::Url;

use crate::error::Error;

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const DEFAULT_USER_AGENT: &str = concat!("f5os-api/", env!("CARGO_PKG_VERSION"));

/// Connection settings for the HTTP client a session owns.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// TCP connect timeout. The per-call timeout lives on `SessionConfig`.
    pub connect_timeout: Option<Duration>,
    /// How long idle pooled connections are kept.
    pub pool_idle_timeout: Option<Duration>,
    /// Maximum idle connections kept per host.
    pub pool_max_idle_per_host: Option<usize>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: None,
            pool_idle_timeout: Some(Duration::from_secs(90)),
            pool_max_idle_per_host: None,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .user_agent(DEFAULT_USER_AGENT)
            .pool_idle_timeout(self.pool_idle_timeout);

        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(max) = self.pool_max_idle_per_host {
            builder = builder.pool_max_idle_per_host(max);
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

/// Turn a configured host into the session base URL.
///
/// Hosts without a scheme get `https://`. An explicit `port` is applied
/// only when the host string does not already carry one.
pub fn normalize_host(host: &str, port: Option<u16>) -> Result<Url, Error> {
    let host = host.trim();
    let raw = if host.contains("://") {
        host.to_owned()
    } else {
        format!("https://{host}")
    };

    let mut url = Url::parse(&raw)?;

    if let Some(port) = port.filter(|p| *p != 0) {
        if !has_explicit_port(&raw) {
            url.set_port(Some(port))
                .map_err(|()| Error::InvalidUrl(url::ParseError::InvalidPort))?;
        }
    }

    Ok(url)
}

/// Whether the authority of `raw` spells out a port, default or not.
///
/// `Url::port()` hides default ports, so the check runs on the raw text.
fn has_explicit_port(raw: &str) -> bool {
    let rest = raw.split_once("://").map_or(raw, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);

    if let Some(after_bracket) = host_port.strip_prefix('[') {
        return after_bracket
            .split_once(']')
            .is_some_and(|(_, tail)| tail.starts_with(':'));
    }
    host_port.contains(':')
}

/// Encode a list-key value for use inside a RESTCONF path segment.
///
/// Everything outside the unreserved set is escaped, so `/`, `#`, `?`, `,`
/// and spaces in a key stay inside the segment.
pub(crate) fn key_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_https() {
        let url = normalize_host("10.1.1.5", None).unwrap();
        assert_eq!(url.as_str(), "https://10.1.1.5/");
    }

    #[test]
    fn existing_scheme_is_preserved() {
        let url = normalize_host("http://f5os.lab", None).unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host_str(), Some("f5os.lab"));
    }

    #[test]
    fn port_applied_once_when_missing() {
        let url = normalize_host("10.1.1.5", Some(8888)).unwrap();
        assert_eq!(url.as_str(), "https://10.1.1.5:8888/");
        assert_eq!(url.as_str().matches(":8888").count(), 1);
    }

    #[test]
    fn explicit_port_wins_over_argument() {
        let url = normalize_host("https://10.1.1.5:443", Some(8888)).unwrap();
        assert_eq!(url.port_or_known_default(), Some(443));

        let url = normalize_host("10.1.1.5:9443", Some(8888)).unwrap();
        assert_eq!(url.port(), Some(9443));
    }

    #[test]
    fn zero_port_means_unset() {
        let url = normalize_host("10.1.1.5", Some(0)).unwrap();
        assert_eq!(url.port(), None);
    }

    #[test]
    fn ipv6_port_detection() {
        assert!(!has_explicit_port("https://[2001:db8::1]"));
        assert!(has_explicit_port("https://[2001:db8::1]:8888"));
        let url = normalize_host("[2001:db8::1]", Some(8888)).unwrap();
        assert_eq!(url.port(), Some(8888));
    }

    #[test]
    fn credentials_in_authority_are_not_a_port() {
        assert!(!has_explicit_port("https://admin:pw@f5os.lab/"));
        assert!(has_explicit_port("https://admin:pw@f5os.lab:8443/"));
    }

    #[test]
    fn hostname_starting_with_http_gets_https() {
        let url = normalize_host("httpd01.lab", None).unwrap();
        assert_eq!(url.as_str(), "https://httpd01.lab/");

        let url = normalize_host("https-gw.lab", Some(8888)).unwrap();
        assert_eq!(url.as_str(), "https://https-gw.lab:8888/");
    }

    #[test]
    fn key_segment_escapes_slashes() {
        assert_eq!(key_segment("1.0"), "1.0");
        assert_eq!(key_segment("1/1.0"), "1%2F1.0");
    }

    #[test]
    fn key_segment_escapes_url_delimiters() {
        assert_eq!(key_segment("lag#1"), "lag%231");
        assert_eq!(key_segment("a?b"), "a%3Fb");
        assert_eq!(key_segment("x,y z"), "x%2Cy%20z");
        assert_eq!(key_segment("50%"), "50%25");
    }
}
