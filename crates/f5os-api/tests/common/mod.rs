// Shared wiremock fixtures for the f5os-api integration tests.
#![allow(dead_code, clippy::unwrap_used)]

use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use f5os_api::{Session, SessionConfig};

pub const TOKEN: &str = "test-token";
pub const LOGIN_PATH: &str = "/restconf/data/openconfig-system:system/aaa";
pub const PLATFORM_PATH: &str =
    "/restconf/data/openconfig-platform:components/component=platform/state/description";
pub const VLANS_PATH: &str = "/restconf/data/openconfig-vlan:vlans";

pub fn config(server: &MockServer) -> SessionConfig {
    SessionConfig::new(
        server.uri(),
        "admin",
        SecretString::from("secret".to_string()),
    )
}

pub async fn mount_login(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).insert_header("X-Auth-Token", TOKEN))
        .mount(server)
        .await;
}

/// Log in against the mock. Platform checks fall through to wiremock's
/// default 404, so the platform stays unset.
pub async fn connect(server: &MockServer) -> Session {
    mount_login(server).await;
    Session::connect(&config(server)).await.unwrap()
}

pub fn restconf_error(message: &str) -> Value {
    json!({
        "ietf-restconf:errors": {
            "error": [{
                "error-type": "application",
                "error-tag": "invalid-value",
                "error-path": "/restconf/data",
                "error-message": message
            }]
        }
    })
}

/// Requests received after login and platform classification.
pub async fn operational_requests(server: &MockServer) -> Vec<(String, String)> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| {
            let p = r.url.path();
            p != LOGIN_PATH && p != PLATFORM_PATH && p != VLANS_PATH
        })
        .map(describe)
        .collect()
}

fn describe(req: &Request) -> (String, String) {
    (req.method.to_string(), req.url.path().to_owned())
}
