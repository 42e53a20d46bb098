#![allow(clippy::unwrap_used)]
// Interface reads and switched-VLAN reconciliation call sequences.

mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use f5os_api::{Error, InterfacesRequest, ReconcileStep};

use common::{TOKEN, connect, operational_requests, restconf_error};

const INTERFACES: &str = "/restconf/data/openconfig-interfaces:interfaces";
const SWITCHED_VLAN: &str = "/restconf/data/openconfig-interfaces:interfaces/interface=1.0\
    /openconfig-if-ethernet:ethernet/openconfig-vlan:switched-vlan";

fn native_path() -> String {
    format!("{SWITCHED_VLAN}/openconfig-vlan:config/openconfig-vlan:native-vlan")
}

fn trunk_path(vlan: u16) -> String {
    format!("{SWITCHED_VLAN}/openconfig-vlan:config/openconfig-vlan:trunk-vlans={vlan}")
}

async fn mount_snapshot(server: &MockServer, native: u16, trunks: &[u16]) {
    Mock::given(method("GET"))
        .and(path(SWITCHED_VLAN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "openconfig-vlan:switched-vlan": {
                "config": { "native-vlan": native, "trunk-vlans": trunks }
            }
        })))
        .mount(server)
        .await;
}

async fn mount_delete(server: &MockServer, target: &str, status: u16, times: u64) {
    Mock::given(method("DELETE"))
        .and(path(target))
        .and(header("X-Auth-Token", TOKEN))
        .respond_with(ResponseTemplate::new(status))
        .expect(times)
        .mount(server)
        .await;
}

// ── Reconciliation ──────────────────────────────────────────────────

#[tokio::test]
async fn test_native_and_trunk_changes_are_reconciled() {
    let server = MockServer::start().await;
    let session = connect(&server).await;

    mount_snapshot(&server, 100, &[10, 20]).await;
    mount_delete(&server, &native_path(), 204, 1).await;
    mount_delete(&server, &trunk_path(10), 204, 1).await;
    mount_delete(&server, &trunk_path(20), 204, 0).await;
    mount_delete(&server, &trunk_path(30), 204, 0).await;

    let request = InterfacesRequest::switched_vlan("1.0", Some(200), vec![20, 30]);

    Mock::given(method("PATCH"))
        .and(path(INTERFACES))
        .and(body_json(&request))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let update = session.update_interface("1.0", &request).await.unwrap();

    assert_eq!(
        update.steps,
        vec![
            ReconcileStep::RemovedNativeVlan {
                interface: "1.0".into()
            },
            ReconcileStep::RemovedTrunkVlan {
                interface: "1.0".into(),
                vlan: 10
            },
            ReconcileStep::Applied,
        ]
    );
    assert_eq!(update.response.body(), b"{}");

    assert_eq!(
        operational_requests(&server).await,
        vec![
            ("GET".to_string(), SWITCHED_VLAN.to_string()),
            ("DELETE".to_string(), native_path()),
            ("DELETE".to_string(), trunk_path(10)),
            ("PATCH".to_string(), INTERFACES.to_string()),
        ]
    );
}

#[tokio::test]
async fn test_unconfigured_interface_is_pure_apply() {
    let server = MockServer::start().await;
    let session = connect(&server).await;

    // No switched-vlan mock: the subtree answers 404.
    let request = InterfacesRequest::switched_vlan("1.0", Some(5), vec![1, 2]);

    Mock::given(method("PATCH"))
        .and(path(INTERFACES))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let update = session.update_interface("1.0", &request).await.unwrap();

    assert_eq!(update.steps, vec![ReconcileStep::Applied]);
    let methods: Vec<String> = operational_requests(&server)
        .await
        .into_iter()
        .map(|(m, _)| m)
        .collect();
    assert_eq!(methods, vec!["GET", "PATCH"]);
}

#[tokio::test]
async fn test_unreadable_state_attempts_nothing() {
    let server = MockServer::start().await;
    let session = connect(&server).await;

    Mock::given(method("GET"))
        .and(path(SWITCHED_VLAN))
        .respond_with(ResponseTemplate::new(500).set_body_json(restconf_error("backend down")))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let request = InterfacesRequest::switched_vlan("1.0", Some(200), vec![]);
    let err = session.update_interface("1.0", &request).await.unwrap_err();

    match err {
        Error::Api { message, .. } => assert_eq!(message, "backend down"),
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_delete_reports_completed_steps() {
    let server = MockServer::start().await;
    let session = connect(&server).await;

    mount_snapshot(&server, 100, &[10, 20]).await;
    mount_delete(&server, &native_path(), 204, 1).await;

    Mock::given(method("DELETE"))
        .and(path(trunk_path(10)))
        .respond_with(ResponseTemplate::new(400).set_body_json(restconf_error("vlan in use")))
        .expect(1)
        .mount(&server)
        .await;
    mount_delete(&server, &trunk_path(20), 204, 0).await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let request = InterfacesRequest::switched_vlan("1.0", Some(200), vec![]);
    let err = session.update_interface("1.0", &request).await.unwrap_err();

    match err {
        Error::PartialUpdate { completed, source } => {
            assert_eq!(
                completed,
                vec![ReconcileStep::RemovedNativeVlan {
                    interface: "1.0".into()
                }]
            );
            assert_eq!(source.status(), Some(400));
        }
        other => panic!("expected PartialUpdate, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_apply_after_removals_is_partial() {
    let server = MockServer::start().await;
    let session = connect(&server).await;

    mount_snapshot(&server, 0, &[10]).await;
    mount_delete(&server, &trunk_path(10), 204, 1).await;
    Mock::given(method("PATCH"))
        .and(path(INTERFACES))
        .respond_with(ResponseTemplate::new(400).set_body_json(restconf_error("invalid vlan")))
        .mount(&server)
        .await;

    let request = InterfacesRequest::switched_vlan("1.0", None, vec![4095]);
    let err = session.update_interface("1.0", &request).await.unwrap_err();

    assert!(
        matches!(&err, Error::PartialUpdate { completed, .. } if completed.len() == 1),
        "{err:?}"
    );
}

#[tokio::test]
async fn test_trunk_range_in_snapshot_is_reconciled_per_id() {
    let server = MockServer::start().await;
    let session = connect(&server).await;

    Mock::given(method("GET"))
        .and(path(SWITCHED_VLAN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "openconfig-vlan:switched-vlan": {
                "config": { "trunk-vlans": ["10..12"] }
            }
        })))
        .mount(&server)
        .await;
    mount_delete(&server, &trunk_path(10), 204, 1).await;
    mount_delete(&server, &trunk_path(11), 204, 0).await;
    mount_delete(&server, &trunk_path(12), 204, 1).await;
    Mock::given(method("PATCH"))
        .and(path(INTERFACES))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let request = InterfacesRequest::switched_vlan("1.0", None, vec![11]);
    let update = session.update_interface("1.0", &request).await.unwrap();

    assert_eq!(update.steps.len(), 3);
    assert_eq!(update.steps.last(), Some(&ReconcileStep::Applied));
}

// ── Interface reads ─────────────────────────────────────────────────

#[tokio::test]
async fn test_get_interface_decodes_entry() {
    let server = MockServer::start().await;
    let session = connect(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("{INTERFACES}/interface=1.0")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "openconfig-interfaces:interface": [{
                "name": "1.0",
                "config": { "name": "1.0", "enabled": true },
                "openconfig-if-ethernet:ethernet": {
                    "openconfig-vlan:switched-vlan": {
                        "config": { "native-vlan": 100, "trunk-vlans": [10, 20] }
                    }
                }
            }]
        })))
        .mount(&server)
        .await;

    let resp = session.get_interface("1.0").await.unwrap();

    assert_eq!(resp.interface.len(), 1);
    assert_eq!(resp.interface[0].native_vlan(), 100);
    assert_eq!(resp.interface[0].trunk_vlans(), &[10, 20]);
    assert_eq!(resp.interface[0].extra["config"]["enabled"], json!(true));
}

#[tokio::test]
async fn test_get_missing_interface_is_empty() {
    let server = MockServer::start().await;
    let session = connect(&server).await;

    let resp = session.get_interface("9.0").await.unwrap();
    assert!(resp.interface.is_empty());
}

#[tokio::test]
async fn test_velos_interface_name_is_escaped() {
    let server = MockServer::start().await;
    let session = connect(&server).await;

    Mock::given(method("DELETE"))
        .and(path(
            "/restconf/data/openconfig-interfaces:interfaces/interface=1%2F1.0\
             /openconfig-if-ethernet:ethernet/openconfig-vlan:switched-vlan\
             /openconfig-vlan:config/openconfig-vlan:native-vlan",
        ))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    session.remove_native_vlan("1/1.0").await.unwrap();
}

#[tokio::test]
async fn test_fragment_character_in_name_stays_in_key() {
    let server = MockServer::start().await;
    let session = connect(&server).await;

    Mock::given(method("DELETE"))
        .and(path(
            "/restconf/data/openconfig-interfaces:interfaces/interface=lag%231\
             /openconfig-if-ethernet:ethernet/openconfig-vlan:switched-vlan\
             /openconfig-vlan:config/openconfig-vlan:native-vlan",
        ))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    session.remove_native_vlan("lag#1").await.unwrap();

    assert_eq!(
        operational_requests(&server).await,
        vec![(
            "DELETE".to_string(),
            "/restconf/data/openconfig-interfaces:interfaces/interface=lag%231\
             /openconfig-if-ethernet:ethernet/openconfig-vlan:switched-vlan\
             /openconfig-vlan:config/openconfig-vlan:native-vlan"
                .to_string(),
        )]
    );
}
