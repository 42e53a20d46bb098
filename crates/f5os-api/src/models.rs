// F5OS RESTCONF payload types
//
// OpenConfig documents exchanged with the device. Only the members the
// client reads are typed; everything else is preserved in flattened `extra`
// maps so a fetched document can be sent back without losing fields.

use std::collections::HashMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Message F5OS returns when a path names a subtree the platform lacks.
pub const KEYPATH_NOT_FOUND: &str = "uri keypath not found";

// ── Error envelope ───────────────────────────────────────────────────

/// The `ietf-restconf:errors` envelope returned with failing statuses.
///
/// ```json
/// { "ietf-restconf:errors": { "error": [
///     { "error-type": "application", "error-tag": "invalid-value",
///       "error-path": "/...", "error-message": "uri keypath not found" } ] } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestconfErrorEnvelope {
    #[serde(rename = "ietf-restconf:errors", default)]
    pub errors: RestconfErrors,
}

impl RestconfErrorEnvelope {
    /// Decode an envelope from a response body. Returns `None` when the
    /// body is not JSON or lacks the envelope.
    pub fn from_slice(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestconfErrors {
    #[serde(default)]
    pub error: Vec<RestconfError>,
}

impl RestconfErrors {
    /// The only entry surfaced to callers.
    pub fn first(&self) -> Option<&RestconfError> {
        self.error.first()
    }

    /// Whether the first entry reports a missing keypath.
    ///
    /// Platform classification depends on this exact wording.
    pub fn is_keypath_not_found(&self) -> bool {
        self.first()
            .and_then(|e| e.error_message.as_deref())
            .is_some_and(|msg| msg == KEYPATH_NOT_FOUND)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestconfError {
    #[serde(rename = "error-type", default)]
    pub error_type: Option<String>,
    #[serde(rename = "error-tag", default)]
    pub error_tag: Option<String>,
    #[serde(rename = "error-path", default)]
    pub error_path: Option<String>,
    #[serde(rename = "error-message", default)]
    pub error_message: Option<String>,
}

// ── Interfaces ───────────────────────────────────────────────────────

/// Body for `PATCH /openconfig-interfaces:interfaces`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfacesRequest {
    #[serde(rename = "openconfig-interfaces:interfaces")]
    pub interfaces: InterfaceList,
}

impl InterfacesRequest {
    /// A single-interface request carrying only switched-VLAN config.
    pub fn switched_vlan(name: &str, native_vlan: Option<u16>, trunk_vlans: Vec<u16>) -> Self {
        let mut extra = Map::new();
        extra.insert("config".into(), serde_json::json!({ "name": name }));
        Self {
            interfaces: InterfaceList {
                interface: vec![Interface {
                    name: name.to_owned(),
                    ethernet: Some(Ethernet {
                        switched_vlan: Some(SwitchedVlan {
                            config: SwitchedVlanConfig {
                                native_vlan,
                                trunk_vlans,
                                extra: Map::new(),
                            },
                            extra: Map::new(),
                        }),
                        extra: Map::new(),
                    }),
                    extra,
                }],
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfaceList {
    #[serde(default)]
    pub interface: Vec<Interface>,
}

/// Body of `GET /openconfig-interfaces:interfaces/interface={name}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfaceResponse {
    #[serde(rename = "openconfig-interfaces:interface", default)]
    pub interface: Vec<Interface>,
}

/// One entry of the OpenConfig interface list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,

    #[serde(
        rename = "openconfig-if-ethernet:ethernet",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub ethernet: Option<Ethernet>,

    /// `config`, `state`, aggregation and every other member.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Interface {
    fn switched_vlan_config(&self) -> Option<&SwitchedVlanConfig> {
        self.ethernet
            .as_ref()
            .and_then(|e| e.switched_vlan.as_ref())
            .map(|s| &s.config)
    }

    /// Requested native VLAN, `0` when unset.
    pub fn native_vlan(&self) -> u16 {
        self.switched_vlan_config()
            .and_then(|c| c.native_vlan)
            .unwrap_or(0)
    }

    /// Requested trunk VLANs, empty when unset.
    pub fn trunk_vlans(&self) -> &[u16] {
        self.switched_vlan_config()
            .map_or(&[], |c| c.trunk_vlans.as_slice())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ethernet {
    #[serde(
        rename = "openconfig-vlan:switched-vlan",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub switched_vlan: Option<SwitchedVlan>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwitchedVlan {
    #[serde(default)]
    pub config: SwitchedVlanConfig,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwitchedVlanConfig {
    #[serde(rename = "native-vlan", default, skip_serializing_if = "Option::is_none")]
    pub native_vlan: Option<u16>,

    /// Tagged VLAN ids. Range entries such as `"100..200"` decode to every
    /// id they cover and serialize back as single ids.
    #[serde(
        rename = "trunk-vlans",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "de_trunk_vlans"
    )]
    pub trunk_vlans: Vec<u16>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn de_trunk_vlans<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<u16>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Entry {
        Id(u16),
        Text(String),
    }

    let mut vlans = Vec::new();
    for entry in Vec::<Entry>::deserialize(de)? {
        match entry {
            Entry::Id(id) => vlans.push(id),
            Entry::Text(raw) => match raw.split_once("..") {
                Some((low, high)) => {
                    let low: u16 = low.trim().parse().map_err(D::Error::custom)?;
                    let high: u16 = high.trim().parse().map_err(D::Error::custom)?;
                    if low > high {
                        return Err(D::Error::custom(format!(
                            "invalid trunk vlan range {raw:?}"
                        )));
                    }
                    vlans.extend(low..=high);
                }
                None => vlans.push(raw.trim().parse().map_err(D::Error::custom)?),
            },
        }
    }
    Ok(vlans)
}

/// Body of `GET .../openconfig-vlan:switched-vlan` for one interface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwitchedVlanResponse {
    #[serde(rename = "openconfig-vlan:switched-vlan", default)]
    pub switched_vlan: Option<SwitchedVlan>,
}

// ── Upload ───────────────────────────────────────────────────────────

/// Upload progress document returned by the file transfer endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadStatus {
    #[serde(default)]
    pub remaining_byte_count: i64,
    #[serde(default)]
    pub used_chunks: HashMap<String, i64>,
    #[serde(default)]
    pub total_byte_count: i64,
    #[serde(default)]
    pub local_file_path: String,
    #[serde(default)]
    pub temporary_file_path: String,
    #[serde(default)]
    pub generation: i64,
    #[serde(default)]
    pub last_update_micros: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn keypath_predicate_matches_exact_wording_only() {
        let envelope: RestconfErrorEnvelope = serde_json::from_value(json!({
            "ietf-restconf:errors": { "error": [
                { "error-type": "application", "error-message": "uri keypath not found" },
                { "error-message": "something else" }
            ]}
        }))
        .unwrap();
        assert!(envelope.errors.is_keypath_not_found());

        let other: RestconfErrorEnvelope = serde_json::from_value(json!({
            "ietf-restconf:errors": { "error": [
                { "error-message": "URI keypath not found." }
            ]}
        }))
        .unwrap();
        assert!(!other.errors.is_keypath_not_found());
        assert!(!RestconfErrors::default().is_keypath_not_found());
    }

    #[test]
    fn envelope_without_errors_member_decodes_empty() {
        let envelope = RestconfErrorEnvelope::from_slice(br#"{"other": 1}"#).unwrap();
        assert!(envelope.errors.first().is_none());
        assert!(RestconfErrorEnvelope::from_slice(b"not json").is_none());
    }

    #[test]
    fn interface_keeps_unknown_members() {
        let raw = json!({
            "openconfig-interfaces:interfaces": { "interface": [{
                "name": "1.0",
                "config": { "name": "1.0", "enabled": true },
                "openconfig-if-ethernet:ethernet": {
                    "config": { "port-speed": "SPEED_100GB" },
                    "openconfig-vlan:switched-vlan": {
                        "config": { "native-vlan": 100, "trunk-vlans": [10, 20] }
                    }
                }
            }]}
        });
        let request: InterfacesRequest = serde_json::from_value(raw.clone()).unwrap();
        let intf = &request.interfaces.interface[0];
        assert_eq!(intf.native_vlan(), 100);
        assert_eq!(intf.trunk_vlans(), &[10, 20]);
        assert_eq!(serde_json::to_value(&request).unwrap(), raw);
    }

    #[test]
    fn missing_switched_vlan_reads_as_unset() {
        let intf = Interface {
            name: "2.0".into(),
            ..Interface::default()
        };
        assert_eq!(intf.native_vlan(), 0);
        assert!(intf.trunk_vlans().is_empty());
    }

    #[test]
    fn trunk_vlan_ranges_expand_to_ids() {
        let resp: SwitchedVlanResponse = serde_json::from_value(json!({
            "openconfig-vlan:switched-vlan": {
                "config": { "native-vlan": 1, "trunk-vlans": [10, "100..103", "7"] }
            }
        }))
        .unwrap();

        let config = resp.switched_vlan.unwrap().config;
        assert_eq!(config.trunk_vlans, vec![10, 100, 101, 102, 103, 7]);
        assert_eq!(config.native_vlan, Some(1));
    }

    #[test]
    fn reversed_trunk_vlan_range_is_rejected() {
        let result = serde_json::from_value::<SwitchedVlanConfig>(json!({
            "trunk-vlans": ["200..100"]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn switched_vlan_builder_shape() {
        let request = InterfacesRequest::switched_vlan("1.0", Some(200), vec![20, 30]);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "openconfig-interfaces:interfaces": { "interface": [{
                    "name": "1.0",
                    "config": { "name": "1.0" },
                    "openconfig-if-ethernet:ethernet": {
                        "openconfig-vlan:switched-vlan": {
                            "config": { "native-vlan": 200, "trunk-vlans": [20, 30] }
                        }
                    }
                }]}
            })
        );
    }

    #[test]
    fn upload_status_uses_camel_case() {
        let status: UploadStatus = serde_json::from_value(json!({
            "remainingByteCount": 0,
            "usedChunks": { "0": 1 },
            "totalByteCount": 1024,
            "localFilePath": "/tmp/img.iso",
            "temporaryFilePath": "/var/tmp/x",
            "generation": 2,
            "lastUpdateMicros": 17
        }))
        .unwrap();
        assert_eq!(status.total_byte_count, 1024);
        assert_eq!(status.used_chunks.get("0"), Some(&1));
    }
}
