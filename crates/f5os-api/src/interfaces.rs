// Interface reads and switched-VLAN reconciliation
//
// The interfaces PATCH only ever adds trunk VLANs and refuses to replace a
// native VLAN in place. An update therefore removes what the new
// configuration drops before applying it:
//
//   1. GET the interface's switched-vlan subtree
//   2. DELETE the native VLAN leaf if it changes, and each trunk VLAN
//      leaf that is no longer requested
//   3. PATCH the interfaces collection with the new configuration
//
// The sequence is not transactional. A failure after step 2 began leaves
// the removals in place and is reported as `Error::PartialUpdate`.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::error::Error;
use crate::models::{InterfaceResponse, InterfacesRequest, SwitchedVlanResponse};
use crate::session::{ApiResponse, Session};
use crate::transport::key_segment;

/// Interfaces collection, relative to the data root.
pub const URI_INTERFACES: &str = "/openconfig-interfaces:interfaces";

fn interface_path(name: &str) -> String {
    format!("{URI_INTERFACES}/interface={}", key_segment(name))
}

fn switched_vlan_path(name: &str) -> String {
    format!(
        "{}/openconfig-if-ethernet:ethernet/openconfig-vlan:switched-vlan",
        interface_path(name)
    )
}

fn native_vlan_path(name: &str) -> String {
    format!(
        "{}/openconfig-vlan:config/openconfig-vlan:native-vlan",
        switched_vlan_path(name)
    )
}

fn trunk_vlan_path(name: &str, vlan: u16) -> String {
    format!(
        "{}/openconfig-vlan:config/openconfig-vlan:trunk-vlans={vlan}",
        switched_vlan_path(name)
    )
}

// ── Planning ─────────────────────────────────────────────────────────

/// Switched-VLAN state of one interface as read from the device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwitchedVlanSnapshot {
    /// `0` when no native VLAN is configured.
    pub native_vlan: u16,
    pub trunk_vlans: BTreeSet<u16>,
}

impl From<&SwitchedVlanResponse> for SwitchedVlanSnapshot {
    fn from(resp: &SwitchedVlanResponse) -> Self {
        resp.switched_vlan
            .as_ref()
            .map(|sv| Self {
                native_vlan: sv.config.native_vlan.unwrap_or(0),
                trunk_vlans: sv.config.trunk_vlans.iter().copied().collect(),
            })
            .unwrap_or_default()
    }
}

/// A leaf that must be deleted before the new configuration is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VlanRemoval {
    NativeVlan,
    TrunkVlan(u16),
}

/// Trunk VLANs present in `current` but absent from `requested`.
pub fn trunk_vlan_difference(
    current: impl IntoIterator<Item = u16>,
    requested: impl IntoIterator<Item = u16>,
) -> BTreeSet<u16> {
    let requested: BTreeSet<u16> = requested.into_iter().collect();
    current
        .into_iter()
        .filter(|vlan| !requested.contains(vlan))
        .collect()
}

/// Deletions needed before `request` can be applied over `snapshot`.
///
/// Each request entry is planned against the same snapshot. A removal
/// planned by an earlier entry is not repeated. Trunk removals come in
/// ascending VLAN order.
pub fn plan_vlan_removals(
    snapshot: &SwitchedVlanSnapshot,
    request: &InterfacesRequest,
) -> Vec<VlanRemoval> {
    let mut plan = Vec::new();

    for entry in &request.interfaces.interface {
        let mut wanted = Vec::new();
        if snapshot.native_vlan != 0 && entry.native_vlan() != snapshot.native_vlan {
            wanted.push(VlanRemoval::NativeVlan);
        }
        wanted.extend(
            trunk_vlan_difference(
                snapshot.trunk_vlans.iter().copied(),
                entry.trunk_vlans().iter().copied(),
            )
            .into_iter()
            .map(VlanRemoval::TrunkVlan),
        );

        for removal in wanted {
            if !plan.contains(&removal) {
                plan.push(removal);
            }
        }
    }

    plan
}

// ── Outcome ──────────────────────────────────────────────────────────

/// A mutation performed while updating an interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ReconcileStep {
    RemovedNativeVlan { interface: String },
    RemovedTrunkVlan { interface: String, vlan: u16 },
    Applied,
}

impl ReconcileStep {
    fn removal(interface: &str, removal: VlanRemoval) -> Self {
        match removal {
            VlanRemoval::NativeVlan => Self::RemovedNativeVlan {
                interface: interface.to_owned(),
            },
            VlanRemoval::TrunkVlan(vlan) => Self::RemovedTrunkVlan {
                interface: interface.to_owned(),
                vlan,
            },
        }
    }
}

/// Result of a completed interface update.
#[derive(Debug, Clone)]
pub struct InterfaceUpdate {
    /// Every mutation, in the order issued. Ends with `Applied`.
    pub steps: Vec<ReconcileStep>,
    /// Response to the final PATCH.
    pub response: ApiResponse,
}

fn abort(completed: Vec<ReconcileStep>, source: Error) -> Error {
    if completed.is_empty() {
        source
    } else {
        Error::PartialUpdate {
            completed,
            source: Box::new(source),
        }
    }
}

// ── Session operations ───────────────────────────────────────────────

impl Session {
    /// Fetch one interface.
    ///
    /// `GET /openconfig-interfaces:interfaces/interface={name}`
    ///
    /// A missing interface yields an empty list.
    pub async fn get_interface(&self, name: &str) -> Result<InterfaceResponse, Error> {
        let resp = self.get(&interface_path(name)).await?;
        if resp.is_not_found() || resp.body().is_empty() {
            debug!(interface = name, "interface not found");
            return Ok(InterfaceResponse::default());
        }
        resp.json()
    }

    /// Read the current switched-VLAN state of an interface.
    ///
    /// A missing subtree reads as no native VLAN and no trunks.
    pub async fn switched_vlans(&self, name: &str) -> Result<SwitchedVlanSnapshot, Error> {
        let resp = self.get(&switched_vlan_path(name)).await?;
        if resp.is_not_found() || resp.body().is_empty() {
            return Ok(SwitchedVlanSnapshot::default());
        }
        let decoded: SwitchedVlanResponse = resp.json()?;
        let snapshot = SwitchedVlanSnapshot::from(&decoded);
        debug!(interface = name, ?snapshot, "current switched vlans");
        Ok(snapshot)
    }

    /// Delete the native VLAN of an interface.
    pub async fn remove_native_vlan(&self, name: &str) -> Result<(), Error> {
        self.delete(&native_vlan_path(name)).await
    }

    /// Delete one trunk VLAN of an interface.
    pub async fn remove_trunk_vlan(&self, name: &str, vlan: u16) -> Result<(), Error> {
        self.delete(&trunk_vlan_path(name, vlan)).await
    }

    /// Reconcile the switched VLANs of `name`, then PATCH `request`.
    ///
    /// Stops at the first failure. Nothing is mutated when the current
    /// state cannot be read. A failure after a removal has been applied
    /// is wrapped in `Error::PartialUpdate` listing what was done.
    pub async fn update_interface(
        &self,
        name: &str,
        request: &InterfacesRequest,
    ) -> Result<InterfaceUpdate, Error> {
        let snapshot = self.switched_vlans(name).await?;
        let plan = plan_vlan_removals(&snapshot, request);
        let body = serde_json::to_vec(request)?;

        debug!(interface = name, removals = plan.len(), "updating interface");

        let mut steps = Vec::with_capacity(plan.len() + 1);
        for removal in plan {
            let result = match removal {
                VlanRemoval::NativeVlan => self.remove_native_vlan(name).await,
                VlanRemoval::TrunkVlan(vlan) => self.remove_trunk_vlan(name, vlan).await,
            };
            if let Err(e) = result {
                return Err(abort(steps, e));
            }
            steps.push(ReconcileStep::removal(name, removal));
        }

        let response = match self.patch(URI_INTERFACES, &body).await {
            Ok(resp) => resp,
            Err(e) => return Err(abort(steps, e)),
        };
        steps.push(ReconcileStep::Applied);

        debug!(interface = name, response = %response.text(), "interface updated");
        Ok(InterfaceUpdate { steps, response })
    }
}
