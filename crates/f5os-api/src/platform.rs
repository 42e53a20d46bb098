// Platform classification
//
// F5OS has no endpoint that names the platform. It is inferred from which
// subtrees answer: rSeries exposes a platform component description,
// Velos partitions expose VLANs, and Velos controllers reject the VLAN
// path with a specific "keypath not found" message.

use std::fmt;

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::RestconfErrorEnvelope;
use crate::session::Session;

/// Checked first; answers only on rSeries appliances.
pub const URI_PLATFORM_TYPE: &str =
    "/openconfig-platform:components/component=platform/state/description";

/// Checked second; answers on Velos partitions.
pub const URI_VLANS: &str = "/openconfig-vlan:vlans";

/// Device personality detected at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformType {
    #[serde(rename = "rSeries Platform")]
    RSeries,
    #[serde(rename = "Velos Partition")]
    VelosPartition,
    #[serde(rename = "Velos Controller")]
    VelosController,
}

impl PlatformType {
    /// Label F5 tooling uses for the platform.
    pub fn label(self) -> &'static str {
        match self {
            Self::RSeries => "rSeries Platform",
            Self::VelosPartition => "Velos Partition",
            Self::VelosController => "Velos Controller",
        }
    }
}

impl fmt::Display for PlatformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Run the check cascade. Failed checks are logged and yield `None`.
pub(crate) async fn classify(session: &Session) -> Option<PlatformType> {
    let url = session.data_url(URI_PLATFORM_TYPE).ok()?;
    let status = match session.send(Method::GET, url, None).await {
        Ok((status, _)) => status,
        Err(e) => {
            debug!(error = %e, "platform check failed");
            return None;
        }
    };

    match status {
        StatusCode::OK => return Some(PlatformType::RSeries),
        StatusCode::NOT_FOUND => {}
        other => {
            debug!(status = other.as_u16(), "platform check inconclusive");
            return None;
        }
    }

    let url = session.data_url(URI_VLANS).ok()?;
    let (status, body) = match session.send(Method::GET, url, None).await {
        Ok(exchange) => exchange,
        Err(e) => {
            debug!(error = %e, "vlan check failed");
            return None;
        }
    };

    classify_vlan_check(status, &body)
}

/// Decide the Velos personality from the VLAN check's outcome.
fn classify_vlan_check(status: StatusCode, body: &[u8]) -> Option<PlatformType> {
    match status {
        StatusCode::OK | StatusCode::NO_CONTENT => Some(PlatformType::VelosPartition),
        StatusCode::NOT_FOUND => {
            let envelope = RestconfErrorEnvelope::from_slice(body)?;
            if envelope.errors.is_keypath_not_found() {
                Some(PlatformType::VelosController)
            } else {
                debug!(errors = ?envelope.errors, "vlan check error not recognized");
                None
            }
        }
        other => {
            debug!(status = other.as_u16(), "vlan check inconclusive");
            None
        }
    }
}
