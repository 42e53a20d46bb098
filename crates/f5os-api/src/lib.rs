// f5os-api: Async Rust client for the F5OS RESTCONF API (rSeries and Velos)

pub mod auth;
pub mod error;
pub mod interfaces;
pub mod models;
pub mod platform;
pub mod session;
pub mod transport;
pub mod upload;

pub use error::Error;
pub use interfaces::{
    InterfaceUpdate, ReconcileStep, SwitchedVlanSnapshot, URI_INTERFACES, VlanRemoval,
    plan_vlan_removals, trunk_vlan_difference,
};
pub use models::{
    InterfaceResponse, InterfacesRequest, KEYPATH_NOT_FOUND, RestconfError,
    RestconfErrorEnvelope, RestconfErrors, UploadStatus,
};
pub use platform::PlatformType;
pub use session::{ApiResponse, Session, SessionConfig, URI_ROOT, YANG_DATA_JSON};
pub use transport::{DEFAULT_TIMEOUT, TransportConfig, normalize_host};
