//! Shared domain types for the fleet device control plane.
//!
//! Entities mirror `SPEC_FULL.md` §3 verbatim: devices and their derived
//! last-status projection, append-only heartbeats, the partition catalog,
//! command dispatch and bulk execution, alert state, and OTA builds.
//! Nothing here touches I/O; persistence lives in `mdm-db`.

pub mod alert;
pub mod device;
pub mod dispatch;
pub mod event;
pub mod heartbeat;
pub mod ota;
pub mod partition;

pub use alert::{AlertCondition, AlertNotification, AlertPhase, AlertRollup, AlertState, AlertTransition};
pub use device::{Device, DeviceEnrollment, LastStatus, ServiceUp};
pub use dispatch::{
    ActionResultPayload, AckStatus, BulkDispatchRequest, BulkExecution, BulkMode, BulkStatus,
    BulkTarget, CommandDispatch, DispatchAction, DispatchResult, SingleCommandRequest,
};
pub use event::DeviceEvent;
pub use heartbeat::{AppVersionInfo, DedupeBucket, HeartbeatPayload, HeartbeatRecord};
pub use ota::{DeploymentStats, ManifestNotEligibleReason, ManifestQuery, OtaBuild, OtaManifest};
pub use partition::{DeviceSelectionSnapshot, PartitionCatalogEntry, PartitionState};
