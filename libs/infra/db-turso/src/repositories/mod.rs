mod alert;
mod bulk;
mod device;
mod dispatch;
mod heartbeat;
mod ota;
mod partition;

pub use alert::{condition_str, AlertRepository};
pub use bulk::BulkRepository;
pub use device::DeviceRepository;
pub use dispatch::DispatchRepository;
pub use heartbeat::{AlertTickRow, HeartbeatOutcome, HeartbeatRepository};
pub use ota::{DeploymentStatColumn, OtaRepository};
pub use partition::{PartitionRepository, SnapshotRepository};
