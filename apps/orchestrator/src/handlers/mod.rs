//! HTTP adapters: one module per wire surface named in the external
//! interfaces list.

pub mod action_result;
pub mod admin;
pub mod dispatch;
pub mod heartbeat;
pub mod metrics;
pub mod ota;
pub mod ws;
