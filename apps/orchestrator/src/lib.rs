//! Crate root: establishes the module tree shared between the library
//! and the `main` binary.

pub mod config;
pub mod error;
pub mod state;

pub mod handlers;
pub mod kernel;
pub mod routes;

pub mod middleware;
pub mod services;

pub mod prelude {
    pub use crate::config::Config;
    pub use crate::kernel::OrchestratorKernel;
    pub use crate::state::{AppState, SystemMode};
}
