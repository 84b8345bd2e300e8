pub mod client;
pub mod errors;
pub mod locks;
pub mod repositories;

pub use client::DbPool;
pub use errors::DbError;
pub use repositories::*;
