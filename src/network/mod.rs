//! Network module.
//!
//! Contains the Gateway (TCP listener), the per-adapter Connection and the
//! bridge-backed [`Platform`](crate::services::Platform).

mod bridge;
mod connection;
mod gateway;

pub use bridge::{Attachment, BridgePlatform};
pub use connection::Connection;
pub use gateway::Gateway;
