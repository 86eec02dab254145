//! Handler plumbing: the shared context, the handler trait and dispatch.

pub mod context;
pub mod registry;

pub use context::{Context, EventHandler, TicketPattern};
pub use registry::Router;
