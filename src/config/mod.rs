//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig, TicketsConfig, RolesConfig)
//! - [`autoclaim`]: Per-category auto-claim rules
//! - [`defaults`]: serde default functions
//! - [`validation`]: startup validation

mod autoclaim;
mod defaults;
mod types;
mod validation;

pub use autoclaim::AutoClaimRule;
pub use types::{Config, ConfigError, RolesConfig, ServerConfig, TicketsConfig};
pub use validation::{ValidationError, validate};
