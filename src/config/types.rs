//! Core configuration types and loading.

use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use ticket_proto::{CategoryId, RoleId};

use super::autoclaim::AutoClaimRule;
use super::defaults::*;
use crate::state::ClaimPolicy;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Daemon configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Listener and HTTP settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Ticket lifecycle settings.
    #[serde(default)]
    pub tickets: TicketsConfig,
    /// Role ids granting staff and override capability.
    pub roles: RolesConfig,
    /// Auto-claim rules keyed by category id.
    #[serde(default)]
    pub autoclaim: HashMap<CategoryId, AutoClaimRule>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the platform bridge connects to (default: 127.0.0.1:7070).
    #[serde(default = "default_bridge_listen")]
    pub bridge_listen: SocketAddr,
    /// Keepalive and Prometheus HTTP port (default: 3000, 0 disables).
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// How long to wait for the bridge to answer an outbound call.
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: u64,
}

impl ServerConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bridge_listen: default_bridge_listen(),
            http_port: default_http_port(),
            call_timeout_ms: default_call_timeout_ms(),
        }
    }
}

/// Ticket lifecycle configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketsConfig {
    /// Category new ticket channels must be created in. Unset accepts any.
    #[serde(default)]
    pub category: Option<CategoryId>,
    /// Category closed tickets are moved to. Unset leaves them in place.
    #[serde(default)]
    pub archive_category: Option<CategoryId>,
    /// Channel name prefix that marks a ticket channel (default: "ticket-").
    #[serde(default = "default_name_prefix")]
    pub name_prefix: String,
    /// First number issued when no counter record exists (default: 4176).
    #[serde(default = "default_start_number")]
    pub start_number: u64,
    /// Path of the JSON counter record.
    #[serde(default = "default_counter_path")]
    pub counter_path: String,
    /// Seconds between close and channel deletion (default: 86400, 0 keeps
    /// archived channels forever).
    #[serde(default = "default_delete_after_secs")]
    pub delete_after_secs: u64,
    /// Per-ticket actor mailbox capacity (default: 64).
    #[serde(default = "default_mailbox_capacity")]
    pub mailbox_capacity: usize,
    /// Claim arbitration policy.
    #[serde(default)]
    pub policy: ClaimPolicy,
}

impl TicketsConfig {
    /// Delay before a closed ticket's channel is removed, if removal is on.
    pub fn delete_after(&self) -> Option<Duration> {
        (self.delete_after_secs > 0).then(|| Duration::from_secs(self.delete_after_secs))
    }
}

impl Default for TicketsConfig {
    fn default() -> Self {
        Self {
            category: None,
            archive_category: None,
            name_prefix: default_name_prefix(),
            start_number: default_start_number(),
            counter_path: default_counter_path(),
            delete_after_secs: default_delete_after_secs(),
            mailbox_capacity: default_mailbox_capacity(),
            policy: ClaimPolicy::default(),
        }
    }
}

/// Capability role configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RolesConfig {
    /// Roles whose holders are staff.
    #[serde(default)]
    pub staff: Vec<RoleId>,
    /// Roles whose holders may release other staff members' claims.
    /// Holders are also treated as staff.
    #[serde(default, rename = "override")]
    pub override_roles: Vec<RoleId>,
}
