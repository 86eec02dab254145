//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

use std::net::SocketAddr;

// =============================================================================
// Server Defaults
// =============================================================================

pub fn default_bridge_listen() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 7070))
}

pub fn default_http_port() -> u16 {
    3000
}

pub fn default_call_timeout_ms() -> u64 {
    10_000
}

// =============================================================================
// Ticket Defaults
// =============================================================================

pub fn default_name_prefix() -> String {
    "ticket-".to_string()
}

pub fn default_start_number() -> u64 {
    4176
}

pub fn default_counter_path() -> String {
    "counter.json".to_string()
}

/// One day between close and channel removal.
pub fn default_delete_after_secs() -> u64 {
    86_400
}

pub fn default_mailbox_capacity() -> usize {
    64
}
