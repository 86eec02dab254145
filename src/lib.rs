//! ticketd - support-ticket lifecycle daemon.
//!
//! Tracks tickets (one chat channel each) through
//! Unclaimed → Claimed ⇄ HelpRequested → Closed, arbitrates concurrent staff
//! actions per ticket, issues durable sequence numbers, and drives the chat
//! platform through a bridge adapter speaking newline-delimited JSON.

pub mod caps;
pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod metrics;
pub mod network;
pub mod services;
pub mod state;
pub mod telemetry;
