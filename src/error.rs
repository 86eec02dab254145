//! Unified error handling for ticketd.
//!
//! This module provides the error hierarchy for the ticket core, with
//! metric labels and the actor-facing notice text for rejections.

use thiserror::Error;
use ticket_proto::UserId;

// ============================================================================
// Ticket Errors (state machine and arbitration)
// ============================================================================

/// Why an action on a ticket was refused.
///
/// These never alter committed state and are reported only to the actor who
/// triggered the action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TicketError {
    #[error("ticket already claimed by {claimant}")]
    AlreadyClaimed { claimant: UserId },

    #[error("only the claimant may do that")]
    NotClaimant,

    #[error("actor lacks staff capability")]
    Unauthorized,

    #[error("ticket is closed")]
    TicketClosed,

    #[error("no such ticket")]
    UnknownTicket,
}

impl TicketError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyClaimed { .. } => "already_claimed",
            Self::NotClaimant => "not_claimant",
            Self::Unauthorized => "unauthorized",
            Self::TicketClosed => "ticket_closed",
            Self::UnknownTicket => "unknown_ticket",
        }
    }

    /// Text shown to the acting user only.
    pub fn notice(&self) -> String {
        match self {
            Self::AlreadyClaimed { claimant } => {
                format!("❌ This ticket is already claimed by {}!", claimant.mention())
            }
            Self::NotClaimant => {
                "❌ Only the staff member who claimed this ticket can do that.".to_string()
            }
            Self::Unauthorized => "❌ Only staff can use these buttons.".to_string(),
            Self::TicketClosed => "🔒 This ticket is already closed.".to_string(),
            Self::UnknownTicket => "❌ This channel is not a tracked ticket.".to_string(),
        }
    }
}

// ============================================================================
// Allocator Errors
// ============================================================================

/// Sequence counter persistence errors.
///
/// Never fatal: the allocator keeps counting in memory and logs a warning.
#[derive(Debug, Error)]
pub enum AllocatorError {
    #[error("failed to persist sequence counter: {0}")]
    Persistence(#[source] std::io::Error),

    #[error("failed to read sequence counter: {0}")]
    Load(#[source] std::io::Error),

    #[error("corrupt sequence counter record: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("ticket numbers exhausted after {last}")]
    Exhausted { last: u64 },
}

impl AllocatorError {
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Persistence(_) => "allocator_persistence_failure",
            Self::Load(_) => "allocator_load_failure",
            Self::Corrupt(_) => "allocator_corrupt_record",
            Self::Exhausted { .. } => "allocator_exhausted",
        }
    }
}

// ============================================================================
// Platform Errors (side-effect execution)
// ============================================================================

/// Failures executing an outbound call on the chat platform.
///
/// Logged and swallowed at the dispatcher boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("no bridge connected")]
    Disconnected,

    #[error("platform call timed out")]
    Timeout,

    #[error("platform rejected call: {0}")]
    Rejected(String),

    #[error("bridge protocol error: {0}")]
    Protocol(String),
}

impl PlatformError {
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Timeout => "timeout",
            Self::Rejected(_) => "rejected",
            Self::Protocol(_) => "protocol",
        }
    }
}
