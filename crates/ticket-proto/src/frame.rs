//! Bridge frames.
//!
//! Every line on a bridge connection is one frame. Events flow from the bridge
//! and are answered by an [`Outcome`] carrying the same `seq`; calls flow from
//! the core and are answered by a [`CallResult`] carrying the same `call_id`.

use serde::{Deserialize, Serialize};

use crate::call::OutboundCall;
use crate::event::InboundEvent;
use crate::id::MessageId;

/// Frames sent by a bridge to the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BridgeFrame {
    /// A platform event.
    Event {
        /// Bridge-chosen correlation number.
        seq: u64,
        /// The event.
        event: InboundEvent,
    },
    /// Result of an [`OutboundCall`].
    CallResult {
        /// Correlates with [`CoreFrame::Call::call_id`].
        call_id: u64,
        /// What happened.
        result: CallResult,
    },
}

/// Frames sent by the core to a bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CoreFrame {
    /// Response to [`BridgeFrame::Event`].
    Outcome {
        /// Correlates with the event's `seq`.
        seq: u64,
        /// What the core decided.
        outcome: Outcome,
    },
    /// A platform operation to perform.
    Call {
        /// Core-chosen correlation number.
        call_id: u64,
        /// The operation.
        call: OutboundCall,
    },
}

/// Result of executing an outbound call on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CallResult {
    /// The call succeeded.
    Ok {
        /// Id of the message created by a `post_message` call.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<MessageId>,
    },
    /// The platform refused or failed the call.
    Failed {
        /// Human-readable reason.
        reason: String,
    },
}

/// The core's answer to an inbound event.
///
/// `notice` is addressed to the acting user only (for example as an
/// ephemeral interaction reply); it is never broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Outcome {
    /// Whether the event changed or acknowledged ticket state.
    pub accepted: bool,
    /// Text for the acting user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    /// Sequence number of the affected ticket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<u64>,
}

impl Outcome {
    /// An accepted outcome for the given ticket number.
    pub fn accepted(ticket: u64) -> Self {
        Self {
            accepted: true,
            notice: None,
            ticket: Some(ticket),
        }
    }

    /// A rejection with a notice for the acting user.
    pub fn rejected(notice: impl Into<String>) -> Self {
        Self {
            accepted: false,
            notice: Some(notice.into()),
            ticket: None,
        }
    }

    /// The event was not relevant to any ticket.
    pub fn ignored() -> Self {
        Self::default()
    }
}
