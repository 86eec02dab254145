//! The ticket record.

use chrono::{DateTime, Utc};
use std::fmt;
use ticket_proto::{TicketId, UserId};

/// Lifecycle state of a ticket.
///
/// The claimant lives inside `Claimed`, so a ticket can never carry a
/// claimant in any other state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketState {
    Unclaimed,
    Claimed {
        claimant: UserId,
    },
    /// Released for other staff. `released_by` is who gave it up, if it was
    /// claimed at the time; it confers nothing by itself.
    HelpRequested {
        released_by: Option<UserId>,
    },
    Closed,
}

impl TicketState {
    pub fn claimant(&self) -> Option<&UserId> {
        match self {
            Self::Claimed { claimant } => Some(claimant),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Short state name for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unclaimed => "unclaimed",
            Self::Claimed { .. } => "claimed",
            Self::HelpRequested { .. } => "help_requested",
            Self::Closed => "closed",
        }
    }

    /// Channel display name for a ticket in this state.
    ///
    /// Rendering only; nothing ever parses it back.
    pub fn display_name(&self, sequence: u64) -> String {
        match self {
            Self::Unclaimed => format!("❌-unclaimed-ticket-{sequence}"),
            Self::Claimed { .. } => format!("✅-claimed-ticket-{sequence}"),
            Self::HelpRequested { .. } => format!("🆘-help-ticket-{sequence}"),
            Self::Closed => format!("🔒-closed-{sequence}"),
        }
    }
}

impl fmt::Display for TicketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Claimed { claimant } => write!(f, "claimed({claimant})"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Core-issued token naming a ticket's live control message.
///
/// The platform message id is bound to the token once the post succeeds,
/// so the token can be committed together with the state that requires it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlRef(u64);

impl fmt::Display for ControlRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "control#{}", self.0)
    }
}

/// Control references swapped by one commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlRotation {
    pub retired: Option<ControlRef>,
    pub issued: Option<ControlRef>,
}

/// Authoritative record for one ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: TicketId,
    pub sequence: u64,
    pub state: TicketState,
    /// Who the ticket was opened for, when known.
    pub requester: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub last_transition_at: DateTime<Utc>,
    /// When the scheduled channel removal fires (set on close).
    pub deletion_due: Option<DateTime<Utc>>,
    control: Option<ControlRef>,
    control_generation: u64,
}

impl Ticket {
    /// A fresh Unclaimed ticket holding its first control reference.
    pub fn open(
        id: TicketId,
        sequence: u64,
        requester: Option<UserId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            sequence,
            state: TicketState::Unclaimed,
            requester,
            created_at: now,
            last_transition_at: now,
            deletion_due: None,
            control: Some(ControlRef(1)),
            control_generation: 1,
        }
    }

    pub fn claimant(&self) -> Option<&UserId> {
        self.state.claimant()
    }

    /// The single live control reference, if any.
    pub fn control(&self) -> Option<ControlRef> {
        self.control
    }

    pub fn display_name(&self) -> String {
        self.state.display_name(self.sequence)
    }

    /// Commit a state change, retiring the current control reference and
    /// issuing the next one in the same step. Terminal states get none.
    ///
    /// Callers must not commit on a closed ticket; the state machine rejects
    /// every action there before a commit is reached.
    pub fn commit(&mut self, next: TicketState, at: DateTime<Utc>) -> ControlRotation {
        debug_assert!(!self.state.is_terminal(), "commit on closed ticket");
        let retired = self.control.take();
        let issued = if next.is_terminal() {
            None
        } else {
            self.control_generation += 1;
            Some(ControlRef(self.control_generation))
        };
        self.state = next;
        self.last_transition_at = at;
        self.control = issued;
        ControlRotation { retired, issued }
    }
}
