//! Ticket state machine.
//!
//! ```text
//!                 claim                    requestHelp
//! ┌────────────┐ ───────► ┌────────────┐ ─────────────► ┌───────────────┐
//! │ Unclaimed  │          │  Claimed   │                │ HelpRequested │
//! └─────┬──────┘          └─────┬──────┘ ◄───────────── └───────┬───────┘
//!       │  requestHelp ─────────┼──────────►   claim            │
//!       │                       │ close (claimant)              │
//!       └──── close ──────► ┌───▼────┐ ◄──────── close ─────────┘
//!                           │ Closed │  (terminal)
//!                           └────────┘
//! ```
//!
//! [`transition`] is pure: it reads the current state and the actor's
//! capabilities and returns either the next state or the reason for refusal.
//! Serialization and commit happen in the ticket actor.

use serde::Deserialize;
use ticket_proto::ActionId;

use super::ticket::TicketState;
use crate::caps::Actor;
use crate::error::TicketError;

/// What a claimant re-claiming their own ticket gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReclaimPolicy {
    /// Idempotent acknowledge, nothing changes.
    #[default]
    Acknowledge,
    /// Refused with `AlreadyClaimed`.
    Reject,
}

/// Who may claim a ticket in HelpRequested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelpClaimPolicy {
    #[default]
    AnyStaff,
    /// Only whoever released it; any staff if nobody did.
    PreviousClaimant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct ClaimPolicy {
    #[serde(default)]
    pub reclaim: ReclaimPolicy,
    #[serde(default)]
    pub help_claim: HelpClaimPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Claimed,
    /// The claimant claimed again; no state change.
    ReclaimAcknowledged,
    HelpRequested,
    /// Help was already requested; no state change.
    HelpAlreadyRequested,
    Closed,
}

impl TransitionKind {
    /// Whether the transition commits a new state (and so side effects).
    pub fn changes_state(self) -> bool {
        !matches!(self, Self::ReclaimAcknowledged | Self::HelpAlreadyRequested)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Claimed => "claimed",
            Self::ReclaimAcknowledged => "reclaim_acknowledged",
            Self::HelpRequested => "help_requested",
            Self::HelpAlreadyRequested => "help_already_requested",
            Self::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub kind: TransitionKind,
    pub next: TicketState,
}

impl Transition {
    fn to(kind: TransitionKind, next: TicketState) -> Self {
        Self { kind, next }
    }
}

/// Compute the outcome of `action` by `actor` on a ticket in `state`.
pub fn transition(
    state: &TicketState,
    actor: &Actor,
    action: ActionId,
    policy: &ClaimPolicy,
) -> Result<Transition, TicketError> {
    if state.is_terminal() {
        return Err(TicketError::TicketClosed);
    }

    // The one path open to a non-staff actor: an override releasing a claim.
    let override_release = action == ActionId::RequestHelp
        && actor.can_override()
        && state.claimant().is_some();
    if !actor.is_staff() && !override_release {
        return Err(TicketError::Unauthorized);
    }

    match (action, state) {
        (ActionId::Claim, TicketState::Claimed { claimant }) => {
            if *claimant == actor.id && policy.reclaim == ReclaimPolicy::Acknowledge {
                Ok(Transition::to(
                    TransitionKind::ReclaimAcknowledged,
                    state.clone(),
                ))
            } else {
                Err(TicketError::AlreadyClaimed {
                    claimant: claimant.clone(),
                })
            }
        }
        (
            ActionId::Claim,
            TicketState::HelpRequested {
                released_by: Some(previous),
            },
        ) if policy.help_claim == HelpClaimPolicy::PreviousClaimant && *previous != actor.id => {
            Err(TicketError::NotClaimant)
        }
        (ActionId::Claim, TicketState::Unclaimed | TicketState::HelpRequested { .. }) => {
            Ok(Transition::to(
                TransitionKind::Claimed,
                TicketState::Claimed {
                    claimant: actor.id.clone(),
                },
            ))
        }

        (ActionId::RequestHelp, TicketState::Claimed { claimant }) => {
            if *claimant == actor.id || actor.can_override() {
                Ok(Transition::to(
                    TransitionKind::HelpRequested,
                    TicketState::HelpRequested {
                        released_by: Some(claimant.clone()),
                    },
                ))
            } else {
                Err(TicketError::NotClaimant)
            }
        }
        (ActionId::RequestHelp, TicketState::Unclaimed) => Ok(Transition::to(
            TransitionKind::HelpRequested,
            TicketState::HelpRequested { released_by: None },
        )),
        (ActionId::RequestHelp, TicketState::HelpRequested { .. }) => Ok(Transition::to(
            TransitionKind::HelpAlreadyRequested,
            state.clone(),
        )),

        (ActionId::Close, TicketState::Claimed { claimant }) if *claimant != actor.id => {
            Err(TicketError::NotClaimant)
        }
        (ActionId::Close, _) => Ok(Transition::to(TransitionKind::Closed, TicketState::Closed)),

        (_, TicketState::Closed) => Err(TicketError::TicketClosed),
    }
}
