use crate::caps::Actor;
use crate::error::TicketError;
use crate::state::{Ticket, TransitionKind};
use ticket_proto::ActionId;
use tokio::sync::oneshot;

/// Events that can be sent to a Ticket Actor.
#[derive(Debug)]
pub enum TicketEvent {
    /// A staff action from a control message or an auto-claim.
    Act {
        actor: Actor,
        action: ActionId,
        reply_tx: oneshot::Sender<Result<ActionOutcome, TicketError>>,
    },
    /// Request a copy of the ticket record.
    Snapshot { reply_tx: oneshot::Sender<Ticket> },
    /// Reply once every effect batch committed so far has been applied.
    Flush { reply_tx: oneshot::Sender<()> },
    /// The close countdown elapsed.
    Expire,
}

/// Result of an accepted action.
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub kind: TransitionKind,
    /// The record after the action.
    pub ticket: Ticket,
}
