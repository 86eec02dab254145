//! Control-message button presses.

use async_trait::async_trait;
use ticket_proto::{InboundEvent, Outcome};

use super::core::{Context, EventHandler};
use crate::state::TransitionKind;

pub struct ActionRequestedHandler;

/// Notice for an accepted action that changed nothing.
fn acknowledgement(kind: TransitionKind) -> Option<&'static str> {
    match kind {
        TransitionKind::ReclaimAcknowledged => Some("✅ You have already claimed this ticket."),
        TransitionKind::HelpAlreadyRequested => Some("🆘 Help has already been requested for this ticket."),
        _ => None,
    }
}

#[async_trait]
impl EventHandler for ActionRequestedHandler {
    async fn handle(&self, ctx: &Context, event: InboundEvent) -> Outcome {
        let InboundEvent::ActionRequested {
            ticket,
            actor,
            action,
        } = event
        else {
            return Outcome::ignored();
        };

        let actor = ctx.authority.resolve(&actor);
        match ctx.registry.act(&ticket, actor, action).await {
            Ok(outcome) => {
                let mut reply = Outcome::accepted(outcome.ticket.sequence);
                reply.notice = acknowledgement(outcome.kind).map(str::to_string);
                reply
            }
            Err(e) => Outcome::rejected(e.notice()),
        }
    }
}
