//! Auto-claim from messages posted in configured categories.

use async_trait::async_trait;
use ticket_proto::{ActionId, InboundEvent, Outcome};
use tracing::debug;

use super::core::{Context, EventHandler};

pub struct MessagePostedHandler;

#[async_trait]
impl EventHandler for MessagePostedHandler {
    async fn handle(&self, ctx: &Context, event: InboundEvent) -> Outcome {
        let InboundEvent::MessagePosted {
            ticket,
            actor,
            text,
            category,
        } = event
        else {
            return Outcome::ignored();
        };

        if !ctx.autoclaim.matches(category.as_ref(), &text) {
            return Outcome::ignored();
        }

        let actor_id = actor.id.clone();
        let actor = ctx.authority.resolve(&actor);
        match ctx.registry.act(&ticket, actor, ActionId::Claim).await {
            Ok(outcome) => Outcome::accepted(outcome.ticket.sequence),
            Err(e) => {
                // Auto-claims never answer the author.
                debug!(ticket = %ticket, actor = %actor_id, error = e.error_code(), "Auto-claim rejected");
                Outcome::ignored()
            }
        }
    }
}
