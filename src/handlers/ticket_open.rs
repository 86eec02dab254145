//! Channel creation: decides whether a new channel is a ticket.

use async_trait::async_trait;
use ticket_proto::{InboundEvent, Outcome};
use tracing::{debug, trace};

use super::core::{Context, EventHandler};

pub struct ChannelOpenedHandler;

#[async_trait]
impl EventHandler for ChannelOpenedHandler {
    async fn handle(&self, ctx: &Context, event: InboundEvent) -> Outcome {
        let InboundEvent::ChannelOpened {
            channel,
            name,
            category,
            requester,
        } = event
        else {
            return Outcome::ignored();
        };

        if !ctx.pattern.matches(&name, category.as_ref()) {
            trace!(channel = %channel, %name, "Channel is not a ticket");
            return Outcome::ignored();
        }

        match ctx.registry.open(channel.clone(), requester).await {
            Some(ticket) => Outcome::accepted(ticket.sequence),
            None => {
                debug!(channel = %channel, "Channel not opened as a ticket");
                Outcome::ignored()
            }
        }
    }
}
