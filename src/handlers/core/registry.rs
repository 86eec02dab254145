//! Event handler registry and dispatch.

use super::context::{Context, EventHandler};
use crate::handlers::{ActionRequestedHandler, ChannelOpenedHandler, MessagePostedHandler};
use std::collections::HashMap;
use ticket_proto::{InboundEvent, Outcome};
use tracing::{Instrument, Level, span, trace};

/// Registry of event handlers, keyed by event kind.
pub struct Router {
    handlers: HashMap<&'static str, Box<dyn EventHandler>>,
    ctx: Context,
}

impl Router {
    /// Create a router with all handlers registered.
    pub fn new(ctx: Context) -> Self {
        let mut handlers: HashMap<&'static str, Box<dyn EventHandler>> = HashMap::new();
        handlers.insert("channel_opened", Box::new(ChannelOpenedHandler));
        handlers.insert("action_requested", Box::new(ActionRequestedHandler));
        handlers.insert("message_posted", Box::new(MessagePostedHandler));
        Self { handlers, ctx }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Route an event to its handler.
    pub async fn dispatch(&self, event: InboundEvent) -> Outcome {
        let kind = event.kind();
        crate::metrics::record_bridge_event(kind);

        let Some(handler) = self.handlers.get(kind) else {
            trace!(event = kind, "No handler registered");
            return Outcome::ignored();
        };

        let event_span = span!(Level::DEBUG, "ticket.event", event = kind);
        handler.handle(&self.ctx, event).instrument(event_span).await
    }
}
