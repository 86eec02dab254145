//! Per-ticket side-effect execution.
//!
//! Each ticket gets one [`EffectWorker`] draining an unbounded queue of
//! effect batches in commit order. Failures are logged and counted, never
//! reported back: the transition that caused them is already committed.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use ticket_proto::{MessageId, OutboundCall, TicketId};
use tokio::sync::{mpsc, oneshot};
use tracing::{Instrument, debug, trace, warn};

use super::effect::TicketEffect;
use crate::error::PlatformError;
use crate::state::ControlRef;

/// Reply to a successful platform call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallReply {
    /// Id of the message the call created, for `PostMessage`.
    pub message: Option<MessageId>,
}

impl CallReply {
    pub fn posted(message: MessageId) -> Self {
        Self {
            message: Some(message),
        }
    }
}

/// The single seam to the chat platform.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Perform one outbound call.
    async fn execute(&self, call: OutboundCall) -> Result<CallReply, PlatformError>;
}

/// Work queued for an effect worker.
#[derive(Debug)]
pub enum EffectCommand {
    /// Apply a batch in order.
    Run(Vec<TicketEffect>),
    /// Reply once everything queued before this has been applied.
    Drained(oneshot::Sender<()>),
}

pub type EffectSender = mpsc::UnboundedSender<EffectCommand>;

/// Applies one ticket's effects and tracks its posted control messages.
pub struct EffectWorker {
    ticket: TicketId,
    platform: Arc<dyn Platform>,
    /// Platform ids of control messages that were posted and not yet retired.
    posted: HashMap<ControlRef, MessageId>,
}

impl EffectWorker {
    /// Spawn a worker for `ticket`. It stops once every sender is dropped
    /// and the queue is empty.
    pub fn spawn(ticket: TicketId, platform: Arc<dyn Platform>) -> EffectSender {
        let (tx, rx) = mpsc::unbounded_channel();
        let span = crate::telemetry::spans::effects(&ticket);
        let worker = Self {
            ticket,
            platform,
            posted: HashMap::new(),
        };
        tokio::spawn(worker.run(rx).instrument(span));
        tx
    }

    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<EffectCommand>) {
        while let Some(command) = rx.recv().await {
            match command {
                EffectCommand::Run(batch) => {
                    for effect in batch {
                        self.apply(effect).await;
                    }
                }
                EffectCommand::Drained(reply_tx) => {
                    let _ = reply_tx.send(());
                }
            }
        }
        trace!(ticket = %self.ticket, "Effect worker stopped");
    }

    async fn apply(&mut self, effect: TicketEffect) {
        match effect {
            TicketEffect::Call(call) => {
                let _ = self.execute(call).await;
            }
            TicketEffect::RetireControl(control) => {
                let Some(message) = self.posted.remove(&control) else {
                    debug!(ticket = %self.ticket, %control, "Control message was never posted, nothing to retire");
                    return;
                };
                let _ = self
                    .execute(OutboundCall::DeleteMessage {
                        ticket: self.ticket.clone(),
                        message,
                    })
                    .await;
            }
            TicketEffect::PostControl {
                control,
                content,
                spec,
            } => {
                let call = OutboundCall::PostMessage {
                    ticket: self.ticket.clone(),
                    content,
                    control: Some(spec),
                };
                match self.execute(call).await {
                    Some(CallReply {
                        message: Some(message),
                    }) => {
                        debug!(ticket = %self.ticket, %control, %message, "Control message bound");
                        self.posted.insert(control, message);
                    }
                    Some(CallReply { message: None }) => {
                        warn!(ticket = %self.ticket, %control, "Platform returned no id for control message");
                    }
                    None => {}
                }
            }
            TicketEffect::Notify { user, content } => {
                let call = OutboundCall::SendDirectNotification {
                    user: user.clone(),
                    content,
                };
                if let Err(e) = self.platform.execute(call).await {
                    debug!(ticket = %self.ticket, %user, error = %e, "Direct notification not delivered");
                }
            }
        }
    }

    /// Execute a call, logging and counting failure.
    async fn execute(&self, call: OutboundCall) -> Option<CallReply> {
        let kind = call.kind();
        match self.platform.execute(call).await {
            Ok(reply) => {
                trace!(ticket = %self.ticket, call = kind, "Platform call done");
                Some(reply)
            }
            Err(e) => {
                warn!(ticket = %self.ticket, call = kind, error = %e, "Platform call failed");
                crate::metrics::record_effect_failure(kind, e.error_code());
                None
            }
        }
    }
}
