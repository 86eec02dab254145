//! Actor model for ticket state.
//!
//! Each ticket is owned by a `TicketActor` running on its own tokio task.
//! Every action on one ticket goes through its mailbox, so the state machine
//! never sees interleaved reads and writes for a ticket, while distinct
//! tickets proceed independently.
//!
//! # Architecture
//!
//! - **State Ownership**: the actor owns the [`Ticket`] record and its close countdown.
//! - **Message Passing**: callers send [`TicketEvent`]s and await a oneshot reply.
//! - **Effects**: committed transitions are planned into effect batches and
//!   handed to the ticket's effect worker, so the actor never waits on the platform.

use chrono::Utc;
use std::sync::{Arc, Weak};
use ticket_proto::ActionId;
use tokio::sync::{mpsc, oneshot};
use tracing::{Instrument, debug, info, warn};

use crate::caps::Actor;
use crate::error::TicketError;
use crate::services::{EffectCommand, EffectSender, TicketEffect, plan_expiry, plan_transition};
use crate::state::registry::{TicketSettings, TicketTable};
use crate::state::{Ticket, TransitionKind, transition};

mod countdown;
mod types;

pub use countdown::CloseCountdown;
pub use types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActorState {
    Active,
    Retired,
}

/// The Ticket Actor.
///
/// Owns the state of a single ticket and processes events sequentially.
pub struct TicketActor {
    ticket: Ticket,
    settings: Arc<TicketSettings>,
    effects: EffectSender,
    countdown: Option<CloseCountdown>,
    mailbox: mpsc::WeakSender<TicketEvent>,
    table: Weak<TicketTable>,
    state: ActorState,
}

impl TicketActor {
    /// Spawn an actor owning `ticket` and return its mailbox.
    pub fn spawn(
        ticket: Ticket,
        settings: Arc<TicketSettings>,
        effects: EffectSender,
        table: Weak<TicketTable>,
    ) -> mpsc::Sender<TicketEvent> {
        let (tx, rx) = mpsc::channel(settings.mailbox_capacity.max(1));
        let span = crate::telemetry::spans::ticket(&ticket.id, ticket.sequence);

        let actor = Self {
            ticket,
            settings,
            effects,
            countdown: None,
            mailbox: tx.downgrade(),
            table,
            state: ActorState::Active,
        };

        tokio::spawn(actor.run(rx).instrument(span));
        tx
    }

    /// The main actor loop.
    pub async fn run(mut self, mut rx: mpsc::Receiver<TicketEvent>) {
        while let Some(event) = rx.recv().await {
            self.handle_event(event);
            if self.state == ActorState::Retired {
                break;
            }
        }
        debug!(ticket = %self.ticket.id, "Ticket actor stopped");
    }

    fn handle_event(&mut self, event: TicketEvent) {
        match event {
            TicketEvent::Act {
                actor,
                action,
                reply_tx,
            } => {
                let result = self.handle_act(&actor, action);
                let _ = reply_tx.send(result);
            }
            TicketEvent::Snapshot { reply_tx } => {
                let _ = reply_tx.send(self.ticket.clone());
            }
            TicketEvent::Flush { reply_tx } => self.handle_flush(reply_tx),
            TicketEvent::Expire => self.handle_expire(),
        }
    }

    fn handle_act(&mut self, actor: &Actor, action: ActionId) -> Result<ActionOutcome, TicketError> {
        let _timer = crate::telemetry::ActionTimer::new(action);

        let outcome = transition(&self.ticket.state, actor, action, &self.settings.policy);
        let step = match outcome {
            Ok(step) => step,
            Err(e) => {
                debug!(
                    ticket = %self.ticket.id,
                    actor = %actor.id,
                    action = action.as_str(),
                    state = %self.ticket.state,
                    error = e.error_code(),
                    "Action rejected"
                );
                crate::metrics::record_rejection(action.as_str(), e.error_code());
                return Err(e);
            }
        };

        if step.kind.changes_state() {
            let now = Utc::now();
            let rotation = self.ticket.commit(step.next, now);
            let effects = plan_transition(
                &self.ticket,
                step.kind,
                &actor.id,
                rotation,
                &self.settings.effects,
            );
            self.dispatch(effects);

            if step.kind == TransitionKind::Closed {
                crate::metrics::ticket_closed();
                self.arm_countdown();
            }

            info!(
                ticket = %self.ticket.id,
                seq = self.ticket.sequence,
                actor = %actor.id,
                state = %self.ticket.state,
                "Ticket transition committed"
            );
        } else {
            debug!(
                ticket = %self.ticket.id,
                actor = %actor.id,
                kind = step.kind.as_str(),
                "Action acknowledged without change"
            );
        }

        crate::metrics::record_transition(step.kind.as_str());
        Ok(ActionOutcome {
            kind: step.kind,
            ticket: self.ticket.clone(),
        })
    }

    fn arm_countdown(&mut self) {
        let Some(delay) = self.settings.delete_after else {
            debug!(ticket = %self.ticket.id, "Channel removal disabled, keeping archive");
            return;
        };
        let countdown = CloseCountdown::arm(delay, self.mailbox.clone());
        self.ticket.deletion_due = countdown.due();
        self.countdown = Some(countdown);
    }

    fn handle_flush(&self, reply_tx: oneshot::Sender<()>) {
        // A dead worker drops the sender, which the caller treats as drained.
        let _ = self.effects.send(EffectCommand::Drained(reply_tx));
    }

    fn handle_expire(&mut self) {
        if !self.ticket.state.is_terminal() {
            warn!(ticket = %self.ticket.id, state = %self.ticket.state, "Expiry for an open ticket ignored");
            return;
        }

        info!(ticket = %self.ticket.id, seq = self.ticket.sequence, "Removing closed ticket channel");
        self.dispatch(plan_expiry(&self.ticket));
        self.countdown = None;
        self.retire();
    }

    /// Remove this ticket from the registry; the loop stops after the
    /// current event.
    fn retire(&mut self) {
        self.state = ActorState::Retired;
        if let Some(table) = self.table.upgrade()
            && table.remove(&self.ticket.id).is_some()
        {
            crate::metrics::ticket_retired();
        }
    }

    fn dispatch(&self, effects: Vec<TicketEffect>) {
        if effects.is_empty() {
            return;
        }
        if self.effects.send(EffectCommand::Run(effects)).is_err() {
            warn!(ticket = %self.ticket.id, "Effect worker gone, dropping effects");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caps::CapabilityAuthority;
    use crate::config::RolesConfig;
    use crate::services::EffectContext;
    use crate::state::ClaimPolicy;
    use std::time::Duration;
    use ticket_proto::{ActorRef, RoleId, TicketId};

    fn settings(delete_after: Option<Duration>) -> Arc<TicketSettings> {
        Arc::new(TicketSettings {
            policy: ClaimPolicy::default(),
            effects: EffectContext::default(),
            delete_after,
            mailbox_capacity: 8,
        })
    }

    fn staff(id: &str) -> Actor {
        CapabilityAuthority::new(&RolesConfig {
            staff: vec![RoleId::from("staff")],
            override_roles: Vec::new(),
        })
        .resolve(&ActorRef::new(id, [RoleId::from("staff")]))
    }

    fn actor_under_test(
        delete_after: Option<Duration>,
    ) -> (TicketActor, mpsc::UnboundedReceiver<EffectCommand>) {
        let (effects, effects_rx) = mpsc::unbounded_channel();
        let (tx, _rx) = mpsc::channel(1);
        let actor = TicketActor {
            ticket: Ticket::open(TicketId::from("c1"), 4176, None, Utc::now()),
            settings: settings(delete_after),
            effects,
            countdown: None,
            mailbox: tx.downgrade(),
            table: Weak::new(),
            state: ActorState::Active,
        };
        (actor, effects_rx)
    }

    #[tokio::test]
    async fn acknowledged_reclaim_dispatches_nothing() {
        let (mut actor, mut effects_rx) = actor_under_test(None);
        actor.handle_act(&staff("a"), ActionId::Claim).unwrap();
        assert!(matches!(effects_rx.try_recv(), Ok(EffectCommand::Run(_))));

        let outcome = actor.handle_act(&staff("a"), ActionId::Claim).unwrap();
        assert_eq!(outcome.kind, TransitionKind::ReclaimAcknowledged);
        assert!(effects_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn close_arms_countdown_when_enabled() {
        let (mut actor, _effects_rx) = actor_under_test(Some(Duration::from_secs(3600)));
        let outcome = actor.handle_act(&staff("a"), ActionId::Close).unwrap();
        assert_eq!(outcome.kind, TransitionKind::Closed);
        assert!(actor.countdown.is_some());
        assert!(outcome.ticket.deletion_due.is_some());
    }

    #[tokio::test]
    async fn close_without_removal_keeps_ticket() {
        let (mut actor, _effects_rx) = actor_under_test(None);
        actor.handle_act(&staff("a"), ActionId::Close).unwrap();
        assert!(actor.countdown.is_none());
        assert!(actor.ticket.deletion_due.is_none());
    }

    #[tokio::test]
    async fn expire_on_open_ticket_is_ignored() {
        let (mut actor, mut effects_rx) = actor_under_test(None);
        actor.handle_expire();
        assert_eq!(actor.state, ActorState::Active);
        assert!(effects_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn expire_after_close_deletes_channel_and_retires() {
        let (mut actor, mut effects_rx) = actor_under_test(None);
        actor.handle_act(&staff("a"), ActionId::Close).unwrap();
        let _close_batch = effects_rx.try_recv().unwrap();

        actor.handle_expire();
        assert_eq!(actor.state, ActorState::Retired);
        let Ok(EffectCommand::Run(batch)) = effects_rx.try_recv() else {
            panic!("expected expiry batch");
        };
        assert_eq!(batch, plan_expiry(&actor.ticket));
    }
}
