//! Ticket registry.
//!
//! The `TicketRegistry` tracks one actor mailbox per ticket and is the only
//! way to reach a ticket's state. The map itself is never handed out.

use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use ticket_proto::{ActionId, TicketId, UserId};
use tokio::sync::{Mutex, mpsc, oneshot};
use tracing::{error, info, warn};

use super::actor::{ActionOutcome, TicketActor, TicketEvent};
use super::dashmap_ext::DashMapExt;
use super::machine::ClaimPolicy;
use super::sequence::SequenceAllocator;
use super::ticket::Ticket;
use crate::caps::Actor;
use crate::config::Config;
use crate::error::TicketError;
use crate::services::{EffectCommand, EffectContext, EffectWorker, Platform, plan_open};

/// Live ticket mailboxes, keyed by channel id.
pub(crate) type TicketTable = DashMap<TicketId, mpsc::Sender<TicketEvent>>;

/// Settings shared by every ticket actor.
#[derive(Debug, Clone)]
pub struct TicketSettings {
    pub policy: ClaimPolicy,
    pub effects: EffectContext,
    /// Delay between close and channel removal; `None` keeps the archive.
    pub delete_after: Option<Duration>,
    pub mailbox_capacity: usize,
}

impl TicketSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            policy: config.tickets.policy,
            effects: EffectContext {
                archive_category: config.tickets.archive_category.clone(),
                staff_roles: config.roles.staff.clone(),
            },
            delete_after: config.tickets.delete_after(),
            mailbox_capacity: config.tickets.mailbox_capacity,
        }
    }
}

/// Ticket management state and behavior.
///
/// The registry is responsible for:
/// - Allocating numbers and spawning an actor per opened ticket.
/// - Routing actions to the owning actor and returning its verdict.
/// - Waiting for queued side effects on shutdown.
pub struct TicketRegistry {
    tickets: Arc<TicketTable>,
    allocator: Arc<SequenceAllocator>,
    platform: Arc<dyn Platform>,
    settings: Arc<TicketSettings>,
    /// Serializes openings so one channel never consumes two numbers.
    opening: Mutex<()>,
}

impl TicketRegistry {
    pub fn new(
        allocator: Arc<SequenceAllocator>,
        platform: Arc<dyn Platform>,
        settings: TicketSettings,
    ) -> Self {
        Self {
            tickets: Arc::new(DashMap::new()),
            allocator,
            platform,
            settings: Arc::new(settings),
            opening: Mutex::new(()),
        }
    }

    /// Start tracking `id` as a new Unclaimed ticket.
    ///
    /// Returns `None` when the channel is already a ticket or no number can
    /// be issued.
    pub async fn open(&self, id: TicketId, requester: Option<UserId>) -> Option<Ticket> {
        let _guard = self.opening.lock().await;
        if self.tickets.contains_key(&id) {
            warn!(ticket = %id, "Channel is already a tracked ticket");
            return None;
        }

        let allocation = match self.allocator.next().await {
            Ok(allocation) => allocation,
            Err(e) => {
                error!(ticket = %id, error = %e, code = e.error_code(), "Ticket not opened");
                return None;
            }
        };
        let ticket = Ticket::open(id.clone(), allocation.number, requester, Utc::now());

        let effects = EffectWorker::spawn(id.clone(), Arc::clone(&self.platform));
        let _ = effects.send(EffectCommand::Run(plan_open(&ticket)));

        let tx = TicketActor::spawn(
            ticket.clone(),
            Arc::clone(&self.settings),
            effects,
            Arc::downgrade(&self.tickets),
        );
        self.tickets.insert(id.clone(), tx);
        crate::metrics::ticket_opened();

        info!(
            ticket = %id,
            seq = ticket.sequence,
            persisted = allocation.persist_error.is_none(),
            "Ticket opened"
        );
        Some(ticket)
    }

    /// Apply `action` by `actor` to ticket `id`.
    pub async fn act(
        &self,
        id: &TicketId,
        actor: Actor,
        action: ActionId,
    ) -> Result<ActionOutcome, TicketError> {
        let tx = self.tickets.get_cloned(id).ok_or(TicketError::UnknownTicket)?;

        let (reply_tx, reply_rx) = oneshot::channel();
        let event = TicketEvent::Act {
            actor,
            action,
            reply_tx,
        };
        if tx.send(event).await.is_err() {
            self.prune(id, &tx);
            return Err(TicketError::UnknownTicket);
        }

        match reply_rx.await {
            Ok(result) => result,
            Err(_) => {
                self.prune(id, &tx);
                Err(TicketError::UnknownTicket)
            }
        }
    }

    /// A copy of the ticket record.
    pub async fn snapshot(&self, id: &TicketId) -> Option<Ticket> {
        let tx = self.tickets.get_cloned(id)?;
        let (reply_tx, reply_rx) = oneshot::channel();
        tx.send(TicketEvent::Snapshot { reply_tx }).await.ok()?;
        reply_rx.await.ok()
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    pub fn contains(&self, id: &TicketId) -> bool {
        self.tickets.contains_key(id)
    }

    /// Wait until every effect committed so far has been applied.
    pub async fn drain(&self) {
        for (_, tx) in self.tickets.iter_cloned() {
            let (reply_tx, reply_rx) = oneshot::channel();
            if tx.send(TicketEvent::Flush { reply_tx }).await.is_ok() {
                let _ = reply_rx.await;
            }
        }
    }

    /// Drop a mailbox whose actor has stopped, unless it was replaced.
    fn prune(&self, id: &TicketId, tx: &mpsc::Sender<TicketEvent>) {
        if self
            .tickets
            .remove_if(id, |_, current| current.same_channel(tx))
            .is_some()
        {
            warn!(ticket = %id, "Pruned stopped ticket actor");
        }
    }
}
