//! Ticket services.
//!
//! - [`effect`]: pure side-effect planning for committed transitions
//! - [`dispatcher`]: the [`Platform`] seam and per-ticket effect workers
//! - [`autoclaim`]: compiled per-category auto-claim rules

pub mod autoclaim;
pub mod dispatcher;
pub mod effect;

pub use autoclaim::AutoClaimRules;
pub use dispatcher::{CallReply, EffectCommand, EffectSender, EffectWorker, Platform};
pub use effect::{EffectContext, TicketEffect, control_spec_for, plan_expiry, plan_open, plan_transition};
