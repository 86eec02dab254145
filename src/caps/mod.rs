//! Capability-based actor permissions.
//!
//! Instead of scattered role checks, the state machine consults an [`Actor`]
//! whose capabilities were minted by the [`CapabilityAuthority`].
//!
//! - [`Cap<T>`](tokens::Cap): unforgeable token, bound to the actor's user id.
//! - [`StaffCap`]: may claim, request help and close.
//! - [`OverrideCap`]: may release someone else's claim.
//!
//! ```ignore
//! let actor = authority.resolve(&event_actor);
//! registry.act(&ticket, actor, ActionId::Claim).await?;
//! ```

mod authority;
mod ticket;
mod tokens;

pub use authority::{Actor, CapabilityAuthority};
pub use ticket::{OverrideCap, StaffCap};
pub use tokens::{Cap, Capability};
