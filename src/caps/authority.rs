//! Capability Authority - The capability mint.
//!
//! [`CapabilityAuthority`] is the only code that creates capability tokens.
//! It evaluates the actor's platform roles against the configured staff and
//! override roles, logs each decision, and bundles the resulting tokens into
//! an [`Actor`].

use super::ticket::{OverrideCap, StaffCap};
use super::tokens::{Cap, Capability};
use crate::config::RolesConfig;
use std::collections::HashSet;
use ticket_proto::{ActorRef, RoleId, UserId};
use tracing::{debug, trace};

/// An authenticated actor: a user id plus whatever capabilities the
/// authority granted for this one request.
#[derive(Debug)]
pub struct Actor {
    pub id: UserId,
    staff: Option<Cap<StaffCap>>,
    override_cap: Option<Cap<OverrideCap>>,
}

impl Actor {
    /// Holds staff capability.
    pub fn is_staff(&self) -> bool {
        self.staff.is_some()
    }

    /// Holds override capability.
    pub fn can_override(&self) -> bool {
        self.override_cap.is_some()
    }
}

/// The Capability Authority - sole minter of capability tokens.
pub struct CapabilityAuthority {
    staff_roles: HashSet<RoleId>,
    override_roles: HashSet<RoleId>,
}

impl CapabilityAuthority {
    pub fn new(roles: &RolesConfig) -> Self {
        Self {
            staff_roles: roles.staff.iter().cloned().collect(),
            override_roles: roles.override_roles.iter().cloned().collect(),
        }
    }

    fn holds_any(actor: &ActorRef, roles: &HashSet<RoleId>) -> bool {
        actor.roles.iter().any(|role| roles.contains(role))
    }

    /// Request staff capability. Override holders are staff too.
    pub fn request_staff_cap(&self, actor: &ActorRef) -> Option<Cap<StaffCap>> {
        let granted = Self::holds_any(actor, &self.staff_roles)
            || Self::holds_any(actor, &self.override_roles);
        self.mint(actor, granted)
    }

    /// Request override capability.
    pub fn request_override_cap(&self, actor: &ActorRef) -> Option<Cap<OverrideCap>> {
        let granted = Self::holds_any(actor, &self.override_roles);
        self.mint(actor, granted)
    }

    /// Resolve every capability for an actor.
    pub fn resolve(&self, actor: &ActorRef) -> Actor {
        Actor {
            id: actor.id.clone(),
            staff: self.request_staff_cap(actor),
            override_cap: self.request_override_cap(actor),
        }
    }

    fn mint<T: Capability<Scope = UserId>>(&self, actor: &ActorRef, granted: bool) -> Option<Cap<T>> {
        if granted {
            debug!(capability = T::NAME, actor = %actor.id, "Capability granted");
            Some(Cap::new(actor.id.clone()))
        } else {
            trace!(capability = T::NAME, actor = %actor.id, "Capability denied");
            None
        }
    }
}
