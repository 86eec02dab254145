//! Core capability token types.
//!
//! This module defines the unforgeable `Cap<T>` token and the `Capability` trait.

use std::fmt;
use std::marker::PhantomData;

/// An unforgeable capability token proving authorization.
///
/// Only [`CapabilityAuthority`](super::authority::CapabilityAuthority) can
/// mint one (`new()` is `pub(super)`). Tokens are neither `Clone` nor `Copy`,
/// so a grant travels with exactly one request into the ticket actor.
pub struct Cap<T: Capability> {
    /// The principal this capability was minted for.
    scope: T::Scope,
    _marker: PhantomData<T>,
}

// Deliberately no Clone/Copy/Default.

impl<T: Capability> Cap<T> {
    #[inline]
    pub(super) fn new(scope: T::Scope) -> Self {
        Self {
            scope,
            _marker: PhantomData,
        }
    }

    /// The principal this capability was minted for.
    #[inline]
    pub fn scope(&self) -> &T::Scope {
        &self.scope
    }
}

impl<T: Capability> fmt::Debug for Cap<T>
where
    T::Scope: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cap")
            .field("capability", &T::NAME)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Trait for capability types.
///
/// `Scope` names what the capability is bound to and `NAME` is used in
/// audit logs.
pub trait Capability: 'static + Send + Sync {
    type Scope: Clone + Send + Sync;

    const NAME: &'static str;
}
