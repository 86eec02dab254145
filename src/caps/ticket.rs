//! Ticket capability types.

use super::tokens::Capability;
use ticket_proto::UserId;

/// Define a capability scoped to the user it was minted for.
macro_rules! define_capability {
    ($name:ident, $cap_name:literal, $doc:literal) => {
        #[doc = $doc]
        ///
        /// Scope: the actor's user id.
        pub struct $name;

        impl Capability for $name {
            type Scope = UserId;
            const NAME: &'static str = $cap_name;
        }
    };
}

define_capability!(
    StaffCap,
    "ticket:staff",
    "Act on tickets: claim, request help, close."
);
define_capability!(
    OverrideCap,
    "ticket:override",
    "Release a ticket claimed by someone else."
);
