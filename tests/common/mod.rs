//! Integration test common infrastructure.
//!
//! Provides an in-memory platform recorder, an in-process daemon bound to
//! an ephemeral port, and a bridge client speaking the wire protocol.

pub mod bridge;
pub mod daemon;
pub mod platform;

#[allow(unused_imports)]
pub use bridge::TestBridge;
#[allow(unused_imports)]
pub use daemon::TestDaemon;
#[allow(unused_imports)]
pub use platform::RecordingPlatform;

use ticket_proto::{ActorRef, RoleId};

/// Role id every test config grants staff.
pub const STAFF_ROLE: &str = "1421545043214340166";

/// A staff member.
#[allow(dead_code)]
pub fn staff(id: &str) -> ActorRef {
    ActorRef::new(id, [RoleId::from(STAFF_ROLE)])
}

/// A member with no roles.
#[allow(dead_code)]
pub fn member(id: &str) -> ActorRef {
    ActorRef::new(id, Vec::new())
}
