//! State management module.
//!
//! Contains the ticket record, the transition function, the sequence
//! allocator and the registry of per-ticket actors.

pub mod actor;
mod dashmap_ext;
mod machine;
mod registry;
mod sequence;
mod ticket;

pub use actor::{ActionOutcome, CloseCountdown, TicketEvent};
pub use machine::{
    ClaimPolicy, HelpClaimPolicy, ReclaimPolicy, Transition, TransitionKind, transition,
};
pub use registry::{TicketRegistry, TicketSettings};
pub use sequence::{
    Allocation, CounterRecord, CounterStore, JsonFileStore, MemoryCounterStore, SequenceAllocator,
};
pub use ticket::{ControlRef, ControlRotation, Ticket, TicketState};
