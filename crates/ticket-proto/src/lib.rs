//! # ticket-proto
//!
//! Wire types shared between the `ticketd` core and a chat-platform adapter
//! ("bridge"). The bridge streams inbound platform events to the core and
//! executes the outbound calls the core issues in response.
//!
//! ## Features
//!
//! - Typed identifiers for channels, users, roles, categories and messages
//! - Inbound events (`channel_opened`, `action_requested`, `message_posted`)
//! - Outbound platform calls with control-message specs
//! - Bridge frames with request/response correlation
//! - Optional Tokio codec for newline-delimited JSON framing
//!
//! ## Quick Start
//!
//! ```rust
//! use ticket_proto::{ActionId, BridgeFrame, InboundEvent};
//!
//! let raw = r#"{"op":"event","seq":7,"event":{"type":"action_requested",
//!     "ticket":"991","actor":{"id":"42","roles":["staff"]},"action":"claim_ticket"}}"#;
//! let frame: BridgeFrame = serde_json::from_str(raw).expect("valid frame");
//!
//! match frame {
//!     BridgeFrame::Event { seq, event: InboundEvent::ActionRequested { action, .. } } => {
//!         assert_eq!(seq, 7);
//!         assert_eq!(action, ActionId::Claim);
//!     }
//!     _ => unreachable!(),
//! }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod action;
pub mod call;
#[cfg(feature = "tokio")]
pub mod codec;
pub mod error;
pub mod event;
pub mod frame;
pub mod id;

pub use self::action::ActionId;
pub use self::call::{
    Button, ButtonStyle, ControlSpec, OutboundCall, OverwriteTarget, Permission,
    PermissionOverwrite,
};
#[cfg(feature = "tokio")]
pub use self::codec::{BridgeCodec, CoreCodec, JsonLinesCodec, DEFAULT_MAX_FRAME_LEN};
pub use self::error::{MalformedFrame, ProtocolError};
pub use self::event::{ActorRef, InboundEvent};
pub use self::frame::{BridgeFrame, CallResult, CoreFrame, Outcome};
pub use self::id::{CategoryId, MessageId, RoleId, TicketId, UserId};
