//! Inbound platform events.

use serde::{Deserialize, Serialize};

use crate::action::ActionId;
use crate::id::{CategoryId, RoleId, TicketId, UserId};

/// The user behind an interaction, with the roles the platform reports for
/// them in the ticket's guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorRef {
    /// Platform user id.
    pub id: UserId,
    /// Role ids held by the user.
    #[serde(default)]
    pub roles: Vec<RoleId>,
}

impl ActorRef {
    /// Build an actor reference.
    pub fn new(id: impl Into<UserId>, roles: impl IntoIterator<Item = RoleId>) -> Self {
        Self {
            id: id.into(),
            roles: roles.into_iter().collect(),
        }
    }
}

/// Events a bridge forwards to the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    /// A text channel was created. The core decides whether it is a ticket.
    ChannelOpened {
        /// Id of the new channel.
        channel: TicketId,
        /// Name the channel was created with.
        name: String,
        /// Parent category, if any.
        #[serde(default)]
        category: Option<CategoryId>,
        /// The user the ticket was opened for, when the platform knows it.
        #[serde(default)]
        requester: Option<UserId>,
    },
    /// A control-message button was pressed.
    ActionRequested {
        /// Ticket the control message belongs to.
        ticket: TicketId,
        /// Who pressed it.
        actor: ActorRef,
        /// Which button.
        action: ActionId,
    },
    /// A message was posted in a ticket channel.
    MessagePosted {
        /// Ticket channel.
        ticket: TicketId,
        /// Author.
        actor: ActorRef,
        /// Message content.
        text: String,
        /// Category the channel currently sits in.
        #[serde(default)]
        category: Option<CategoryId>,
    },
}

impl InboundEvent {
    /// Short event name for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ChannelOpened { .. } => "channel_opened",
            Self::ActionRequested { .. } => "action_requested",
            Self::MessagePosted { .. } => "message_posted",
        }
    }
}
