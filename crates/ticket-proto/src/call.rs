//! Outbound calls the core asks a bridge to perform on the platform.

use serde::{Deserialize, Serialize};

use crate::action::ActionId;
use crate::id::{CategoryId, MessageId, RoleId, TicketId, UserId};

/// Visual style of a control button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    /// Green.
    Success,
    /// Blurple.
    Primary,
    /// Grey.
    Secondary,
    /// Red.
    Danger,
}

/// One button on a control message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    /// Action the button triggers; serialized as the button custom id.
    pub action: ActionId,
    /// Display label.
    pub label: String,
    /// Display style.
    pub style: ButtonStyle,
}

impl Button {
    /// The standard button for an action.
    pub fn for_action(action: ActionId) -> Self {
        let (label, style) = match action {
            ActionId::Claim => ("✅ Claim Ticket", ButtonStyle::Success),
            ActionId::RequestHelp => ("🆘 Request Help", ButtonStyle::Primary),
            ActionId::Close => ("❌ Close Ticket", ButtonStyle::Danger),
        };
        Self {
            action,
            label: label.to_string(),
            style,
        }
    }
}

/// The set of actions rendered on a control message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlSpec {
    /// Buttons in display order.
    pub buttons: Vec<Button>,
}

impl ControlSpec {
    /// Build a spec with the standard button for each action.
    pub fn from_actions(actions: &[ActionId]) -> Self {
        Self {
            buttons: actions.iter().copied().map(Button::for_action).collect(),
        }
    }

    /// Actions exposed by this spec.
    pub fn actions(&self) -> Vec<ActionId> {
        self.buttons.iter().map(|b| b.action).collect()
    }

    /// Whether the spec offers no actions at all.
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }
}

/// A channel permission relevant to tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// See the channel.
    ViewChannel,
    /// Post messages.
    SendMessages,
}

/// Who a permission overwrite applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum OverwriteTarget {
    /// A role.
    Role(RoleId),
    /// A single member.
    Member(UserId),
}

/// A channel permission overwrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionOverwrite {
    /// Role or member.
    pub target: OverwriteTarget,
    /// Explicitly granted permissions.
    #[serde(default)]
    pub allow: Vec<Permission>,
    /// Explicitly denied permissions.
    #[serde(default)]
    pub deny: Vec<Permission>,
}

/// A platform operation requested by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundCall {
    /// Rename the ticket channel.
    RenameChannel {
        /// Ticket channel.
        ticket: TicketId,
        /// New display name.
        name: String,
    },
    /// Mirror the claimant into channel metadata (the topic).
    SetTopicMarker {
        /// Ticket channel.
        ticket: TicketId,
        /// Current claimant, `None` to clear.
        claimant: Option<UserId>,
    },
    /// Post a message, optionally carrying a control surface.
    ///
    /// The bridge answers with the id of the posted message.
    PostMessage {
        /// Ticket channel.
        ticket: TicketId,
        /// Message text.
        content: String,
        /// Buttons to attach.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        control: Option<ControlSpec>,
    },
    /// Delete a previously posted message.
    DeleteMessage {
        /// Ticket channel.
        ticket: TicketId,
        /// Message to delete.
        message: MessageId,
    },
    /// Move the channel under another category.
    MoveToCategory {
        /// Ticket channel.
        ticket: TicketId,
        /// Destination category.
        category: CategoryId,
    },
    /// Replace the channel's permission overwrites.
    SetPermissions {
        /// Ticket channel.
        ticket: TicketId,
        /// New overwrite list.
        overwrites: Vec<PermissionOverwrite>,
    },
    /// Direct-message a user.
    SendDirectNotification {
        /// Recipient.
        user: UserId,
        /// Message text.
        content: String,
    },
    /// Delete the ticket channel.
    DeleteChannel {
        /// Ticket channel.
        ticket: TicketId,
    },
}

impl OutboundCall {
    /// Short call name for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RenameChannel { .. } => "rename_channel",
            Self::SetTopicMarker { .. } => "set_topic_marker",
            Self::PostMessage { .. } => "post_message",
            Self::DeleteMessage { .. } => "delete_message",
            Self::MoveToCategory { .. } => "move_to_category",
            Self::SetPermissions { .. } => "set_permissions",
            Self::SendDirectNotification { .. } => "send_direct_notification",
            Self::DeleteChannel { .. } => "delete_channel",
        }
    }
}
