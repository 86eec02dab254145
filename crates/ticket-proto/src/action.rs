//! Staff actions exposed on control messages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An action a staff member can request on a ticket.
///
/// On the wire these use the custom ids attached to control-message buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionId {
    /// Take responsibility for the ticket.
    #[serde(rename = "claim_ticket")]
    Claim,
    /// Release the ticket back to other staff.
    #[serde(rename = "request_help")]
    RequestHelp,
    /// Close and archive the ticket.
    #[serde(rename = "close_ticket")]
    Close,
}

impl ActionId {
    /// All actions, in control-message display order.
    pub const ALL: [ActionId; 3] = [ActionId::Claim, ActionId::RequestHelp, ActionId::Close];

    /// Short label used for metrics and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Claim => "claim",
            Self::RequestHelp => "request_help",
            Self::Close => "close",
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
