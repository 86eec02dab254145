//! Opaque platform identifiers.
//!
//! Platforms hand out snowflake-style ids as strings; the core never
//! interprets them beyond equality, so each kind gets its own newtype to keep
//! a user id from being passed where a channel id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(
        $(#[$meta:meta])*
        $name:ident
    ),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(String);

            impl $name {
                /// Wrap a raw platform id.
                pub fn new(raw: impl Into<String>) -> Self {
                    Self(raw.into())
                }

                /// The raw platform id.
                pub fn as_str(&self) -> &str {
                    &self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }

            impl From<&str> for $name {
                fn from(raw: &str) -> Self {
                    Self(raw.to_string())
                }
            }

            impl From<String> for $name {
                fn from(raw: String) -> Self {
                    Self(raw)
                }
            }
        )*
    };
}

define_id! {
    /// Id of the channel backing a ticket.
    TicketId,
    /// Id of a platform user.
    UserId,
    /// Id of a platform role.
    RoleId,
    /// Id of a channel category.
    CategoryId,
    /// Id of a posted message.
    MessageId,
}

impl UserId {
    /// Platform mention markup for this user.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.0)
    }
}
