//! Auto-claim rule configuration.

use serde::Deserialize;

/// How a message posted in a category is recognized as an implicit claim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AutoClaimRule {
    /// Message contains the keyword (case-insensitive).
    Keyword { value: String },
    /// Message matches the regular expression (typically a link pattern).
    Pattern { regex: String },
}
