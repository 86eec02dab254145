//! Compiled auto-claim rules.
//!
//! A message posted in a configured category claims the ticket for its
//! author when the content matches that category's rule.

use regex::Regex;
use std::collections::HashMap;
use ticket_proto::CategoryId;

use crate::config::AutoClaimRule;

#[derive(Debug)]
enum Matcher {
    /// Lowercased keyword, matched case-insensitively as a substring.
    Keyword(String),
    Pattern(Regex),
}

impl Matcher {
    fn matches(&self, text: &str) -> bool {
        match self {
            Self::Keyword(keyword) => text.to_lowercase().contains(keyword.as_str()),
            Self::Pattern(regex) => regex.is_match(text),
        }
    }
}

/// Per-category matchers.
#[derive(Debug, Default)]
pub struct AutoClaimRules {
    rules: HashMap<CategoryId, Matcher>,
}

impl AutoClaimRules {
    /// Compile the configured rules.
    pub fn compile(rules: &HashMap<CategoryId, AutoClaimRule>) -> Result<Self, regex::Error> {
        let mut compiled = HashMap::with_capacity(rules.len());
        for (category, rule) in rules {
            let matcher = match rule {
                AutoClaimRule::Keyword { value } => Matcher::Keyword(value.trim().to_lowercase()),
                AutoClaimRule::Pattern { regex } => Matcher::Pattern(Regex::new(regex)?),
            };
            compiled.insert(category.clone(), matcher);
        }
        Ok(Self { rules: compiled })
    }

    /// Whether a message in `category` triggers an auto-claim.
    pub fn matches(&self, category: Option<&CategoryId>, text: &str) -> bool {
        category
            .and_then(|c| self.rules.get(c))
            .is_some_and(|m| m.matches(text))
    }
}
