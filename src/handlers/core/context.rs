//! Handler context and the event handler trait.

use async_trait::async_trait;
use std::sync::Arc;
use ticket_proto::{CategoryId, InboundEvent, Outcome};

use crate::caps::CapabilityAuthority;
use crate::config::Config;
use crate::services::AutoClaimRules;
use crate::state::TicketRegistry;

/// Which new channels are tickets.
#[derive(Debug, Clone)]
pub struct TicketPattern {
    pub prefix: String,
    /// Required parent category, when configured.
    pub category: Option<CategoryId>,
}

impl TicketPattern {
    pub fn matches(&self, name: &str, category: Option<&CategoryId>) -> bool {
        name.starts_with(&self.prefix)
            && self
                .category
                .as_ref()
                .is_none_or(|required| category == Some(required))
    }
}

/// Shared state passed to every handler.
pub struct Context {
    pub registry: Arc<TicketRegistry>,
    pub authority: CapabilityAuthority,
    pub autoclaim: AutoClaimRules,
    pub pattern: TicketPattern,
}

impl Context {
    /// Build the context from configuration.
    ///
    /// Fails only on an auto-claim pattern that does not compile, which
    /// startup validation already reports.
    pub fn new(config: &Config, registry: Arc<TicketRegistry>) -> Result<Self, regex::Error> {
        Ok(Self {
            registry,
            authority: CapabilityAuthority::new(&config.roles),
            autoclaim: AutoClaimRules::compile(&config.autoclaim)?,
            pattern: TicketPattern {
                prefix: config.tickets.name_prefix.clone(),
                category: config.tickets.category.clone(),
            },
        })
    }
}

/// Handles one kind of inbound event.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Process the event and produce the outcome for the acting user.
    async fn handle(&self, ctx: &Context, event: InboundEvent) -> Outcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_requires_prefix_and_category() {
        let pattern = TicketPattern {
            prefix: "ticket-".into(),
            category: Some(CategoryId::from("support")),
        };
        let support = CategoryId::from("support");
        assert!(pattern.matches("ticket-0042", Some(&support)));
        assert!(!pattern.matches("ticket-0042", None));
        assert!(!pattern.matches("ticket-0042", Some(&CategoryId::from("other"))));
        assert!(!pattern.matches("general", Some(&support)));
    }

    #[test]
    fn pattern_without_category_accepts_any() {
        let pattern = TicketPattern {
            prefix: "ticket-".into(),
            category: None,
        };
        assert!(pattern.matches("ticket-1", None));
        assert!(pattern.matches("ticket-1", Some(&CategoryId::from("x"))));
    }
}
