//! Inbound event handlers.
//!
//! The [`Router`] maps each bridge event to a handler, which turns it into a
//! registry operation and an [`Outcome`](ticket_proto::Outcome) for the
//! acting user.

mod autoclaim;
pub mod core;
mod interaction;
mod ticket_open;

pub use self::autoclaim::MessagePostedHandler;
pub use self::core::{Context, EventHandler, Router, TicketPattern};
pub use self::interaction::ActionRequestedHandler;
pub use self::ticket_open::ChannelOpenedHandler;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::PlatformError;
    use crate::services::{CallReply, Platform};
    use crate::state::{MemoryCounterStore, SequenceAllocator, TicketRegistry, TicketSettings};
    use async_trait::async_trait;
    use std::sync::Arc;
    use ticket_proto::{ActionId, ActorRef, CategoryId, InboundEvent, OutboundCall, RoleId, TicketId};

    struct Accepting;

    #[async_trait]
    impl Platform for Accepting {
        async fn execute(&self, _call: OutboundCall) -> Result<CallReply, PlatformError> {
            Ok(CallReply::default())
        }
    }

    const CONFIG: &str = r#"
[tickets]
category = "support"
start_number = 4176
delete_after_secs = 0

[roles]
staff = ["staff"]

[autoclaim."orders"]
kind = "keyword"
value = "claiming"
"#;

    async fn router() -> Router {
        let config = Config::parse(CONFIG).unwrap();
        let allocator = Arc::new(SequenceAllocator::open(MemoryCounterStore::new(), 4176).await);
        let registry = Arc::new(TicketRegistry::new(
            allocator,
            Arc::new(Accepting),
            TicketSettings::from_config(&config),
        ));
        Router::new(Context::new(&config, registry).unwrap())
    }

    fn opened(channel: &str, name: &str, category: Option<&str>) -> InboundEvent {
        InboundEvent::ChannelOpened {
            channel: TicketId::from(channel),
            name: name.into(),
            category: category.map(CategoryId::from),
            requester: None,
        }
    }

    fn press(ticket: &str, actor: &str, roles: &[&str], action: ActionId) -> InboundEvent {
        InboundEvent::ActionRequested {
            ticket: TicketId::from(ticket),
            actor: ActorRef::new(actor, roles.iter().map(|r| RoleId::from(*r))),
            action,
        }
    }

    #[tokio::test]
    async fn only_matching_channels_become_tickets() {
        let router = router().await;
        assert!(!router.dispatch(opened("1", "general", Some("support"))).await.accepted);
        assert!(!router.dispatch(opened("2", "ticket-a", Some("other"))).await.accepted);

        let outcome = router.dispatch(opened("3", "ticket-b", Some("support"))).await;
        assert!(outcome.accepted);
        assert_eq!(outcome.ticket, Some(4176));

        let again = router.dispatch(opened("3", "ticket-b", Some("support"))).await;
        assert!(!again.accepted);
        assert_eq!(router.context().registry.len(), 1);
    }

    #[tokio::test]
    async fn rejections_carry_actor_notice() {
        let router = router().await;
        router.dispatch(opened("t", "ticket-x", Some("support"))).await;

        let member = router.dispatch(press("t", "m", &[], ActionId::Claim)).await;
        assert!(!member.accepted);
        assert_eq!(member.notice.as_deref(), Some("❌ Only staff can use these buttons."));

        assert!(router.dispatch(press("t", "a", &["staff"], ActionId::Claim)).await.accepted);
        let lost = router.dispatch(press("t", "b", &["staff"], ActionId::Claim)).await;
        assert!(!lost.accepted);
        assert!(lost.notice.unwrap().contains("<@a>"));

        let again = router.dispatch(press("t", "a", &["staff"], ActionId::Claim)).await;
        assert!(again.accepted);
        assert!(again.notice.is_some());
    }

    #[tokio::test]
    async fn autoclaim_fires_only_in_configured_category() {
        let router = router().await;
        router.dispatch(opened("t", "ticket-x", Some("support"))).await;

        let post = |category: &str, text: &str| InboundEvent::MessagePosted {
            ticket: TicketId::from("t"),
            actor: ActorRef::new("a", [RoleId::from("staff")]),
            text: text.into(),
            category: Some(CategoryId::from(category)),
        };

        assert!(!router.dispatch(post("support", "claiming")).await.accepted);
        assert!(!router.dispatch(post("orders", "hello")).await.accepted);
        assert!(router.dispatch(post("orders", "I'm CLAIMING this")).await.accepted);

        let ticket = router
            .context()
            .registry
            .snapshot(&TicketId::from("t"))
            .await
            .unwrap();
        assert_eq!(ticket.claimant().map(|c| c.as_str()), Some("a"));

        // A second auto-claim by someone else is silently dropped.
        let rival = InboundEvent::MessagePosted {
            ticket: TicketId::from("t"),
            actor: ActorRef::new("b", [RoleId::from("staff")]),
            text: "claiming".into(),
            category: Some(CategoryId::from("orders")),
        };
        let outcome = router.dispatch(rival).await;
        assert!(!outcome.accepted);
        assert!(outcome.notice.is_none());
    }
}
