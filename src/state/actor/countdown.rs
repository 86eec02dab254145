//! Scheduled removal of closed tickets.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

use super::TicketEvent;

/// A single scheduled `Expire` for a closed ticket.
///
/// Dropping the countdown cancels it, so it never outlives its ticket.
#[derive(Debug)]
pub struct CloseCountdown {
    handle: JoinHandle<()>,
    due: Option<DateTime<Utc>>,
}

impl CloseCountdown {
    /// Send `Expire` to the ticket's mailbox after `delay`.
    ///
    /// Holds only a weak sender so a pending countdown does not keep the
    /// ticket's mailbox open.
    pub fn arm(delay: Duration, mailbox: mpsc::WeakSender<TicketEvent>) -> Self {
        let due = chrono::Duration::from_std(delay)
            .ok()
            .and_then(|d| Utc::now().checked_add_signed(d));
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match mailbox.upgrade() {
                Some(tx) => {
                    let _ = tx.send(TicketEvent::Expire).await;
                }
                None => trace!("Close countdown fired for a retired ticket"),
            }
        });
        Self { handle, due }
    }

    /// Wall-clock time the countdown fires.
    pub fn due(&self) -> Option<DateTime<Utc>> {
        self.due
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for CloseCountdown {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn settle(countdown: &CloseCountdown) {
        for _ in 0..16 {
            if countdown.is_finished() {
                break;
            }
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_delay() {
        let (tx, mut rx) = mpsc::channel(4);
        let countdown = CloseCountdown::arm(Duration::from_secs(60), tx.downgrade());
        assert!(countdown.due().is_some());

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(matches!(rx.recv().await, Some(TicketEvent::Expire)));
        settle(&countdown).await;
        assert!(countdown.is_finished());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_expiry() {
        let (tx, mut rx) = mpsc::channel(4);
        let countdown = CloseCountdown::arm(Duration::from_secs(60), tx.downgrade());
        countdown.cancel();
        tokio::time::advance(Duration::from_secs(120)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_mailbox_is_ignored() {
        let (tx, rx) = mpsc::channel::<TicketEvent>(4);
        let weak = tx.downgrade();
        drop(tx);
        drop(rx);
        let countdown = CloseCountdown::arm(Duration::from_secs(1), weak);
        tokio::time::advance(Duration::from_secs(2)).await;
        settle(&countdown).await;
        assert!(countdown.is_finished());
    }
}
