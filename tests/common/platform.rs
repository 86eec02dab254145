//! In-memory platform that records every outbound call.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use ticket_proto::{MessageId, OutboundCall};
use ticketd::error::PlatformError;
use ticketd::services::{CallReply, Platform};

/// Records calls and answers posts with fresh message ids.
#[derive(Default)]
pub struct RecordingPlatform {
    calls: Mutex<Vec<OutboundCall>>,
    failing: AtomicBool,
    next_message: AtomicU64,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (still recorded).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<OutboundCall> {
        self.calls.lock().clone()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.calls.lock().iter().map(OutboundCall::kind).collect()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    /// Wait until `predicate` holds for the recorded calls.
    pub async fn wait_for<F>(&self, mut predicate: F, limit: Duration) -> anyhow::Result<()>
    where
        F: FnMut(&[OutboundCall]) -> bool,
    {
        tokio::time::timeout(limit, async {
            loop {
                if predicate(&self.calls.lock()) {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .map_err(|_| anyhow::anyhow!("timed out; calls so far: {:?}", self.kinds()))
    }
}

#[async_trait]
impl Platform for RecordingPlatform {
    async fn execute(&self, call: OutboundCall) -> Result<CallReply, PlatformError> {
        let is_post = matches!(call, OutboundCall::PostMessage { .. });
        self.calls.lock().push(call);

        if self.failing.load(Ordering::SeqCst) {
            return Err(PlatformError::Rejected("Missing Access".to_string()));
        }
        if is_post {
            let n = self.next_message.fetch_add(1, Ordering::SeqCst) + 1;
            return Ok(CallReply::posted(MessageId::new(format!("msg-{n}"))));
        }
        Ok(CallReply::default())
    }
}
