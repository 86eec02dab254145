//! Test bridge adapter.
//!
//! Connects to a daemon, sends events and answers its outbound calls the
//! way a platform adapter would.

#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::time::Duration;
use ticket_proto::{
    BridgeCodec, BridgeFrame, CallResult, CoreFrame, InboundEvent, MessageId, OutboundCall,
    Outcome,
};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_util::codec::Framed;

pub struct TestBridge {
    framed: Framed<TcpStream, BridgeCodec>,
    next_seq: u64,
    next_message: u64,
    /// Every call received so far, in arrival order.
    pub calls: Vec<OutboundCall>,
    /// Answer calls with a failure instead of success.
    pub fail_calls: bool,
}

impl TestBridge {
    pub async fn connect(addr: SocketAddr) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self {
            framed: Framed::new(stream, BridgeCodec::new()),
            next_seq: 1,
            next_message: 0,
            calls: Vec::new(),
            fail_calls: false,
        })
    }

    /// Take the next `seq` without sending anything.
    pub fn reserve_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Send an event and return its `seq`.
    pub async fn send_event(&mut self, event: InboundEvent) -> anyhow::Result<u64> {
        let seq = self.reserve_seq();
        self.framed.send(BridgeFrame::Event { seq, event }).await?;
        Ok(seq)
    }

    /// Write one line as-is, bypassing the codec.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        let stream = self.framed.get_mut();
        stream.write_all(line.as_bytes()).await?;
        stream.write_all(b"\n").await?;
        Ok(())
    }

    /// Receive the next frame.
    pub async fn recv(&mut self) -> anyhow::Result<CoreFrame> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<CoreFrame> {
        match timeout(dur, self.framed.next()).await? {
            Some(frame) => Ok(frame??),
            None => anyhow::bail!("daemon closed the connection"),
        }
    }

    /// Answer one call the way the platform would.
    pub async fn answer(&mut self, call_id: u64, call: &OutboundCall) -> anyhow::Result<()> {
        let result = if self.fail_calls {
            CallResult::Failed {
                reason: "Missing Access".to_string(),
            }
        } else if matches!(call, OutboundCall::PostMessage { .. }) {
            self.next_message += 1;
            CallResult::Ok {
                message: Some(MessageId::new(format!("bridge-msg-{}", self.next_message))),
            }
        } else {
            CallResult::Ok { message: None }
        };
        self.framed
            .send(BridgeFrame::CallResult { call_id, result })
            .await?;
        Ok(())
    }

    /// Send an event and wait for its outcome, answering calls meanwhile.
    pub async fn request(&mut self, event: InboundEvent) -> anyhow::Result<Outcome> {
        let seq = self.send_event(event).await?;
        self.outcome_for(seq).await
    }

    /// Wait for the outcome of `seq`, answering calls meanwhile.
    pub async fn outcome_for(&mut self, seq: u64) -> anyhow::Result<Outcome> {
        loop {
            match self.recv().await? {
                CoreFrame::Outcome { seq: got, outcome } if got == seq => return Ok(outcome),
                CoreFrame::Outcome { seq: got, .. } => {
                    anyhow::bail!("unexpected outcome for seq {got} while waiting for {seq}")
                }
                CoreFrame::Call { call_id, call } => {
                    self.answer(call_id, &call).await?;
                    self.calls.push(call);
                }
            }
        }
    }

    /// Answer calls until `count` calls have been received in total.
    pub async fn serve_calls(&mut self, count: usize) -> anyhow::Result<()> {
        while self.calls.len() < count {
            match self.recv().await? {
                CoreFrame::Call { call_id, call } => {
                    self.answer(call_id, &call).await?;
                    self.calls.push(call);
                }
                CoreFrame::Outcome { seq, .. } => {
                    anyhow::bail!("unexpected outcome for seq {seq}")
                }
            }
        }
        Ok(())
    }

    pub fn call_kinds(&self) -> Vec<&'static str> {
        self.calls.iter().map(OutboundCall::kind).collect()
    }
}
