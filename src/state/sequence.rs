//! Durable ticket number sequence.
//!
//! Every issued number is written to the [`CounterStore`] before the caller
//! sees it, so a restart never reissues a number. A failed write does not
//! block allocation: the in-memory counter still advances and the error is
//! returned alongside the number.

use async_trait::async_trait;
use parking_lot::Mutex as SyncMutex;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::AllocatorError;

/// On-disk counter record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterRecord {
    /// Older deployments wrote `counter` or `lastTicket`.
    #[serde(rename = "lastIssued", alias = "counter", alias = "lastTicket")]
    pub last_issued: u64,
}

/// Persistence for the last issued number.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Read the last persisted value. `Ok(None)` means no record exists.
    async fn load(&self) -> Result<Option<u64>, AllocatorError>;

    /// Durably record `last_issued`.
    async fn store(&self, last_issued: u64) -> Result<(), AllocatorError>;
}

/// JSON file store, replaced atomically through a sibling temp file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "counter".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl CounterStore for JsonFileStore {
    async fn load(&self) -> Result<Option<u64>, AllocatorError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AllocatorError::Load(e)),
        };
        let record: CounterRecord = serde_json::from_str(&raw)?;
        Ok(Some(record.last_issued))
    }

    async fn store(&self, last_issued: u64) -> Result<(), AllocatorError> {
        let body = serde_json::to_vec_pretty(&CounterRecord { last_issued })?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, body)
            .await
            .map_err(AllocatorError::Persistence)?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(AllocatorError::Persistence)
    }
}

/// In-memory store for tests and ephemeral runs.
#[derive(Clone, Default)]
pub struct MemoryCounterStore {
    inner: Arc<SyncMutex<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
    value: Option<u64>,
    fail_writes: bool,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds a record.
    pub fn with_value(last_issued: u64) -> Self {
        let store = Self::default();
        store.inner.lock().value = Some(last_issued);
        store
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.inner.lock().fail_writes = fail;
    }

    /// Last successfully persisted value.
    pub fn value(&self) -> Option<u64> {
        self.inner.lock().value
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn load(&self) -> Result<Option<u64>, AllocatorError> {
        Ok(self.inner.lock().value)
    }

    async fn store(&self, last_issued: u64) -> Result<(), AllocatorError> {
        let mut inner = self.inner.lock();
        if inner.fail_writes {
            return Err(AllocatorError::Persistence(io::Error::other(
                "memory store configured to fail",
            )));
        }
        inner.value = Some(last_issued);
        Ok(())
    }
}

/// A freshly issued number.
#[derive(Debug)]
pub struct Allocation {
    pub number: u64,
    /// Set when the number could not be persisted. The number is still
    /// unique for this process lifetime.
    pub persist_error: Option<AllocatorError>,
}

/// Process-wide allocator. All `next()` calls are totally ordered.
pub struct SequenceAllocator {
    last_issued: Mutex<u64>,
    store: Box<dyn CounterStore>,
}

impl SequenceAllocator {
    /// Load the last issued value, falling back to `start - 1` when the
    /// store has no usable record.
    pub async fn open(store: impl CounterStore + 'static, start: u64) -> Self {
        let fallback = start.saturating_sub(1);
        let last_issued = match store.load().await {
            Ok(Some(value)) => {
                info!(last_issued = value, "Loaded ticket counter");
                value
            }
            Ok(None) => {
                info!(start, "No ticket counter record, starting fresh");
                fallback
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), start, "Ticket counter unreadable, starting fresh");
                fallback
            }
        };

        Self {
            last_issued: Mutex::new(last_issued),
            store: Box::new(store),
        }
    }

    /// Issue the next number, persisting it first.
    ///
    /// Fails only when the counter cannot advance without wrapping; a failed
    /// write is reported in the [`Allocation`] instead.
    pub async fn next(&self) -> Result<Allocation, AllocatorError> {
        let mut last = self.last_issued.lock().await;
        let number = last
            .checked_add(1)
            .ok_or(AllocatorError::Exhausted { last: *last })?;
        // Advance even if the write fails; skips are fine, reuse is not.
        *last = number;

        let persist_error = match self.store.store(number).await {
            Ok(()) => {
                debug!(number, "Ticket number persisted");
                None
            }
            Err(e) => {
                warn!(number, error = %e, "Ticket counter not persisted, counting in memory");
                crate::metrics::record_persist_failure();
                Some(e)
            }
        };

        Ok(Allocation {
            number,
            persist_error,
        })
    }

    /// The last issued number.
    pub async fn last_issued(&self) -> u64 {
        *self.last_issued.lock().await
    }
}
