//! Error types for the bridge protocol.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Protocol-level errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A frame could not be serialized.
    #[error("frame encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// A line exceeded the configured frame limit.
    #[error("frame too long: limit is {limit} bytes")]
    FrameTooLong {
        /// The configured limit.
        limit: usize,
    },
}

/// A complete line that did not decode as a frame.
///
/// Unlike [`ProtocolError`], this does not end the stream: the line has been
/// consumed and the next one can be read.
#[derive(Debug, Error)]
#[error("undecodable frame: {source}")]
pub struct MalformedFrame {
    /// The line's `seq`, when it could still be read.
    pub seq: Option<u64>,
    /// Why the line was rejected.
    pub source: serde_json::Error,
}

#[cfg(feature = "tokio")]
impl MalformedFrame {
    pub(crate) fn new(line: &str, source: serde_json::Error) -> Self {
        let seq = serde_json::from_str::<serde_json::Value>(line)
            .ok()
            .and_then(|value| value.get("seq")?.as_u64());
        Self { seq, source }
    }
}
