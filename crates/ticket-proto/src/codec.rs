//! JSON-lines codec for tokio.
//!
//! Wraps [`LinesCodec`] and (de)serializes each line as one frame. Blank
//! lines are skipped so adapters can use them as keepalives.
//!
//! A line that is framed correctly but does not decode is yielded as
//! `Err(MalformedFrame)` and the stream continues. Overlong lines and I/O
//! errors are fatal.

use std::marker::PhantomData;

use bytes::BytesMut;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::codec::{Decoder, Encoder, LinesCodec, LinesCodecError};

use crate::error::{self, MalformedFrame, ProtocolError};
use crate::frame::{BridgeFrame, CoreFrame};

/// Default per-line limit (64 KiB).
pub const DEFAULT_MAX_FRAME_LEN: usize = 64 * 1024;

/// Codec decoding `In` frames and encoding `Out` frames, one JSON document
/// per line.
pub struct JsonLinesCodec<In, Out> {
    inner: LinesCodec,
    limit: usize,
    _marker: PhantomData<fn() -> (In, Out)>,
}

/// Codec used by the core: reads bridge frames, writes core frames.
pub type CoreCodec = JsonLinesCodec<BridgeFrame, CoreFrame>;

/// Codec used by a bridge: reads core frames, writes bridge frames.
pub type BridgeCodec = JsonLinesCodec<CoreFrame, BridgeFrame>;

impl<In, Out> JsonLinesCodec<In, Out> {
    /// Create a codec with the default line limit.
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_FRAME_LEN)
    }

    /// Create a codec with a custom line limit in bytes.
    pub fn with_max_len(limit: usize) -> Self {
        Self {
            inner: LinesCodec::new_with_max_length(limit),
            limit,
            _marker: PhantomData,
        }
    }

    fn map_err(&self, err: LinesCodecError) -> ProtocolError {
        match err {
            LinesCodecError::MaxLineLengthExceeded => ProtocolError::FrameTooLong { limit: self.limit },
            LinesCodecError::Io(e) => ProtocolError::Io(e),
        }
    }

    fn parse(line: &str) -> Option<Result<In, MalformedFrame>>
    where
        In: DeserializeOwned,
    {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(serde_json::from_str(trimmed).map_err(|e| MalformedFrame::new(trimmed, e)))
    }
}

impl<In, Out> Default for JsonLinesCodec<In, Out> {
    fn default() -> Self {
        Self::new()
    }
}

impl<In: DeserializeOwned, Out> Decoder for JsonLinesCodec<In, Out> {
    type Item = Result<In, MalformedFrame>;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<Self::Item>> {
        loop {
            match self.inner.decode(src).map_err(|e| self.map_err(e))? {
                Some(line) => {
                    if let Some(frame) = Self::parse(&line) {
                        return Ok(Some(frame));
                    }
                }
                None => return Ok(None),
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> error::Result<Option<Self::Item>> {
        loop {
            match self.inner.decode_eof(src).map_err(|e| self.map_err(e))? {
                Some(line) => {
                    if let Some(frame) = Self::parse(&line) {
                        return Ok(Some(frame));
                    }
                }
                None => return Ok(None),
            }
        }
    }
}

impl<In, Out: Serialize> Encoder<Out> for JsonLinesCodec<In, Out> {
    type Error = ProtocolError;

    fn encode(&mut self, frame: Out, dst: &mut BytesMut) -> error::Result<()> {
        let line = serde_json::to_string(&frame)?;
        self.inner
            .encode(line.as_str(), dst)
            .map_err(|e| self.map_err(e))
    }
}
