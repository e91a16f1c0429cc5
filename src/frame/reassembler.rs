//! Inbound helper that rebuilds frames from an unpredictably chunked stream.
//!
//! [`FrameReassembler`] owns the [`ByteArena`] for the adapter stream and a
//! small scan state, so a search interrupted by a short read resumes where it
//! stopped instead of starting over. Scanning is synchronous
//! ([`FrameReassembler::next_buffered`]); the async helpers only add reads
//! from a [`Channel`] when the buffered bytes hold no complete frame.

use std::io;

use bytes::Bytes;
use log::debug;

use super::{Frame, FrameFormat, FramingError};
use crate::{arena::ByteArena, channel::Channel, error::BridgeError, queue::PendingQueue};

/// Progress through the frame currently being scanned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScanState {
    /// Looking for the header token.
    Header,
    /// Header found; looking for the separator that ends the length field.
    Length { field_start: usize },
    /// Length parsed; waiting until `length` bytes follow `start`.
    Payload { start: usize, length: usize },
}

/// Restartable frame scanner over a growing byte arena.
#[derive(Debug)]
pub struct FrameReassembler {
    format: FrameFormat,
    max_payload_length: Option<usize>,
    arena: ByteArena,
    state: ScanState,
}

impl FrameReassembler {
    /// Create a reassembler for `format` with no payload limit.
    #[must_use]
    pub fn new(format: FrameFormat) -> Self {
        Self {
            format,
            max_payload_length: None,
            arena: ByteArena::new(),
            state: ScanState::Header,
        }
    }

    /// Reject frames announcing more than `max` payload bytes.
    ///
    /// `None` leaves the announced length unbounded.
    #[must_use]
    pub fn with_max_payload_length(mut self, max: Option<usize>) -> Self {
        self.max_payload_length = max;
        self
    }

    /// Frame format this reassembler scans for.
    #[must_use]
    pub fn format(&self) -> &FrameFormat { &self.format }

    /// Borrow the underlying arena.
    #[must_use]
    pub fn arena(&self) -> &ByteArena { &self.arena }

    /// Number of bytes read but not yet emitted as part of a frame.
    #[must_use]
    pub fn buffered_len(&self) -> usize { self.arena.len() }

    /// Append a chunk read from the adapter stream.
    pub fn push_chunk(&mut self, chunk: &[u8]) { self.arena.extend(chunk); }

    /// Extract the next complete frame from the buffered bytes.
    ///
    /// Returns `Ok(None)` when more bytes are required. Partial progress is
    /// kept, so calling again after [`push_chunk`](Self::push_chunk) resumes
    /// the interrupted search.
    ///
    /// # Errors
    ///
    /// Returns [`FramingError`] if a length field is malformed or exceeds the
    /// configured maximum.
    pub fn next_buffered(&mut self) -> Result<Option<Frame>, FramingError> {
        loop {
            match self.state {
                ScanState::Header => {
                    let header = self.format.header();
                    let Some(pos) = self.arena.find(header, self.arena.cursor()) else {
                        let floor = self.arena.cursor();
                        self.arena.rewind_for_token(header.len(), floor);
                        return Ok(None);
                    };
                    let field_start = pos + header.len();
                    self.arena.set_cursor(field_start);
                    self.state = ScanState::Length { field_start };
                }
                ScanState::Length { field_start } => {
                    let separator = self.format.separator();
                    let Some(pos) = self.arena.find(separator, self.arena.cursor()) else {
                        self.arena.rewind_for_token(separator.len(), field_start);
                        return Ok(None);
                    };
                    let length = parse_length(
                        self.arena.slice(field_start, pos),
                        self.max_payload_length,
                    )?;
                    let start = pos + separator.len();
                    self.arena.set_cursor(start);
                    self.state = ScanState::Payload { start, length };
                }
                ScanState::Payload { start, length } => {
                    if self.arena.len() - start < length {
                        return Ok(None);
                    }
                    let payload = self.arena.take_range(start, start + length);
                    self.state = ScanState::Header;
                    return Ok(Some(Frame::new(payload)));
                }
            }
        }
    }

    /// Return the next frame, reading from `source` until one is complete.
    ///
    /// Bytes already buffered are used first; no read is issued while a
    /// complete frame is available.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Framing`] for malformed frames and
    /// [`BridgeError::Io`] if `source` fails or closes.
    pub async fn next_frame<S>(&mut self, source: &mut S) -> Result<Frame, BridgeError>
    where
        S: Channel + ?Sized,
    {
        loop {
            if let Some(frame) = self.next_buffered()? {
                return Ok(frame);
            }
            self.fill(source).await?;
        }
    }

    /// Push every buffered frame to `queue`, reading from `source` until at
    /// least one frame has been produced.
    ///
    /// Once a frame is emitted, any trailing partial frame stays in the arena
    /// for a later call; no further read is issued. Returns the number of
    /// frames queued.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Framing`] for malformed frames and
    /// [`BridgeError::Io`] if `source` fails or closes. Frames completed
    /// before the error remain queued.
    pub async fn read_frames<S>(
        &mut self,
        source: &mut S,
        queue: &mut PendingQueue,
    ) -> Result<usize, BridgeError>
    where
        S: Channel + ?Sized,
    {
        let mut emitted = 0;
        loop {
            while let Some(frame) = self.next_buffered()? {
                debug!(
                    "frame reassembled: length={}, buffered={}",
                    frame.declared_length(),
                    self.arena.len()
                );
                queue.push(frame.into_payload());
                emitted += 1;
            }
            if emitted > 0 {
                crate::metrics::inc_frames(emitted);
                return Ok(emitted);
            }
            self.fill(source).await?;
        }
    }

    async fn fill<S>(&mut self, source: &mut S) -> io::Result<()>
    where
        S: Channel + ?Sized,
    {
        let chunk: Bytes = source.read().await?;
        self.arena.extend(&chunk);
        Ok(())
    }
}

/// Parse a decimal length field, ignoring surrounding ASCII whitespace.
fn parse_length(field: &[u8], max: Option<usize>) -> Result<usize, FramingError> {
    let invalid = || FramingError::InvalidLength {
        field: String::from_utf8_lossy(field).into_owned(),
    };
    let digits = field.trim_ascii();
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }
    let length = digits
        .iter()
        .try_fold(0usize, |acc, digit| {
            acc.checked_mul(10)?.checked_add(usize::from(digit - b'0'))
        })
        .ok_or_else(invalid)?;
    match max {
        Some(max) if length > max => Err(FramingError::OversizedFrame { size: length, max }),
        _ => Ok(length),
    }
}
