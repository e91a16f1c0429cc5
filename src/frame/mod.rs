//! Header-delimited framing used on the adapter stream.
//!
//! Each frame on the wire is `<header><decimal length><separator><payload>`,
//! for example `Content-Length: 5\r\n\r\nhello`. [`FrameFormat`] describes the
//! header token and separator, [`FrameReassembler`] rebuilds frames from
//! arbitrarily chunked reads, and the [`Encoder`] implementation on
//! [`FrameFormat`] writes frames for peers and tests.

use std::io;

use bytes::{BufMut, Bytes, BytesMut};
use tokio_util::codec::Encoder;

pub mod error;
pub mod reassembler;

pub use error::{FrameFormatError, FramingError};
pub use reassembler::FrameReassembler;

/// Header token used by debug adapters.
pub const CONTENT_LENGTH_HEADER: &[u8] = b"Content-Length:";

/// Separator between the header block and the payload.
pub const HEADER_SEPARATOR: &[u8] = b"\r\n\r\n";

/// One complete unit extracted from the adapter stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    payload: Bytes,
}

impl Frame {
    /// Wrap a complete payload.
    #[must_use]
    pub fn new(payload: Bytes) -> Self { Self { payload } }

    /// Length announced by the frame header.
    ///
    /// A frame is only ever built once all announced bytes are present, so
    /// this always equals the payload length.
    #[must_use]
    pub fn declared_length(&self) -> usize { self.payload.len() }

    /// Borrow the payload bytes.
    #[must_use]
    pub fn payload(&self) -> &[u8] { &self.payload }

    /// Consume the frame, returning the owned payload.
    #[must_use]
    pub fn into_payload(self) -> Bytes { self.payload }
}

/// Header token and separator delimiting frames on the adapter stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameFormat {
    header: Bytes,
    separator: Bytes,
}

impl FrameFormat {
    /// Build a format from a header token and separator.
    ///
    /// # Errors
    ///
    /// Returns [`FrameFormatError`] if either token is empty.
    pub fn new(
        header: impl Into<Bytes>,
        separator: impl Into<Bytes>,
    ) -> Result<Self, FrameFormatError> {
        let header = header.into();
        let separator = separator.into();
        if header.is_empty() {
            return Err(FrameFormatError::EmptyHeader);
        }
        if separator.is_empty() {
            return Err(FrameFormatError::EmptySeparator);
        }
        Ok(Self { header, separator })
    }

    /// Header token that opens every frame.
    #[must_use]
    pub fn header(&self) -> &[u8] { &self.header }

    /// Separator terminating the length field.
    #[must_use]
    pub fn separator(&self) -> &[u8] { &self.separator }

    /// Number of bytes the header block adds in front of a payload of
    /// `payload_len` bytes.
    #[must_use]
    pub fn overhead(&self, payload_len: usize) -> usize {
        self.header.len() + decimal_width(payload_len) + self.separator.len()
    }
}

impl Default for FrameFormat {
    fn default() -> Self {
        Self {
            header: Bytes::from_static(CONTENT_LENGTH_HEADER),
            separator: Bytes::from_static(HEADER_SEPARATOR),
        }
    }
}

impl Encoder<Bytes> for FrameFormat {
    type Error = io::Error;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let length = item.len().to_string();
        dst.reserve(self.overhead(item.len()) + item.len());
        dst.put_slice(&self.header);
        dst.put_slice(length.as_bytes());
        dst.put_slice(&self.separator);
        dst.put_slice(&item);
        Ok(())
    }
}

fn decimal_width(mut value: usize) -> usize {
    let mut width = 1;
    while value >= 10 {
        value /= 10;
        width += 1;
    }
    width
}
