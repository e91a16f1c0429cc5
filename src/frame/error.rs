//! Error types for the framing layer.
//!
//! - [`FramingError`]: the adapter stream broke the wire format. Fatal to the session.
//! - [`FrameFormatError`]: a frame format was configured with an unusable token.

use thiserror::Error;

/// Wire-level errors raised while reassembling frames.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FramingError {
    /// The length field is empty, contains a non-digit, or overflows `usize`.
    #[error("invalid length field {field:?}")]
    InvalidLength {
        /// Raw length field, lossily decoded for diagnostics.
        field: String,
    },

    /// The length field announces more bytes than the configured maximum.
    #[error("frame exceeds max length: {size} > {max}")]
    OversizedFrame {
        /// Length announced by the header.
        size: usize,
        /// Maximum allowed payload length.
        max: usize,
    },
}

/// Errors raised when building a [`FrameFormat`](super::FrameFormat).
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum FrameFormatError {
    /// The header token is empty.
    #[error("frame header token must not be empty")]
    EmptyHeader,
    /// The separator is empty.
    #[error("frame separator must not be empty")]
    EmptySeparator,
}
