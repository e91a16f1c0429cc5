//! Canonical error and result types for the crate.
//!
//! This module defines the single public `BridgeError` surface returned by
//! the event loop and the session. Every variant is fatal to the session that
//! raised it; recoverable decode failures never reach this type and are
//! handled at the decode boundary instead.

use std::io;

use thiserror::Error;

use crate::frame::FramingError;

/// Top-level error type exposed by `dapbridge`.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The adapter stream violated the framing protocol.
    #[error("framing error: {0}")]
    Framing(#[from] FramingError),

    /// A channel failed or was disconnected by its peer.
    #[error("transport error: {0}")]
    Io(#[from] io::Error),
}

impl BridgeError {
    /// Returns true if this error represents a peer closing its end of a
    /// channel rather than a protocol or transport fault.
    #[must_use]
    pub fn is_clean_close(&self) -> bool {
        matches!(
            self,
            Self::Io(error) if matches!(
                error.kind(),
                io::ErrorKind::UnexpectedEof | io::ErrorKind::BrokenPipe
            )
        )
    }
}

/// Canonical result alias used by `dapbridge` public APIs.
pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use std::io;

    use rstest::rstest;

    use super::BridgeError;
    use crate::frame::FramingError;

    #[rstest]
    #[case(io::ErrorKind::UnexpectedEof, true)]
    #[case(io::ErrorKind::BrokenPipe, true)]
    #[case(io::ErrorKind::ConnectionReset, false)]
    fn io_errors_classify_clean_close(#[case] kind: io::ErrorKind, #[case] clean: bool) {
        let err = BridgeError::from(io::Error::new(kind, "peer"));
        assert_eq!(err.is_clean_close(), clean);
    }

    #[test]
    fn framing_errors_are_not_clean_close() {
        let err = BridgeError::from(FramingError::InvalidLength {
            field: "1x".into(),
        });
        assert!(!err.is_clean_close());
        assert_eq!(
            err.to_string(),
            "framing error: invalid length field \"1x\""
        );
    }
}
