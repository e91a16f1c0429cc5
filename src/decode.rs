//! Decode boundary for adapter messages.
//!
//! Every frame body pulled off the pending queue is parsed as JSON and
//! classified by its `"type"` field. Only the two kinds the bridge routes are
//! recognised; anything else is a [`DecodeError`]. Decode errors are never
//! fatal: the event loop drops the message and carries on.

use serde_json::Value;
use thiserror::Error;

/// Name of the field discriminating message kinds.
pub const DISCRIMINANT: &str = "type";

/// Adapter message after classification.
#[derive(Clone, Debug, PartialEq)]
pub enum DecodedMessage {
    /// Unsolicited notification from the adapter.
    Event(Value),
    /// Reply to a command previously forwarded to the adapter.
    Response(Value),
}

impl DecodedMessage {
    /// Borrow the parsed message body.
    #[must_use]
    pub fn body(&self) -> &Value {
        match self {
            Self::Event(body) | Self::Response(body) => body,
        }
    }

    /// Short name of the message kind, as it appears on the wire.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Event(_) => "event",
            Self::Response(_) => "response",
        }
    }
}

/// Errors raised when a message body cannot be classified.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body is not valid JSON.
    #[error("malformed message body: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The body is JSON but has no string `"type"` field.
    #[error("message has no \"type\" discriminant")]
    MissingDiscriminant,

    /// The `"type"` field names a kind the bridge does not route.
    #[error("unsupported message type {0:?}")]
    UnknownKind(String),
}

/// Parse and classify a raw message body.
///
/// # Errors
///
/// Returns [`DecodeError`] if `raw` is not a JSON value carrying a supported
/// `"type"` discriminant.
pub fn decode_message(raw: &[u8]) -> Result<DecodedMessage, DecodeError> {
    let body: Value = serde_json::from_slice(raw)?;
    let kind = body
        .get(DISCRIMINANT)
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingDiscriminant)?;
    match kind {
        "event" => Ok(DecodedMessage::Event(body)),
        "response" => Ok(DecodedMessage::Response(body)),
        other => Err(DecodeError::UnknownKind(other.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::{DecodeError, DecodedMessage, decode_message};

    #[test]
    fn events_are_classified() {
        let message = decode_message(br#"{"seq":3,"type":"event","event":"stopped"}"#)
            .expect("well-formed event");
        assert_eq!(
            message,
            DecodedMessage::Event(json!({"seq": 3, "type": "event", "event": "stopped"}))
        );
        assert_eq!(message.kind(), "event");
    }

    #[test]
    fn responses_are_classified() {
        let message = decode_message(
            br#"{"seq":4,"type":"response","request_seq":1,"success":true,"command":"next"}"#,
        )
        .expect("well-formed response");
        assert_eq!(message.kind(), "response");
        assert_eq!(message.body()["command"], "next");
    }

    #[rstest]
    #[case(b"not json".as_slice())]
    #[case(b"{\"type\":\"event\"".as_slice())]
    fn malformed_bodies_fail(#[case] raw: &[u8]) {
        assert!(matches!(decode_message(raw), Err(DecodeError::Malformed(_))));
    }

    #[rstest]
    #[case(br#"{"seq":1}"#.as_slice())]
    #[case(br#"{"type":7}"#.as_slice())]
    #[case(br#"[1,2,3]"#.as_slice())]
    fn missing_discriminant_fails(#[case] raw: &[u8]) {
        assert!(matches!(
            decode_message(raw),
            Err(DecodeError::MissingDiscriminant)
        ));
    }

    #[test]
    fn unknown_kind_fails() {
        let err = decode_message(br#"{"type":"request","command":"runInTerminal"}"#)
            .expect_err("requests are not routed");
        assert!(matches!(err, DecodeError::UnknownKind(ref kind) if kind == "request"));
    }
}
