//! Opaque identity of an adapter stream connection.

use std::sync::atomic::{AtomicU32, Ordering};

use bytes::{BufMut, Bytes, BytesMut};

static NEXT_IDENTITY: AtomicU32 = AtomicU32::new(1);

/// Token identifying one open adapter stream connection.
///
/// The token is bound once when the connection opens and never changes. It
/// is sent as an address unit ahead of every payload written to the stream.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConnectionId(Bytes);

impl ConnectionId {
    /// Wrap an externally assigned token.
    #[must_use]
    pub fn new(token: impl Into<Bytes>) -> Self { Self(token.into()) }

    /// Allocate a fresh process-unique token.
    ///
    /// Generated tokens are five bytes: a zero marker followed by a
    /// big-endian counter.
    #[must_use]
    pub fn generate() -> Self {
        let id = NEXT_IDENTITY.fetch_add(1, Ordering::Relaxed);
        let mut token = BytesMut::with_capacity(5);
        token.put_u8(0);
        token.put_u32(id);
        Self(token.freeze())
    }

    /// Borrow the raw token.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] { &self.0 }

    /// Return the token as an owned unit ready to send.
    #[must_use]
    pub fn to_bytes(&self) -> Bytes { self.0.clone() }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ConnectionId(")?;
        for byte in self.0.iter() {
            write!(f, "{byte:02x}")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::ConnectionId;

    #[test]
    fn generated_identities_are_unique() {
        let first = ConnectionId::generate();
        let second = ConnectionId::generate();
        assert_ne!(first, second);
        assert_eq!(first.as_bytes().len(), 5);
        assert_eq!(first.as_bytes()[0], 0);
    }

    #[test]
    fn display_renders_hex() {
        let id = ConnectionId::new(&b"\x00\x01\xab"[..]);
        assert_eq!(id.to_string(), "ConnectionId(0001ab)");
    }
}
