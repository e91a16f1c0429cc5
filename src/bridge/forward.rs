//! Store-and-forward relay from the control channel to the adapter stream.

use std::io;

use log::debug;

use crate::channel::{Channel, ConnectionId};

/// Relays control units to the adapter connection identified by `identity`.
///
/// The adapter stream is addressed through a message interface, so every
/// payload is preceded by an address unit carrying the connection identity.
/// Units are forwarded byte for byte; nothing is parsed or correlated.
#[derive(Clone, Copy, Debug)]
pub struct ControlForwarder<'a> {
    identity: &'a ConnectionId,
}

impl<'a> ControlForwarder<'a> {
    /// Create a forwarder addressing `identity`.
    #[must_use]
    pub fn new(identity: &'a ConnectionId) -> Self { Self { identity } }

    /// Read exactly one unit from `control` and send it to `adapter`.
    ///
    /// Returns the length of the forwarded unit.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] if reading the unit or either send fails.
    pub async fn forward<C, A>(&self, control: &mut C, adapter: &mut A) -> io::Result<usize>
    where
        C: Channel + ?Sized,
        A: Channel + ?Sized,
    {
        let unit = control.read().await?;
        let length = unit.len();
        adapter.write(self.identity.to_bytes()).await?;
        adapter.write(unit).await?;
        debug!(
            "control unit forwarded: identity={}, length={length}",
            self.identity
        );
        crate::metrics::inc_forwarded();
        Ok(length)
    }
}
