//! Transport abstraction shared by the adapter stream and the control bus.
//!
//! The event loop is generic over [`Channel`], the minimal capability set it
//! needs from a transport: readiness polling, reading one unit and writing
//! one unit. Readiness is exposed as a poll method so the loop can wait on
//! several channels of different kinds in a single multiplexed wait.
//!
//! Implementations:
//!
//! - [`AdapterStream`]: raw byte stream to a debug adapter, addressed by a [`ConnectionId`].
//! - [`MessageChannel`]: length-delimited messages over a byte stream.
//! - [`MemoryChannel`]: in-process channel pair for embedding and tests.

use std::{
    future::poll_fn,
    io,
    task::{Context, Poll},
};

use async_trait::async_trait;
use bytes::Bytes;

mod identity;
mod memory;
mod message;
mod stream;

pub use identity::ConnectionId;
pub use memory::MemoryChannel;
pub use message::{MAX_UNIT_LENGTH, MIN_UNIT_LENGTH, MessageChannel};
pub use stream::{AdapterStream, DEFAULT_READ_CAPACITY};

/// Minimal transport capability set used by the event loop.
///
/// Readiness must be sticky: once [`poll_read_ready`](Self::poll_read_ready)
/// reports `Ready(Ok(()))`, the next [`read`](Self::read) completes without
/// waiting. Implementations buffer whatever they pulled from the transport
/// while checking readiness.
#[async_trait]
pub trait Channel: Send {
    /// Poll until a unit can be read without blocking.
    ///
    /// A peer that has gone away is reported as an error, typically
    /// [`io::ErrorKind::UnexpectedEof`].
    fn poll_read_ready(&mut self, cx: &mut Context<'_>) -> Poll<io::Result<()>>;

    /// Read one unit, waiting for one to arrive if necessary.
    async fn read(&mut self) -> io::Result<Bytes>;

    /// Write one unit.
    async fn write(&mut self, unit: Bytes) -> io::Result<()>;

    /// Disconnect from the peer.
    async fn close(&mut self) -> io::Result<()> { Ok(()) }
}

/// A channel bound to one peer connection whose identity must prefix every
/// outbound payload.
pub trait AddressedChannel: Channel {
    /// Identity of the connected peer.
    fn identity(&self) -> &ConnectionId;
}

/// Wait until `channel` has a unit ready to read.
///
/// # Errors
///
/// Returns any error reported by [`Channel::poll_read_ready`].
pub async fn ready<C>(channel: &mut C) -> io::Result<()>
where
    C: Channel + ?Sized,
{
    poll_fn(|cx| channel.poll_read_ready(cx)).await
}

/// Error reported when a peer has gone away.
pub(crate) fn closed(label: &str) -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, format!("{label} closed"))
}
