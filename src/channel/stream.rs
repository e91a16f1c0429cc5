//! Raw byte stream to a debug adapter.

use std::{
    io,
    pin::Pin,
    task::{Context, Poll, ready},
};

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use log::debug;
use tokio::{
    io::{AsyncRead, AsyncWrite, AsyncWriteExt},
    net::{TcpStream, ToSocketAddrs},
};
use tokio_util::io::poll_read_buf;

use super::{AddressedChannel, Channel, ConnectionId, closed};

/// Default number of bytes requested per read.
pub const DEFAULT_READ_CAPACITY: usize = 8 * 1024;

/// Connection-oriented byte stream addressed through a message interface.
///
/// Reads return whatever chunk the transport delivered, with no framing.
/// Writes come in pairs: an address unit carrying this stream's
/// [`ConnectionId`], then the payload. A zero-length payload closes the write
/// half of the stream.
#[derive(Debug)]
pub struct AdapterStream<T> {
    io: T,
    identity: ConnectionId,
    inbound: BytesMut,
    read_capacity: usize,
    addressed: bool,
}

impl AdapterStream<TcpStream> {
    /// Connect to a debug adapter listening on `addr`.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] if the connection cannot be established.
    pub async fn connect(addr: impl ToSocketAddrs, read_capacity: usize) -> io::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self::new(stream, read_capacity))
    }
}

impl<T> AdapterStream<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap an established stream, assigning it a fresh identity.
    #[must_use]
    pub fn new(io: T, read_capacity: usize) -> Self {
        Self::with_identity(io, read_capacity, ConnectionId::generate())
    }

    /// Wrap an established stream with an externally assigned identity.
    #[must_use]
    pub fn with_identity(io: T, read_capacity: usize, identity: ConnectionId) -> Self {
        Self {
            io,
            identity,
            inbound: BytesMut::new(),
            read_capacity: read_capacity.max(1),
            addressed: false,
        }
    }

    /// Consume the channel, returning the underlying stream.
    #[must_use]
    pub fn into_inner(self) -> T { self.io }
}

#[async_trait]
impl<T> Channel for AdapterStream<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    fn poll_read_ready(&mut self, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        if !self.inbound.is_empty() {
            return Poll::Ready(Ok(()));
        }
        self.inbound.reserve(self.read_capacity);
        match ready!(poll_read_buf(Pin::new(&mut self.io), cx, &mut self.inbound)) {
            Ok(0) => Poll::Ready(Err(closed("adapter stream"))),
            Ok(_) => Poll::Ready(Ok(())),
            Err(err) => Poll::Ready(Err(err)),
        }
    }

    async fn read(&mut self) -> io::Result<Bytes> {
        super::ready(self).await?;
        Ok(self.inbound.split().freeze())
    }

    async fn write(&mut self, unit: Bytes) -> io::Result<()> {
        if !self.addressed {
            if unit != self.identity.as_bytes() {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("no adapter connection with identity {}", ConnectionId::new(unit)),
                ));
            }
            self.addressed = true;
            return Ok(());
        }

        self.addressed = false;
        if unit.is_empty() {
            debug!("closing adapter stream on request: identity={}", self.identity);
            return self.io.shutdown().await;
        }
        self.io.write_all(&unit).await?;
        self.io.flush().await
    }

    async fn close(&mut self) -> io::Result<()> { self.io.shutdown().await }
}

impl<T> AddressedChannel for AdapterStream<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    fn identity(&self) -> &ConnectionId { &self.identity }
}
