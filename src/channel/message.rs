//! Message-oriented channel carried over a byte stream.

use std::{
    io,
    pin::Pin,
    task::{Context, Poll, ready},
};

use async_trait::async_trait;
use bytes::Bytes;
use futures::{SinkExt, Stream};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::{TcpStream, ToSocketAddrs},
};
use tokio_util::codec::{Framed, LengthDelimitedCodec};

use super::{Channel, closed};

/// Minimum accepted unit length in bytes.
pub const MIN_UNIT_LENGTH: usize = 64;

/// Maximum accepted unit length in bytes (16 MiB).
pub const MAX_UNIT_LENGTH: usize = 16 * 1024 * 1024;

/// Channel exchanging discrete units delimited by a 4-byte big-endian length
/// prefix.
///
/// Used for both the control channel and the publish channel.
#[derive(Debug)]
pub struct MessageChannel<T> {
    framed: Framed<T, LengthDelimitedCodec>,
    pending: Option<Bytes>,
    label: &'static str,
}

impl MessageChannel<TcpStream> {
    /// Connect to a message endpoint listening on `addr`.
    ///
    /// `label` names the channel in errors and logs.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] if the connection cannot be established.
    pub async fn connect(
        addr: impl ToSocketAddrs,
        max_unit_length: usize,
        label: &'static str,
    ) -> io::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self::new(stream, max_unit_length, label))
    }
}

impl<T> MessageChannel<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap an established stream.
    ///
    /// `max_unit_length` is clamped to
    /// [`MIN_UNIT_LENGTH`]`..=`[`MAX_UNIT_LENGTH`].
    #[must_use]
    pub fn new(io: T, max_unit_length: usize, label: &'static str) -> Self {
        let codec = LengthDelimitedCodec::builder()
            .max_frame_length(max_unit_length.clamp(MIN_UNIT_LENGTH, MAX_UNIT_LENGTH))
            .new_codec();
        Self {
            framed: Framed::new(io, codec),
            pending: None,
            label,
        }
    }

    /// Name of this channel.
    #[must_use]
    pub fn label(&self) -> &'static str { self.label }
}

#[async_trait]
impl<T> Channel for MessageChannel<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    fn poll_read_ready(&mut self, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        if self.pending.is_some() {
            return Poll::Ready(Ok(()));
        }
        match ready!(Pin::new(&mut self.framed).poll_next(cx)) {
            Some(Ok(unit)) => {
                self.pending = Some(unit.freeze());
                Poll::Ready(Ok(()))
            }
            Some(Err(err)) => Poll::Ready(Err(err)),
            None => Poll::Ready(Err(closed(self.label))),
        }
    }

    async fn read(&mut self) -> io::Result<Bytes> {
        super::ready(self).await?;
        self.pending
            .take()
            .ok_or_else(|| io::Error::other(format!("{} reported ready without a unit", self.label)))
    }

    async fn write(&mut self, unit: Bytes) -> io::Result<()> { self.framed.send(unit).await }

    async fn close(&mut self) -> io::Result<()> { SinkExt::<Bytes>::close(&mut self.framed).await }
}

#[cfg(test)]
mod tests {
    use std::io;

    use bytes::{Bytes, BytesMut};
    use tokio::io::{AsyncReadExt, AsyncWriteExt, duplex};

    use super::MessageChannel;
    use crate::channel::Channel;

    #[tokio::test]
    async fn units_round_trip_between_peers() {
        let (left, right) = duplex(256);
        let mut host = MessageChannel::new(left, 1024, "host");
        let mut bridge = MessageChannel::new(right, 1024, "control channel");

        host.write(Bytes::from_static(b"ACK")).await.expect("write");
        host.write(Bytes::from_static(br#"{"command":"next"}"#))
            .await
            .expect("write");

        assert_eq!(bridge.read().await.expect("read"), "ACK");
        assert_eq!(
            bridge.read().await.expect("read"),
            r#"{"command":"next"}"#
        );
    }

    #[tokio::test]
    async fn units_are_length_prefixed_on_the_wire() {
        let (left, mut right) = duplex(64);
        let mut channel = MessageChannel::new(left, 1024, "publish channel");
        channel.write(Bytes::from_static(b"ACK")).await.expect("write");

        let mut wire = BytesMut::zeroed(7);
        right.read_exact(&mut wire).await.expect("read");
        assert_eq!(&wire[..], b"\x00\x00\x00\x03ACK");
    }

    #[tokio::test]
    async fn closed_peer_is_reported_as_eof() {
        let (left, mut right) = duplex(64);
        let mut channel = MessageChannel::new(left, 1024, "control channel");
        right.shutdown().await.expect("shutdown");
        drop(right);

        let err = channel.read().await.expect_err("peer closed");
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(err.to_string(), "control channel closed");
    }
}
