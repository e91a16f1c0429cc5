//! In-process channel pair backed by Tokio MPSC queues.

use std::{
    io,
    task::{Context, Poll, ready},
};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;

use super::{AddressedChannel, Channel, ConnectionId, closed};

/// One end of an in-memory channel pair.
///
/// Every [`write`](Channel::write) on one end becomes exactly one
/// [`read`](Channel::read) on the other, so unit boundaries are preserved.
/// This makes it suitable both for a host embedding the bridge in-process and
/// for scripting chunk boundaries in tests. Closing or dropping one end is
/// reported as EOF on the other.
#[derive(Debug)]
pub struct MemoryChannel {
    tx: Option<mpsc::UnboundedSender<Bytes>>,
    rx: mpsc::UnboundedReceiver<Bytes>,
    pending: Option<Bytes>,
    identity: ConnectionId,
}

impl MemoryChannel {
    /// Create a connected pair of channels.
    #[must_use]
    pub fn pair() -> (Self, Self) {
        let (left_tx, right_rx) = mpsc::unbounded_channel();
        let (right_tx, left_rx) = mpsc::unbounded_channel();
        let left = Self::new(left_tx, left_rx);
        let right = Self::new(right_tx, right_rx);
        (left, right)
    }

    fn new(tx: mpsc::UnboundedSender<Bytes>, rx: mpsc::UnboundedReceiver<Bytes>) -> Self {
        Self {
            tx: Some(tx),
            rx,
            pending: None,
            identity: ConnectionId::generate(),
        }
    }

    /// Take a unit that has already arrived, without waiting.
    ///
    /// Returns `None` when nothing is queued or the peer has gone away.
    pub fn try_read(&mut self) -> Option<Bytes> {
        self.pending.take().or_else(|| self.rx.try_recv().ok())
    }
}

#[async_trait]
impl Channel for MemoryChannel {
    fn poll_read_ready(&mut self, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        if self.pending.is_some() {
            return Poll::Ready(Ok(()));
        }
        match ready!(self.rx.poll_recv(cx)) {
            Some(unit) => {
                self.pending = Some(unit);
                Poll::Ready(Ok(()))
            }
            None => Poll::Ready(Err(closed("memory channel peer"))),
        }
    }

    async fn read(&mut self) -> io::Result<Bytes> {
        super::ready(self).await?;
        self.pending
            .take()
            .ok_or_else(|| io::Error::other("memory channel reported ready without a unit"))
    }

    async fn write(&mut self, unit: Bytes) -> io::Result<()> {
        let tx = self.tx.as_ref().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotConnected, "memory channel is closed")
        })?;
        tx.send(unit)
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "memory channel peer dropped"))
    }

    async fn close(&mut self) -> io::Result<()> {
        self.tx = None;
        self.rx.close();
        Ok(())
    }
}

impl AddressedChannel for MemoryChannel {
    fn identity(&self) -> &ConnectionId { &self.identity }
}

#[cfg(test)]
mod tests {
    use std::io;

    use bytes::Bytes;

    use super::MemoryChannel;
    use crate::channel::Channel;

    #[tokio::test]
    async fn writes_arrive_as_discrete_units() {
        let (mut left, mut right) = MemoryChannel::pair();
        left.write(Bytes::from_static(b"a")).await.expect("write");
        left.write(Bytes::from_static(b"bc")).await.expect("write");

        assert_eq!(right.read().await.expect("read"), "a");
        assert_eq!(right.read().await.expect("read"), "bc");
        assert!(right.try_read().is_none());
    }

    #[tokio::test]
    async fn close_is_seen_as_eof_by_peer() {
        let (mut left, mut right) = MemoryChannel::pair();
        left.close().await.expect("close");

        let err = right.read().await.expect_err("peer closed");
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        let err = right
            .write(Bytes::from_static(b"late"))
            .await
            .expect_err("peer receiver closed");
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
