//! Loopback TCP peers for end-to-end session tests.
//!
//! [`PeerListeners`] binds the three endpoints a
//! [`BridgeSession`](dapbridge::BridgeSession) dials. Once the session has
//! connected, [`PeerListeners::accept`] yields [`ConnectedPeers`]: the raw
//! adapter socket plus length-delimited framers for the host and subscriber.

use std::io;

use bytes::Bytes;
use dapbridge::Endpoints;
use futures::{SinkExt, StreamExt};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};
use tokio_util::codec::{Framed, LengthDelimitedCodec};

/// Listeners for the adapter, publish and control endpoints.
pub struct PeerListeners {
    adapter: TcpListener,
    publish: TcpListener,
    control: TcpListener,
}

impl PeerListeners {
    /// Bind all three listeners on ephemeral loopback ports.
    ///
    /// # Errors
    ///
    /// Returns an error if a listener cannot be bound.
    pub async fn bind() -> io::Result<Self> {
        Ok(Self {
            adapter: TcpListener::bind("127.0.0.1:0").await?,
            publish: TcpListener::bind("127.0.0.1:0").await?,
            control: TcpListener::bind("127.0.0.1:0").await?,
        })
    }

    /// Addresses a session should connect to.
    ///
    /// # Errors
    ///
    /// Returns an error if a listener's local address is unavailable.
    pub fn endpoints(&self) -> io::Result<Endpoints> {
        Ok(Endpoints::new(
            self.adapter.local_addr()?.to_string(),
            self.publish.local_addr()?.to_string(),
            self.control.local_addr()?.to_string(),
        ))
    }

    /// Accept the session's three connections.
    ///
    /// # Errors
    ///
    /// Returns an error if any accept fails.
    pub async fn accept(&self) -> io::Result<ConnectedPeers> {
        let (subscriber, _) = self.publish.accept().await?;
        let (host, _) = self.control.accept().await?;
        let (adapter, _) = self.adapter.accept().await?;
        Ok(ConnectedPeers {
            adapter,
            subscriber: Framed::new(subscriber, LengthDelimitedCodec::new()),
            host: Framed::new(host, LengthDelimitedCodec::new()),
        })
    }
}

/// Far ends of a running session's connections.
pub struct ConnectedPeers {
    /// Debug adapter side of the adapter stream.
    pub adapter: TcpStream,
    /// Event subscriber side of the publish channel.
    pub subscriber: Framed<TcpStream, LengthDelimitedCodec>,
    /// Host side of the control channel.
    pub host: Framed<TcpStream, LengthDelimitedCodec>,
}

impl ConnectedPeers {
    /// Write raw bytes as the debug adapter.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket write fails.
    pub async fn adapter_send(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.adapter.write_all(bytes).await?;
        self.adapter.flush().await
    }

    /// Read exactly `len` bytes arriving at the debug adapter.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket closes first.
    pub async fn adapter_receive(&mut self, len: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0; len];
        self.adapter.read_exact(&mut buf).await?;
        Ok(buf)
    }

    /// Send one control unit as the host.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket write fails.
    pub async fn host_send(&mut self, unit: Bytes) -> io::Result<()> { self.host.send(unit).await }

    /// Receive one unit addressed to the host.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::UnexpectedEof`] if the bridge disconnected.
    pub async fn host_receive(&mut self) -> io::Result<Bytes> { next_unit(&mut self.host).await }

    /// Receive one published event.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::UnexpectedEof`] if the bridge disconnected.
    pub async fn subscriber_receive(&mut self) -> io::Result<Bytes> {
        next_unit(&mut self.subscriber).await
    }
}

async fn next_unit(framed: &mut Framed<TcpStream, LengthDelimitedCodec>) -> io::Result<Bytes> {
    match framed.next().await {
        Some(unit) => Ok(unit?.freeze()),
        None => Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "bridge disconnected",
        )),
    }
}
