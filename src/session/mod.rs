//! Session lifecycle: connect the three peers, acknowledge the host, run the
//! event loop and tear everything down again.
//!
//! A [`BridgeSession`] is single-use in spirit but holds no per-connection
//! state itself; each call to [`BridgeSession::start`] opens fresh channels
//! and runs a fresh [`EventLoop`] until the shared [`StopHandle`] fires or the
//! loop fails.

mod counter;

pub use counter::active_session_count;
use counter::ActiveSession;
use log::{info, warn};

use crate::{
    bridge::{EventLoop, StopHandle},
    channel::{AdapterStream, AddressedChannel, Channel, MessageChannel},
    config::{BridgeConfig, Endpoints},
    error::Result,
    handler::{MessageHandler, Publisher},
};

/// Label used in errors raised by the publish channel.
const PUBLISH_LABEL: &str = "publish channel";
/// Label used in errors raised by the control channel.
const CONTROL_LABEL: &str = "control channel";

/// Connects a debug adapter to a host and relays between them.
///
/// # Examples
///
/// ```no_run
/// use dapbridge::{BridgeConfig, BridgeSession, Endpoints};
///
/// # async fn demo() -> dapbridge::Result<()> {
/// let session = BridgeSession::new(BridgeConfig::default());
/// let stop = session.stop_handle();
/// tokio::spawn(async move {
///     let _ = tokio::signal::ctrl_c().await;
///     stop.stop();
/// });
/// session
///     .start(&Endpoints::new("127.0.0.1:5678", "127.0.0.1:7001", "127.0.0.1:7002"))
///     .await
/// # }
/// ```
#[derive(Debug)]
pub struct BridgeSession {
    config: BridgeConfig,
    stop: StopHandle,
}

impl BridgeSession {
    /// Create a session with its own stop handle.
    #[must_use]
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            config,
            stop: StopHandle::new(),
        }
    }

    /// Use an externally owned stop handle, for example one shared with a
    /// signal listener created before the session.
    #[must_use]
    pub fn with_stop_handle(mut self, stop: StopHandle) -> Self {
        self.stop = stop;
        self
    }

    /// Handle that stops the running event loop.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle { self.stop.clone() }

    /// Configuration applied to every run.
    #[must_use]
    pub fn config(&self) -> &BridgeConfig { &self.config }

    /// Connect the publish, control and adapter endpoints in that order, then
    /// [`run`](Self::run) until stopped.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Io`](crate::BridgeError::Io) if any endpoint
    /// cannot be reached, otherwise whatever the event loop returns.
    pub async fn start(&self, endpoints: &Endpoints) -> Result<()> {
        let max_unit = self.config.max_unit_length_bytes();
        let publish = MessageChannel::connect(&*endpoints.publish, max_unit, PUBLISH_LABEL).await?;
        info!("publish channel connected: addr={}", endpoints.publish);
        let control = MessageChannel::connect(&*endpoints.control, max_unit, CONTROL_LABEL).await?;
        info!("control channel connected: addr={}", endpoints.control);
        let adapter =
            AdapterStream::connect(&*endpoints.adapter, self.config.read_capacity_bytes()).await?;
        info!(
            "adapter stream connected: addr={}, identity={}",
            endpoints.adapter,
            adapter.identity()
        );
        self.run(adapter, control, Publisher::new(publish)).await
    }

    /// Acknowledge the host and run the event loop over connected channels.
    ///
    /// Channels are closed afterwards in the order adapter, control, handler,
    /// whether or not the loop succeeded. Failures while closing are logged.
    ///
    /// # Errors
    ///
    /// Returns the acknowledgement write error or the event loop's error.
    pub async fn run<A, C, H>(&self, adapter: A, control: C, handler: H) -> Result<()>
    where
        A: AddressedChannel,
        C: Channel,
        H: MessageHandler,
    {
        let _active = ActiveSession::new();
        let mut event_loop = EventLoop::new(
            adapter,
            control,
            handler,
            self.config.reassembler(),
            self.stop.clone(),
        );
        let identity = event_loop.identity().clone();
        let result = match event_loop.acknowledge(self.config.acknowledgement_unit()).await {
            Ok(()) => event_loop.run().await,
            Err(err) => Err(err),
        };

        let (mut adapter, mut control, mut handler) = event_loop.into_parts();
        if let Err(err) = adapter.close().await {
            warn!("adapter close failed: identity={identity}, error={err}");
        }
        if let Err(err) = control.close().await {
            warn!("control channel close failed: identity={identity}, error={err}");
        }
        if let Err(err) = handler.close().await {
            warn!("handler close failed: identity={identity}, error={err}");
        }
        info!("session finished: identity={identity}");
        result
    }
}

#[cfg(test)]
mod tests;
