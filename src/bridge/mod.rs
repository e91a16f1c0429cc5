//! Single-task event loop relaying between the adapter stream and the
//! control bus.
//!
//! Each iteration waits for the adapter stream, the control channel or the
//! stop handle, then works in a fixed order:
//!
//! 1. adapter readiness: reassemble at least one frame into the pending queue;
//! 2. always: drain the pending queue through the decode boundary;
//! 3. control readiness: forward exactly one control unit to the adapter.
//!
//! The stop handle is checked once the iteration completes. Draining on every
//! iteration keeps adapter events flowing even when only control traffic
//! wakes the loop.

mod forward;
mod polling;
mod shutdown;
mod state;

use bytes::Bytes;
pub use forward::ControlForwarder;
use log::{debug, error, info, warn};
pub use polling::Readiness;
use polling::wait_ready;
pub use shutdown::StopHandle;
pub use state::LoopState;

use crate::{
    channel::{AddressedChannel, Channel, ConnectionId},
    decode::{DecodedMessage, decode_message},
    error::Result,
    frame::FrameReassembler,
    handler::MessageHandler,
    queue::PendingQueue,
};

/// Event loop owning the adapter stream, the control channel and the
/// message handler for one session.
///
/// # Examples
///
/// ```no_run
/// use dapbridge::{BridgeConfig, EventLoop, MemoryChannel, Publisher, StopHandle};
///
/// # async fn demo() -> dapbridge::Result<()> {
/// let (adapter, _adapter_peer) = MemoryChannel::pair();
/// let (control, _host) = MemoryChannel::pair();
/// let (publish, _subscriber) = MemoryChannel::pair();
/// let stop = StopHandle::new();
/// let mut event_loop = EventLoop::new(
///     adapter,
///     control,
///     Publisher::new(publish),
///     BridgeConfig::default().reassembler(),
///     stop.clone(),
/// );
/// stop.stop();
/// event_loop.run().await?;
/// # Ok(())
/// # }
/// ```
pub struct EventLoop<A, C, H> {
    adapter: A,
    control: C,
    handler: H,
    identity: ConnectionId,
    reassembler: FrameReassembler,
    queue: PendingQueue,
    stop: StopHandle,
    state: LoopState,
}

impl<A, C, H> EventLoop<A, C, H>
where
    A: AddressedChannel,
    C: Channel,
    H: MessageHandler,
{
    /// Create a loop over connected channels.
    ///
    /// The adapter's identity is captured here and used to address every
    /// forwarded control unit for the lifetime of the loop.
    #[must_use]
    pub fn new(
        adapter: A,
        control: C,
        handler: H,
        reassembler: FrameReassembler,
        stop: StopHandle,
    ) -> Self {
        let identity = adapter.identity().clone();
        Self {
            adapter,
            control,
            handler,
            identity,
            reassembler,
            queue: PendingQueue::new(),
            stop,
            state: LoopState::Running,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LoopState { self.state }

    /// Identity of the adapter connection this loop addresses.
    #[must_use]
    pub fn identity(&self) -> &ConnectionId { &self.identity }

    /// Handle that stops this loop.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle { self.stop.clone() }

    /// Number of adapter messages queued but not yet decoded.
    #[must_use]
    pub fn pending_messages(&self) -> usize { self.queue.len() }

    /// Tell the host the adapter connection is established.
    ///
    /// # Errors
    ///
    /// Returns an error if the control channel write fails.
    pub async fn acknowledge(&mut self, unit: Bytes) -> Result<()> {
        self.control.write(unit).await?;
        debug!("acknowledgement sent: identity={}", self.identity);
        Ok(())
    }

    /// Run iterations until the stop handle is observed, then flush the
    /// pending queue and stop.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Framing`](crate::BridgeError::Framing) if the
    /// adapter breaks the wire format and
    /// [`BridgeError::Io`](crate::BridgeError::Io) if any channel fails. Both
    /// leave the loop in [`LoopState::Stopped`].
    pub async fn run(&mut self) -> Result<()> {
        info!("event loop running: identity={}", self.identity);
        let result = self.run_until_stopped().await;
        self.state = LoopState::Stopped;
        match &result {
            Ok(()) => info!("event loop stopped: identity={}", self.identity),
            Err(err) => error!(
                "event loop failed: identity={}, error={err}",
                self.identity
            ),
        }
        result
    }

    async fn run_until_stopped(&mut self) -> Result<()> {
        while self.state.is_running() {
            self.turn().await?;
            if self.stop.is_stopped() {
                self.state = LoopState::Draining;
                debug!(
                    "stop observed: identity={}, pending={}",
                    self.identity,
                    self.queue.len()
                );
            }
        }
        self.drain_queue().await?;
        Ok(())
    }

    /// Run a single iteration: wait for readiness, then service the ready
    /// sources in order.
    ///
    /// The stop handle is not consulted; [`run`](Self::run) checks it between
    /// iterations.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`run`](Self::run).
    pub async fn turn(&mut self) -> Result<Readiness> {
        let readiness = wait_ready(&mut self.adapter, &mut self.control, &self.stop).await?;

        if readiness.adapter {
            self.reassembler
                .read_frames(&mut self.adapter, &mut self.queue)
                .await?;
        }

        self.drain_queue().await?;

        if readiness.control {
            ControlForwarder::new(&self.identity)
                .forward(&mut self.control, &mut self.adapter)
                .await?;
        }

        Ok(readiness)
    }

    /// Decode and dispatch every queued message.
    ///
    /// Undecodable messages are logged and dropped.
    async fn drain_queue(&mut self) -> Result<usize> {
        let mut dispatched = 0;
        while let Some(raw) = self.queue.pop() {
            match decode_message(&raw) {
                Ok(DecodedMessage::Event(event)) => self.handler.on_event(raw, event).await?,
                Ok(DecodedMessage::Response(response)) => {
                    self.handler.on_response(raw, response).await?;
                }
                Err(err) => {
                    warn!(
                        "dropping undecodable adapter message: identity={}, length={}, error={err}",
                        self.identity,
                        raw.len()
                    );
                    crate::metrics::inc_decode_errors();
                    continue;
                }
            }
            dispatched += 1;
        }
        Ok(dispatched)
    }

    /// Consume the loop, returning the adapter, control channel and handler.
    #[must_use]
    pub fn into_parts(self) -> (A, C, H) { (self.adapter, self.control, self.handler) }
}
