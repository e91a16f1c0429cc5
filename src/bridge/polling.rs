//! Multiplexed readiness wait for the event loop.

use std::{
    future::{Future, poll_fn},
    io,
    pin::pin,
    task::Poll,
};

use super::StopHandle;
use crate::channel::Channel;

/// Sources found ready by one wait.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Readiness {
    /// The adapter stream has bytes to read.
    pub adapter: bool,
    /// The control channel has a unit to read.
    pub control: bool,
    /// A stop was requested.
    pub stop: bool,
}

impl Readiness {
    fn any(self) -> bool { self.adapter || self.control || self.stop }
}

/// Wait, without a timeout, until the adapter stream, the control channel or
/// the stop handle is ready.
///
/// All three sources are polled on every wake, so sources that become ready
/// together are reported together.
pub(super) async fn wait_ready<A, C>(
    adapter: &mut A,
    control: &mut C,
    stop: &StopHandle,
) -> io::Result<Readiness>
where
    A: Channel + ?Sized,
    C: Channel + ?Sized,
{
    let mut stopped = pin!(stop.token().cancelled());
    poll_fn(|cx| {
        let mut readiness = Readiness::default();
        match adapter.poll_read_ready(cx) {
            Poll::Ready(Ok(())) => readiness.adapter = true,
            Poll::Ready(Err(err)) => return Poll::Ready(Err(err)),
            Poll::Pending => {}
        }
        match control.poll_read_ready(cx) {
            Poll::Ready(Ok(())) => readiness.control = true,
            Poll::Ready(Err(err)) => return Poll::Ready(Err(err)),
            Poll::Pending => {}
        }
        readiness.stop = stopped.as_mut().poll(cx).is_ready();

        if readiness.any() {
            Poll::Ready(Ok(readiness))
        } else {
            Poll::Pending
        }
    })
    .await
}
