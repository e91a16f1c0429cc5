//! Cooperative stop signal for the event loop.

use tokio_util::sync::CancellationToken;

/// Shared handle used to ask an event loop to stop.
///
/// Clones observe the same signal. Once [`stop`](Self::stop) is called the
/// signal stays set for good. Stopping also wakes a loop blocked waiting for
/// channel readiness, so shutdown never depends on unrelated traffic.
#[derive(Clone, Debug, Default)]
pub struct StopHandle {
    token: CancellationToken,
}

impl StopHandle {
    /// Create a handle that has not been stopped.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Wrap an existing cancellation token, so a loop can share a wider
    /// shutdown scope.
    #[must_use]
    pub fn from_token(token: CancellationToken) -> Self { Self { token } }

    /// Request that the loop stop after its current iteration.
    pub fn stop(&self) { self.token.cancel(); }

    /// Returns `true` once a stop has been requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool { self.token.is_cancelled() }

    /// Wait until a stop is requested.
    pub async fn stopped(&self) { self.token.cancelled().await; }

    /// Borrow the underlying cancellation token.
    #[must_use]
    pub fn token(&self) -> &CancellationToken { &self.token }
}

#[cfg(test)]
mod tests {
    use tokio::time::{Duration, timeout};

    use super::StopHandle;

    #[tokio::test]
    async fn clones_share_the_signal() {
        let handle = StopHandle::new();
        let observer = handle.clone();
        assert!(!observer.is_stopped());

        handle.stop();
        assert!(observer.is_stopped());
        timeout(Duration::from_secs(1), observer.stopped())
            .await
            .expect("stopped should resolve once signalled");
    }
}
