//! Event loop lifecycle state.

/// Run state of an [`EventLoop`](super::EventLoop).
///
/// The loop moves strictly forward: `Running` until the stop handle is
/// observed at the end of an iteration, `Draining` while the pending queue is
/// flushed one last time, then `Stopped`. A fatal error jumps straight to
/// `Stopped`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// Channels are being multiplexed.
    Running,
    /// A stop request was observed and queued messages are being flushed.
    Draining,
    /// The loop has exited.
    Stopped,
}

impl LoopState {
    /// Returns `true` while iterations are still being run.
    #[must_use]
    pub fn is_running(self) -> bool { matches!(self, Self::Running) }

    /// Returns `true` once the loop has exited.
    #[must_use]
    pub fn is_stopped(self) -> bool { matches!(self, Self::Stopped) }
}

impl std::fmt::Display for LoopState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}
