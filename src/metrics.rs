//! Metric helpers for `dapbridge`.
//!
//! This module defines metric names and simple helper functions wrapping the
//! [`metrics`](https://docs.rs/metrics) crate. With the `metrics` feature
//! disabled the helpers compile to no-ops.

#[cfg(feature = "metrics")]
use metrics::{counter, gauge};

/// Name of the gauge tracking running bridge sessions.
pub const SESSIONS_ACTIVE: &str = "dapbridge_sessions_active";
/// Name of the counter tracking frames rebuilt from the adapter stream.
pub const FRAMES_REASSEMBLED: &str = "dapbridge_frames_reassembled_total";
/// Name of the counter tracking control units relayed to the adapter.
pub const CONTROL_UNITS_FORWARDED: &str = "dapbridge_control_units_forwarded_total";
/// Name of the counter tracking adapter messages dropped at the decode boundary.
pub const DECODE_ERRORS: &str = "dapbridge_decode_errors_total";
/// Name of the counter tracking events written to the publish channel.
pub const EVENTS_PUBLISHED: &str = "dapbridge_events_published_total";

/// Increment the active sessions gauge.
pub fn inc_sessions() {
    #[cfg(feature = "metrics")]
    gauge!(SESSIONS_ACTIVE).increment(1.0);
}

/// Decrement the active sessions gauge.
pub fn dec_sessions() {
    #[cfg(feature = "metrics")]
    gauge!(SESSIONS_ACTIVE).decrement(1.0);
}

/// Record `count` reassembled frames.
pub fn inc_frames(count: usize) {
    #[cfg(feature = "metrics")]
    counter!(FRAMES_REASSEMBLED).increment(u64::try_from(count).unwrap_or(u64::MAX));
    #[cfg(not(feature = "metrics"))]
    let _ = count;
}

/// Record a control unit forwarded to the adapter.
pub fn inc_forwarded() {
    #[cfg(feature = "metrics")]
    counter!(CONTROL_UNITS_FORWARDED).increment(1);
}

/// Record a message dropped because it failed to decode.
pub fn inc_decode_errors() {
    #[cfg(feature = "metrics")]
    counter!(DECODE_ERRORS).increment(1);
}

/// Record an event published to the host.
pub fn inc_events_published() {
    #[cfg(feature = "metrics")]
    counter!(EVENTS_PUBLISHED).increment(1);
}
