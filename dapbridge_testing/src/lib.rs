//! Test utilities for `dapbridge`.
//!
//! - [`logging`]: serialised access to a global [`logtest::Logger`].
//! - [`wire`]: builders for adapter-stream bytes and chunking helpers.
//! - [`peers`]: TCP listeners standing in for the adapter, the host and the
//!   event subscriber.
//!
//! ```rust
//! use dapbridge_testing::{encode_frames, split_at_offsets};
//!
//! let wire = encode_frames(&[b"{}", b"[]"]);
//! let chunks = split_at_offsets(&wire, &[3, 20]);
//! assert_eq!(chunks.concat(), wire.to_vec());
//! ```

pub mod logging;
pub mod peers;
pub mod wire;

pub use logging::{LoggerHandle, logger};
pub use peers::{ConnectedPeers, PeerListeners};
pub use wire::{encode_frame, encode_frames, split_at_offsets};
