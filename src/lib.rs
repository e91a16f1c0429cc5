#![doc(html_root_url = "https://docs.rs/dapbridge/latest")]
//! Public API for the `dapbridge` library.
//!
//! This crate relays a debug adapter's `Content-Length` framed byte stream
//! onto a message-oriented control bus. It provides the frame reassembler,
//! the single-task event loop that multiplexes the adapter stream with the
//! control channel, and the session plumbing that wires them to real
//! transports.

pub mod arena;
pub mod bridge;
pub mod channel;
pub mod config;
pub mod decode;
pub mod error;
pub mod frame;
pub mod handler;
pub mod metrics;
pub mod queue;
pub mod session;

pub use arena::ByteArena;
pub use bridge::{ControlForwarder, EventLoop, LoopState, Readiness, StopHandle};
pub use channel::{
    AdapterStream,
    AddressedChannel,
    Channel,
    ConnectionId,
    MemoryChannel,
    MessageChannel,
};
pub use config::{BridgeConfig, Endpoints};
pub use decode::{DecodeError, DecodedMessage, decode_message};
pub use error::{BridgeError, Result};
pub use frame::{Frame, FrameFormat, FrameFormatError, FrameReassembler, FramingError};
pub use handler::{MessageHandler, Publisher};
pub use queue::PendingQueue;
pub use session::{BridgeSession, active_session_count};
