//! Bridge configuration.
//!
//! [`BridgeConfig`] collects the tunables shared by the session and the event
//! loop; [`Endpoints`] names the three peers a session connects to.

use bytes::Bytes;

use crate::{
    channel::{DEFAULT_READ_CAPACITY, MAX_UNIT_LENGTH},
    frame::{FrameFormat, FrameReassembler},
};

/// Acknowledgement sent on the control channel once the adapter is connected.
pub const DEFAULT_ACKNOWLEDGEMENT: &[u8] = b"ACK";

/// Default maximum control and publish unit length (16 MiB).
pub const DEFAULT_MAX_UNIT_LENGTH: usize = MAX_UNIT_LENGTH;

/// Tunables for a bridge session.
///
/// # Examples
///
/// ```
/// use dapbridge::{BridgeConfig, FrameFormat};
///
/// let config = BridgeConfig::default()
///     .read_capacity(4096)
///     .max_payload_length(Some(1 << 20))
///     .frame_format(FrameFormat::default());
/// assert_eq!(config.read_capacity_bytes(), 4096);
/// ```
#[derive(Clone, Debug)]
pub struct BridgeConfig {
    frame_format: FrameFormat,
    read_capacity: usize,
    max_payload_length: Option<usize>,
    max_unit_length: usize,
    acknowledgement: Bytes,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            frame_format: FrameFormat::default(),
            read_capacity: DEFAULT_READ_CAPACITY,
            max_payload_length: None,
            max_unit_length: DEFAULT_MAX_UNIT_LENGTH,
            acknowledgement: Bytes::from_static(DEFAULT_ACKNOWLEDGEMENT),
        }
    }
}

impl BridgeConfig {
    /// Set the header token and separator used on the adapter stream.
    #[must_use]
    pub fn frame_format(mut self, format: FrameFormat) -> Self {
        self.frame_format = format;
        self
    }

    /// Set the number of bytes requested per adapter read.
    #[must_use]
    pub fn read_capacity(mut self, bytes: usize) -> Self {
        self.read_capacity = bytes.max(1);
        self
    }

    /// Limit the payload length an adapter frame may announce.
    ///
    /// `None` (the default) accepts any length.
    #[must_use]
    pub fn max_payload_length(mut self, max: Option<usize>) -> Self {
        self.max_payload_length = max;
        self
    }

    /// Set the largest unit accepted on the control and publish channels.
    #[must_use]
    pub fn max_unit_length(mut self, bytes: usize) -> Self {
        self.max_unit_length = bytes;
        self
    }

    /// Replace the unit sent on the control channel at session start.
    #[must_use]
    pub fn acknowledgement(mut self, unit: impl Into<Bytes>) -> Self {
        self.acknowledgement = unit.into();
        self
    }

    /// Configured adapter read size.
    #[must_use]
    pub const fn read_capacity_bytes(&self) -> usize { self.read_capacity }

    /// Configured control and publish unit limit.
    #[must_use]
    pub const fn max_unit_length_bytes(&self) -> usize { self.max_unit_length }

    /// Unit sent on the control channel at session start.
    #[must_use]
    pub fn acknowledgement_unit(&self) -> Bytes { self.acknowledgement.clone() }

    /// Build a reassembler honouring this configuration.
    #[must_use]
    pub fn reassembler(&self) -> FrameReassembler {
        FrameReassembler::new(self.frame_format.clone())
            .with_max_payload_length(self.max_payload_length)
    }
}

/// Addresses of the three peers a session connects to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    /// Debug adapter stream, for example `127.0.0.1:5678`.
    pub adapter: String,
    /// Publish channel receiving adapter events.
    pub publish: String,
    /// Control channel delivering host commands.
    pub control: String,
}

impl Endpoints {
    /// Bundle the three endpoint addresses.
    #[must_use]
    pub fn new(
        adapter: impl Into<String>,
        publish: impl Into<String>,
        control: impl Into<String>,
    ) -> Self {
        Self {
            adapter: adapter.into(),
            publish: publish.into(),
            control: control.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::{BridgeConfig, DEFAULT_ACKNOWLEDGEMENT, Endpoints};
    use crate::{
        channel::DEFAULT_READ_CAPACITY,
        frame::{FrameFormat, FramingError},
    };

    #[test]
    fn defaults_match_adapter_protocol() {
        let config = BridgeConfig::default();
        assert_eq!(config.read_capacity_bytes(), DEFAULT_READ_CAPACITY);
        assert_eq!(config.acknowledgement_unit(), DEFAULT_ACKNOWLEDGEMENT);
        assert_eq!(config.reassembler().format(), &FrameFormat::default());
    }

    #[test]
    fn read_capacity_has_a_floor() {
        assert_eq!(BridgeConfig::default().read_capacity(0).read_capacity_bytes(), 1);
    }

    #[test]
    fn reassembler_honours_payload_limit() {
        let mut reassembler = BridgeConfig::default()
            .max_payload_length(Some(4))
            .reassembler();
        reassembler.push_chunk(b"Content-Length:5\r\n\r\nhello");
        assert_eq!(
            reassembler.next_buffered(),
            Err(FramingError::OversizedFrame { size: 5, max: 4 })
        );
    }

    #[test]
    fn custom_frame_format_is_used() {
        let format = FrameFormat::new(Bytes::from_static(b"Len="), Bytes::from_static(b"\n"))
            .expect("valid tokens");
        let mut reassembler = BridgeConfig::default().frame_format(format).reassembler();
        reassembler.push_chunk(b"Len=2\nok");
        let frame = reassembler
            .next_buffered()
            .expect("well formed")
            .expect("complete");
        assert_eq!(frame.payload(), b"ok");
    }

    #[test]
    fn endpoints_keep_their_roles() {
        let endpoints = Endpoints::new("a:1", "p:2", "c:3");
        assert_eq!(endpoints.adapter, "a:1");
        assert_eq!(endpoints.publish, "p:2");
        assert_eq!(endpoints.control, "c:3");
    }
}
