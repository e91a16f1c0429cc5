//! Adapter-stream byte builders.

use bytes::{Bytes, BytesMut};
use dapbridge::FrameFormat;
use tokio_util::codec::Encoder;

/// Encode one payload with the default `Content-Length` framing.
#[must_use]
pub fn encode_frame(payload: &[u8]) -> Bytes { encode_frames(&[payload]) }

/// Encode consecutive payloads with the default `Content-Length` framing.
///
/// # Panics
///
/// Never in practice; encoding into memory does not fail.
#[must_use]
pub fn encode_frames(payloads: &[&[u8]]) -> Bytes {
    let mut format = FrameFormat::default();
    let mut wire = BytesMut::new();
    for payload in payloads {
        format
            .encode(Bytes::copy_from_slice(payload), &mut wire)
            .expect("in-memory encoding is infallible");
    }
    wire.freeze()
}

/// Split `bytes` at ascending `offsets`, returning every piece including
/// empty ones.
///
/// Offsets past the end are clamped, so the pieces always concatenate back to
/// `bytes`.
#[must_use]
pub fn split_at_offsets(bytes: &[u8], offsets: &[usize]) -> Vec<Vec<u8>> {
    let mut chunks = Vec::with_capacity(offsets.len() + 1);
    let mut start = 0;
    for &offset in offsets {
        let end = offset.clamp(start, bytes.len());
        chunks.push(bytes[start..end].to_vec());
        start = end;
    }
    chunks.push(bytes[start..].to_vec());
    chunks
}

#[cfg(test)]
mod tests {
    use super::{encode_frame, split_at_offsets};

    #[test]
    fn encodes_content_length_header() {
        assert_eq!(&encode_frame(b"hello")[..], b"Content-Length:5\r\n\r\nhello");
    }

    #[test]
    fn clamps_out_of_range_offsets() {
        let chunks = split_at_offsets(b"abcdef", &[2, 1, 10]);
        assert_eq!(chunks, vec![b"ab".to_vec(), Vec::new(), b"cdef".to_vec(), Vec::new()]);
    }
}
