//! Growable byte arena holding adapter bytes that are not yet framed.
//!
//! [`ByteArena`] pairs a [`BytesMut`] buffer with a scan cursor. Bytes are
//! only appended by stream reads and only removed by splitting off the prefix
//! that a completed frame consumed, so nothing read from the adapter is lost.

use bytes::{Buf, Bytes, BytesMut};

/// Contiguous buffer of unconsumed adapter bytes plus a scan cursor.
///
/// The cursor marks the offset where the next token search starts. It never
/// exceeds the arena length.
#[derive(Debug, Default)]
pub struct ByteArena {
    bytes: BytesMut,
    cursor: usize,
}

impl ByteArena {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Create an empty arena with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: BytesMut::with_capacity(capacity),
            cursor: 0,
        }
    }

    /// Append a chunk read from the stream.
    pub fn extend(&mut self, chunk: &[u8]) { self.bytes.extend_from_slice(chunk); }

    /// Number of buffered bytes.
    #[must_use]
    pub fn len(&self) -> usize { self.bytes.len() }

    /// Returns `true` when no bytes are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.bytes.is_empty() }

    /// Current scan cursor.
    #[must_use]
    pub fn cursor(&self) -> usize { self.cursor }

    /// Move the scan cursor, clamping it to the arena length.
    pub fn set_cursor(&mut self, cursor: usize) { self.cursor = cursor.min(self.bytes.len()); }

    /// Move the cursor back to where a token of `token_len` bytes could still
    /// start, so a token straddling two reads is found once the rest arrives.
    ///
    /// The cursor never moves before `floor`.
    pub fn rewind_for_token(&mut self, token_len: usize, floor: usize) {
        let hint = self.bytes.len().saturating_sub(token_len.saturating_sub(1));
        self.set_cursor(hint.max(floor));
    }

    /// Find `needle` at or after `from`, returning its absolute offset.
    #[must_use]
    pub fn find(&self, needle: &[u8], from: usize) -> Option<usize> {
        if needle.is_empty() || from >= self.bytes.len() {
            return None;
        }
        self.bytes[from..]
            .windows(needle.len())
            .position(|window| window == needle)
            .map(|pos| pos + from)
    }

    /// Borrow the bytes in `start..end`.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> &[u8] { &self.bytes[start..end] }

    /// Remove the first `end` bytes and return the `start..end` part of them.
    ///
    /// Everything before `start` (header, length field, separator and any
    /// stray bytes preceding the header) is discarded with the prefix. The
    /// cursor resets to the start of the remaining bytes.
    pub fn take_range(&mut self, start: usize, end: usize) -> Bytes {
        debug_assert!(start <= end && end <= self.bytes.len(), "range outside arena");
        let mut prefix = self.bytes.split_to(end);
        prefix.advance(start);
        self.cursor = 0;
        prefix.freeze()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::ByteArena;

    fn arena_with(bytes: &[u8]) -> ByteArena {
        let mut arena = ByteArena::new();
        arena.extend(bytes);
        arena
    }

    #[test]
    fn find_honours_start_offset() {
        let arena = arena_with(b"abcabc");
        assert_eq!(arena.find(b"abc", 0), Some(0));
        assert_eq!(arena.find(b"abc", 1), Some(3));
        assert_eq!(arena.find(b"abc", 4), None);
        assert_eq!(arena.find(b"abc", 6), None);
    }

    #[test]
    fn cursor_is_clamped_to_length() {
        let mut arena = arena_with(b"abc");
        arena.set_cursor(10);
        assert_eq!(arena.cursor(), 3);
    }

    #[rstest]
    #[case(b"xxxxCont".as_slice(), 15, 0, 0)]
    #[case(b"xxxxxxxxxxxxxxxxxxxx".as_slice(), 15, 0, 6)]
    #[case(b"xxxxxxxxxxxxxxxxxxxx".as_slice(), 15, 10, 10)]
    #[case(b"xxxx".as_slice(), 1, 0, 4)]
    fn rewind_keeps_room_for_split_tokens(
        #[case] bytes: &[u8],
        #[case] token_len: usize,
        #[case] floor: usize,
        #[case] expected: usize,
    ) {
        let mut arena = arena_with(bytes);
        arena.rewind_for_token(token_len, floor);
        assert_eq!(arena.cursor(), expected);
    }

    #[test]
    fn take_range_trims_prefix_and_keeps_remainder() {
        let mut arena = arena_with(b"hdr:payloadrest");
        arena.set_cursor(4);
        let taken = arena.take_range(4, 11);
        assert_eq!(&taken[..], b"payload");
        assert_eq!(arena.len(), 4);
        assert_eq!(arena.slice(0, 4), b"rest");
        assert_eq!(arena.cursor(), 0);
    }
}
