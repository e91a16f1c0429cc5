//! FIFO of complete adapter messages awaiting decode.

use std::collections::VecDeque;

use bytes::Bytes;

/// Unbounded first-in first-out queue of raw message bodies.
///
/// Debug adapter messages are order sensitive, so bodies leave the queue in
/// exactly the order the reassembler pushed them.
#[derive(Debug, Default)]
pub struct PendingQueue {
    messages: VecDeque<Bytes>,
}

impl PendingQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Append a completed message body.
    pub fn push(&mut self, message: Bytes) { self.messages.push_back(message); }

    /// Remove the oldest message body.
    pub fn pop(&mut self) -> Option<Bytes> { self.messages.pop_front() }

    /// Number of queued messages.
    #[must_use]
    pub fn len(&self) -> usize { self.messages.len() }

    /// Returns `true` when nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.messages.is_empty() }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::PendingQueue;

    #[test]
    fn pops_in_push_order() {
        let mut queue = PendingQueue::new();
        queue.push(Bytes::from_static(b"one"));
        queue.push(Bytes::from_static(b"two"));
        queue.push(Bytes::from_static(b"three"));
        assert_eq!(queue.len(), 3);

        let drained: Vec<Bytes> = std::iter::from_fn(|| queue.pop()).collect();
        assert_eq!(drained, vec!["one", "two", "three"]);
        assert!(queue.is_empty());
    }
}
