//! Dispatch hooks invoked for decoded adapter messages.
//!
//! [`MessageHandler`] is what the event loop hands each classified message
//! to. [`Publisher`] is the stock handler: it fans events out on the publish
//! channel and leaves responses to whoever correlates them with requests.

use std::io;

use async_trait::async_trait;
use bytes::Bytes;
use log::debug;
use serde_json::Value;

use crate::channel::Channel;

/// Callbacks receiving messages that passed the decode boundary.
///
/// Both the raw body and the parsed value are provided so handlers can
/// forward the original bytes without re-serialising. An error returned from
/// a callback is treated as a transport failure and ends the session.
#[async_trait]
pub trait MessageHandler: Send {
    /// Called for every message classified as an event.
    async fn on_event(&mut self, raw: Bytes, event: Value) -> io::Result<()>;

    /// Called for every message classified as a response.
    ///
    /// The default implementation logs the response and drops it.
    async fn on_response(&mut self, _raw: Bytes, response: Value) -> io::Result<()> {
        debug!(
            "response dropped: request_seq={}, command={}",
            response["request_seq"], response["command"]
        );
        Ok(())
    }

    /// Release any channel owned by the handler.
    async fn close(&mut self) -> io::Result<()> { Ok(()) }
}

/// Handler publishing each event's raw body on a channel.
#[derive(Debug)]
pub struct Publisher<P> {
    channel: P,
}

impl<P: Channel> Publisher<P> {
    /// Publish events on `channel`.
    #[must_use]
    pub fn new(channel: P) -> Self { Self { channel } }

    /// Borrow the publish channel.
    pub fn channel_mut(&mut self) -> &mut P { &mut self.channel }

    /// Consume the handler, returning the publish channel.
    #[must_use]
    pub fn into_inner(self) -> P { self.channel }
}

#[async_trait]
impl<P: Channel> MessageHandler for Publisher<P> {
    async fn on_event(&mut self, raw: Bytes, _event: Value) -> io::Result<()> {
        self.channel.write(raw).await?;
        crate::metrics::inc_events_published();
        Ok(())
    }

    async fn close(&mut self) -> io::Result<()> { self.channel.close().await }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use serde_json::json;

    use super::{MessageHandler, Publisher};
    use crate::channel::{Channel, MemoryChannel};

    #[tokio::test]
    async fn events_are_published_unchanged() {
        let (publish, mut subscriber) = MemoryChannel::pair();
        let mut publisher = Publisher::new(publish);
        let raw = Bytes::from_static(br#"{"type":"event","event":"output"}"#);

        publisher
            .on_event(raw.clone(), json!({"type": "event", "event": "output"}))
            .await
            .expect("publish");
        assert_eq!(subscriber.read().await.expect("read"), raw);
    }

    #[tokio::test]
    async fn responses_are_not_published() {
        let (publish, mut subscriber) = MemoryChannel::pair();
        let mut publisher = Publisher::new(publish);

        publisher
            .on_response(
                Bytes::from_static(br#"{"type":"response"}"#),
                json!({"type": "response"}),
            )
            .await
            .expect("response handled");
        assert!(subscriber.try_read().is_none());
    }
}
