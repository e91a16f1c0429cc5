//! Tests for session acknowledgement and teardown ordering.

use std::io;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use tokio::time::{Duration, timeout};

use super::BridgeSession;
use crate::{
    bridge::StopHandle,
    channel::{Channel, MemoryChannel},
    config::BridgeConfig,
    handler::{MessageHandler, Publisher},
};

#[tokio::test]
async fn acknowledges_then_closes_every_channel() {
    let (adapter, mut adapter_peer) = MemoryChannel::pair();
    let (control, mut host) = MemoryChannel::pair();
    let (publish, mut subscriber) = MemoryChannel::pair();
    let session = BridgeSession::new(BridgeConfig::default());
    session.stop_handle().stop();

    timeout(
        Duration::from_secs(1),
        session.run(adapter, control, Publisher::new(publish)),
    )
    .await
    .expect("stopped session should return")
    .expect("clean stop");

    assert_eq!(host.read().await.expect("ack"), "ACK");
    for peer in [&mut adapter_peer, &mut host, &mut subscriber] {
        let err = peer.read().await.expect_err("channel should be closed");
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}

#[tokio::test]
async fn custom_acknowledgement_is_sent() {
    let (adapter, _adapter_peer) = MemoryChannel::pair();
    let (control, mut host) = MemoryChannel::pair();
    let (publish, _subscriber) = MemoryChannel::pair();
    let stop = StopHandle::new();
    let session = BridgeSession::new(BridgeConfig::default().acknowledgement("READY"))
        .with_stop_handle(stop.clone());
    stop.stop();

    session
        .run(adapter, control, Publisher::new(publish))
        .await
        .expect("clean stop");
    assert_eq!(host.read().await.expect("ack"), "READY");
}

#[tokio::test]
async fn loop_failure_still_tears_down() {
    let (adapter, adapter_peer) = MemoryChannel::pair();
    let (control, mut host) = MemoryChannel::pair();
    let (publish, mut subscriber) = MemoryChannel::pair();
    drop(adapter_peer);
    let session = BridgeSession::new(BridgeConfig::default());

    let err = session
        .run(adapter, control, Publisher::new(publish))
        .await
        .expect_err("adapter loss ends the session");
    assert!(err.is_clean_close());

    assert_eq!(host.read().await.expect("ack"), "ACK");
    assert!(host.read().await.is_err());
    assert!(subscriber.read().await.is_err());
}

struct FailingClose;

#[async_trait]
impl MessageHandler for FailingClose {
    async fn on_event(&mut self, _raw: Bytes, _event: Value) -> io::Result<()> { Ok(()) }

    async fn close(&mut self) -> io::Result<()> { Err(io::Error::other("close failed")) }
}

#[tokio::test]
async fn teardown_errors_do_not_mask_result() {
    let (adapter, _adapter_peer) = MemoryChannel::pair();
    let (control, _host) = MemoryChannel::pair();
    let session = BridgeSession::new(BridgeConfig::default());
    session.stop_handle().stop();

    session
        .run(adapter, control, FailingClose)
        .await
        .expect("close failures are only logged");
}

#[tokio::test]
async fn acknowledgement_failure_is_returned() {
    let (adapter, _adapter_peer) = MemoryChannel::pair();
    let (control, host) = MemoryChannel::pair();
    let (publish, _subscriber) = MemoryChannel::pair();
    drop(host);
    let session = BridgeSession::new(BridgeConfig::default());

    let err = session
        .run(adapter, control, Publisher::new(publish))
        .await
        .expect_err("host is gone");
    assert!(err.is_clean_close(), "broken pipe counts as a clean close");
}
