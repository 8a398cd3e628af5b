// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wraps a subscriber's receiver with an idle-heartbeat timeout so
//! intermediary proxies and browsers don't treat the SSE connection as dead.

use std::pin::Pin;
use std::time::Duration;

use futures::stream;
use futures_core::Stream;
use tokio::sync::mpsc;
use tripcast_core::RoomEvent;

/// One item out of a heartbeat-wrapped subscription stream.
#[derive(Debug, Clone)]
pub enum BusMessage {
    Event(RoomEvent),
    Heartbeat,
}

/// Turns a raw subscriber receiver into a stream that yields [`BusMessage::Heartbeat`]
/// whenever `interval` elapses with no real event, and [`BusMessage::Event`]
/// otherwise. Ends once the sender side is dropped (on unsubscribe).
pub fn with_heartbeat(
    rx: mpsc::Receiver<RoomEvent>,
    interval: Duration,
) -> Pin<Box<dyn Stream<Item = BusMessage> + Send>> {
    Box::pin(stream::unfold(rx, move |mut rx| async move {
        match tokio::time::timeout(interval, rx.recv()).await {
            Ok(Some(event)) => Some((BusMessage::Event(event), rx)),
            Ok(None) => None,
            Err(_elapsed) => Some((BusMessage::Heartbeat, rx)),
        }
    }))
}
