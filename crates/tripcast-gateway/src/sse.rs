// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server-Sent Events streaming for `POST /chat` and `GET /events`.
//!
//! `/chat` streams one turn's [`Frame`]s to the requester alone; `/events`
//! streams the room-wide [`RoomEvent`] feed (with idle heartbeats) to every
//! subscriber.

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};

use tripcast_bus::{with_heartbeat, BusMessage};
use tripcast_core::ParticipantId;

use crate::server::GatewayState;

/// `POST /chat`: runs one utterance through the orchestrator and streams
/// its frames back as they're produced.
pub async fn stream_chat(
    state: GatewayState,
    participant: ParticipantId,
    username: String,
    content: String,
) -> Sse<impl Stream<Item = Result<Event, std::convert::Infallible>>> {
    let frames = state.orchestrator.handle_utterance(participant, username, content).await;
    let events = frames.map(|frame| {
        let data = serde_json::to_string(&frame).unwrap_or_else(|_| "{}".to_string());
        Ok(Event::default().data(data))
    });
    Sse::new(events).keep_alive(KeepAlive::default())
}

/// `GET /events`: subscribes the participant to the room-wide broadcast
/// feed, replaying recent history first, then idling with a heartbeat
/// comment line once per second until an event arrives.
pub async fn stream_room_events(
    state: GatewayState,
    participant: ParticipantId,
) -> Sse<impl Stream<Item = Result<Event, std::convert::Infallible>>> {
    let (replay, rx) = state.orchestrator.bus().subscribe(participant);
    let live = with_heartbeat(rx, state.heartbeat_interval);

    let replay_events = futures::stream::iter(replay.into_iter().map(BusMessage::Event));
    let events = replay_events.chain(live).map(|message| match message {
        BusMessage::Event(event) => {
            let data = serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_string());
            Ok(Event::default().data(data))
        }
        BusMessage::Heartbeat => Ok(Event::default().comment("heartbeat")),
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
