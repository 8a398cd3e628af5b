// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-shot (non-streamed) reply emission: a chunk frame plus its
//! broadcast counterpart, for status messages that aren't a planner stage.

use tokio::sync::mpsc;

use tripcast_core::{Frame, ParticipantId, RouteAgent};

use crate::event;
use crate::Services;

pub async fn emit_ai(
    svc: &Services<'_>,
    tx: &mpsc::Sender<Frame>,
    participant: &ParticipantId,
    username: &str,
    agent: Option<RouteAgent>,
    content: impl Into<String>,
) {
    let content = content.into();
    let _ = tx.send(Frame::Chunk { content: content.clone() }).await;
    svc.bus.publish(event::ai_event(&participant.0, username, agent, content, false));
}

pub async fn emit_error(
    svc: &Services<'_>,
    tx: &mpsc::Sender<Frame>,
    participant: &ParticipantId,
    username: &str,
    content: impl Into<String>,
) {
    let content = content.into();
    let _ = tx.send(Frame::Error { content: content.clone() }).await;
    svc.bus.publish(event::error_event(&participant.0, username, content));
}
