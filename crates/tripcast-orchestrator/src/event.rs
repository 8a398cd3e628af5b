// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Construction helpers for room-wide broadcast events.

use chrono::Utc;
use tripcast_core::{RoomEvent, RoomEventBody, RouteAgent};

fn stamp(body: RoomEventBody) -> RoomEvent {
    stamp_with_id(uuid::Uuid::new_v4().to_string(), body)
}

fn stamp_with_id(id: String, body: RoomEventBody) -> RoomEvent {
    RoomEvent { id, body, timestamp: Utc::now().to_rfc3339() }
}

pub fn user_event(user_id: &str, username: &str, content: impl Into<String>) -> RoomEvent {
    stamp(RoomEventBody::User {
        user_id: user_id.to_string(),
        username: username.to_string(),
        content: content.into(),
    })
}

pub fn ai_event(
    user_id: &str,
    username: &str,
    agent: Option<RouteAgent>,
    content: impl Into<String>,
    is_streaming: bool,
) -> RoomEvent {
    stamp(RoomEventBody::Ai {
        user_id: user_id.to_string(),
        username: username.to_string(),
        agent,
        content: content.into(),
        is_streaming,
    })
}

/// Builds a planner event carrying `id`, the caller-supplied stable id for
/// this planner invocation's whole streaming lifecycle. Every chunk of the
/// same planner run shares one id so the bus's replay ring collapses them
/// into a single, latest-content entry instead of accumulating one ring
/// slot per chunk.
pub fn planner_event(
    id: &str,
    user_id: &str,
    username: &str,
    planner: &str,
    content: impl Into<String>,
    is_streaming: bool,
) -> RoomEvent {
    stamp_with_id(
        id.to_string(),
        RoomEventBody::Planner {
            user_id: user_id.to_string(),
            username: username.to_string(),
            planner: planner.to_string(),
            content: content.into(),
            is_streaming,
        },
    )
}

pub fn error_event(user_id: &str, username: &str, content: impl Into<String>) -> RoomEvent {
    stamp(RoomEventBody::Error {
        user_id: user_id.to_string(),
        username: username.to_string(),
        content: content.into(),
    })
}
