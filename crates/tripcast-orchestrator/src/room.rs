// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mutable state for the single shared room.

use std::collections::HashMap;

use tripcast_core::{ModificationKind, ParticipantId, VoteState};

/// Everything a turn needs to read or write about the room it belongs to.
///
/// There is exactly one of these per process (see the room configuration
/// knob); it lives behind the mutex the orchestrator serializes turns on.
pub struct RoomState {
    pub session_id: String,
    pub route_plan: String,
    pub restaurant_plan: String,
    pub budget: Option<f64>,
    pub currency: String,
    pub destination: Option<String>,
    pub days: Option<i64>,
    pub known_participants: Vec<String>,

    pub mediation: Option<MediationState>,
    pub confirmation_votes: Option<HashMap<ParticipantId, VoteState>>,
    pub awaiting_replan_confirmation: bool,
}

impl RoomState {
    pub fn new(session_id: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            route_plan: String::new(),
            restaurant_plan: String::new(),
            budget: None,
            currency: currency.into(),
            destination: None,
            days: None,
            known_participants: Vec::new(),
            mediation: None,
            confirmation_votes: None,
            awaiting_replan_confirmation: false,
        }
    }

    pub fn awaiting_mediation(&self) -> bool {
        self.mediation.is_some()
    }

    pub fn awaiting_confirmation(&self) -> bool {
        self.confirmation_votes.is_some()
    }

    pub fn note_participant(&mut self, username: &str) {
        if !self.known_participants.iter().any(|p| p == username) {
            self.known_participants.push(username.to_string());
        }
    }

    pub fn has_plan(&self) -> bool {
        !self.route_plan.trim().is_empty()
    }
}

/// Tracked while the room is waiting on a mediation vote for a pending
/// modification request.
pub struct MediationState {
    pub requester: ParticipantId,
    pub requester_username: String,
    pub kind: ModificationKind,
    pub request_text: String,
    pub votes: HashMap<ParticipantId, VoteState>,
}

impl MediationState {
    pub fn new(
        requester: ParticipantId,
        requester_username: String,
        kind: ModificationKind,
        request_text: String,
    ) -> Self {
        Self {
            requester,
            requester_username,
            kind,
            request_text,
            votes: HashMap::new(),
        }
    }
}
