// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phases 1 and 2 of a turn: the mediation and confirmation vote guards.
//! Each either resolves the turn outright or falls through to the next
//! phase.

use tokio::sync::mpsc;

use tripcast_core::{Frame, NewTravelPlan, ParticipantId, RouteAgent, VoteKind, VoteReading, VoteState};
use tripcast_router::extract_destination_city;

use crate::dispatch::{run_modify_budget, run_modify_restaurant, run_modify_route};
use crate::reply::{emit_ai, emit_error};
use crate::room::RoomState;
use crate::vote::{classify_vote_reading, pending_voters, tally_passes};
use crate::Services;

/// Whether a guard phase resolved the turn or should hand off to the next
/// phase.
pub enum GuardOutcome {
    Handled,
    FallThrough,
}

fn format_pending(pending: &[ParticipantId]) -> String {
    pending.iter().map(|p| p.0.as_str()).collect::<Vec<_>>().join(", ")
}

pub async fn mediation_guard(
    svc: &Services<'_>,
    tx: &mpsc::Sender<Frame>,
    room: &mut RoomState,
    participant: &ParticipantId,
    username: &str,
    text: &str,
) -> GuardOutcome {
    if !room.awaiting_mediation() {
        return GuardOutcome::FallThrough;
    }

    match classify_vote_reading(text, VoteKind::Mediation) {
        VoteReading::Disagree => {
            room.mediation = None;
            emit_ai(
                svc,
                tx,
                participant,
                username,
                Some(RouteAgent::Travel),
                "The mediation was declined -- the plan stays as it was.",
            )
            .await;
            GuardOutcome::Handled
        }
        VoteReading::Neither => {
            emit_ai(
                svc,
                tx,
                participant,
                username,
                Some(RouteAgent::Travel),
                "Still waiting on a clear agree or disagree to the pending change.",
            )
            .await;
            GuardOutcome::Handled
        }
        VoteReading::Agree => {
            let active = svc.bus.active_participants();
            let mediation = room.mediation.as_mut().expect("checked awaiting_mediation above");
            mediation.votes.insert(participant.clone(), VoteState::Agree);
            let requester = mediation.requester.clone();

            if tally_passes(&mediation.votes, &active, Some(&requester)) {
                let kind = mediation.kind;
                let requester_username = mediation.requester_username.clone();
                let request_text = mediation.request_text.clone();
                room.mediation = None;
                match kind {
                    tripcast_core::ModificationKind::Route => {
                        run_modify_route(svc, tx, room, &requester, &requester_username, &request_text).await
                    }
                    tripcast_core::ModificationKind::Restaurant => {
                        run_modify_restaurant(svc, tx, room, &requester, &requester_username, &request_text).await
                    }
                    tripcast_core::ModificationKind::Budget => {
                        run_modify_budget(svc, tx, room, &requester, &requester_username, &request_text).await
                    }
                }
            } else {
                let pending = pending_voters(&mediation.votes, &active, Some(&requester));
                emit_ai(
                    svc,
                    tx,
                    participant,
                    username,
                    Some(RouteAgent::Travel),
                    format!("Vote recorded. Still waiting on: {}", format_pending(&pending)),
                )
                .await;
            }
            GuardOutcome::Handled
        }
    }
}

pub async fn confirmation_guard(
    svc: &Services<'_>,
    tx: &mpsc::Sender<Frame>,
    room: &mut RoomState,
    participant: &ParticipantId,
    username: &str,
    text: &str,
) -> GuardOutcome {
    if !room.awaiting_confirmation() {
        return GuardOutcome::FallThrough;
    }

    match classify_vote_reading(text, VoteKind::Confirmation) {
        VoteReading::Disagree => {
            room.confirmation_votes = None;
            emit_ai(
                svc,
                tx,
                participant,
                username,
                Some(RouteAgent::Travel),
                "Noted -- the plan will be revised.",
            )
            .await;
            GuardOutcome::FallThrough
        }
        VoteReading::Neither => {
            emit_ai(
                svc,
                tx,
                participant,
                username,
                Some(RouteAgent::Travel),
                "Still waiting on a clear agree, disagree, or finalize for the pending plan.",
            )
            .await;
            GuardOutcome::Handled
        }
        VoteReading::Agree => {
            let active = svc.bus.active_participants();
            let votes = room.confirmation_votes.as_mut().expect("checked awaiting_confirmation above");
            votes.insert(participant.clone(), VoteState::Agree);

            if tally_passes(votes, &active, None) {
                room.confirmation_votes = None;
                finalize_plan(svc, tx, room, participant, username).await;
            } else {
                let pending = pending_voters(votes, &active, None);
                emit_ai(
                    svc,
                    tx,
                    participant,
                    username,
                    Some(RouteAgent::Travel),
                    format!("Vote recorded. Still waiting on: {}", format_pending(&pending)),
                )
                .await;
            }
            GuardOutcome::Handled
        }
    }
}

async fn finalize_plan(
    svc: &Services<'_>,
    tx: &mpsc::Sender<Frame>,
    room: &mut RoomState,
    participant: &ParticipantId,
    username: &str,
) {
    room.destination = extract_destination_city(&room.route_plan);
    room.note_participant(username);

    let plan = NewTravelPlan {
        session_id: room.session_id.clone(),
        route_plan: room.route_plan.clone(),
        restaurant_plan: room.restaurant_plan.clone(),
        budget: room.budget,
        currency: room.currency.clone(),
        destination: room.destination.clone(),
        days: room.days,
        participants: room.known_participants.clone(),
    };

    match svc.storage.insert_travel_plan(plan).await {
        Ok(id) => {
            emit_ai(
                svc,
                tx,
                participant,
                username,
                Some(RouteAgent::Travel),
                format!("The plan is finalized (#{id})! Have a great trip."),
            )
            .await;
        }
        Err(err) => {
            emit_error(
                svc,
                tx,
                participant,
                username,
                format!("Everyone agreed, but the plan couldn't be saved: {err}"),
            )
            .await;
        }
    }
}
