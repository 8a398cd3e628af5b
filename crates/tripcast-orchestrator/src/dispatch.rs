// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phase 3 of a turn: route the utterance to bill or travel handling, then
//! (for travel) classify its intent and branch into one of six handlers.

use tokio::sync::mpsc;

use tripcast_core::{
    BillRecord, Frame, Intent, ModificationKind, ParticipantId, RouteAgent, TemplateBindings, TemplateId,
    TripcastError,
};
use tripcast_router::{
    classify_intent, classify_route, extract_budget_via_llm, extract_travel_info, parse_bill_response,
    summarize_previous_plan, BillAction, BillQueryKind,
};

use crate::planners::{run_budget_audit, run_restaurant_planner, run_route_planner, PlannerContext};
use crate::reply::{emit_ai, emit_error};
use crate::room::{MediationState, RoomState};
use crate::Services;

const GATEWAY_UNCONFIGURED_MESSAGE: &str =
    "The AI gateway isn't configured. Travel planning and bill recording are unavailable until it is.";

/// Entry point for phase 3. Short-circuits with a single error frame if the
/// gateway has no working backend, otherwise routes to bill or travel
/// handling.
pub async fn run_supervisor_dispatch(
    svc: &Services<'_>,
    tx: &mpsc::Sender<Frame>,
    room: &mut RoomState,
    participant: &ParticipantId,
    username: &str,
    text: &str,
) {
    if svc.gateway.health_check().await.is_err() {
        emit_error(svc, tx, participant, username, GATEWAY_UNCONFIGURED_MESSAGE).await;
        return;
    }

    let mut route_bindings = TemplateBindings::new();
    route_bindings.insert("utterance".to_string(), text.to_string());
    let agent = match classify_route(svc.gateway, route_bindings).await {
        Ok(agent) => agent,
        Err(err) => {
            emit_error(svc, tx, participant, username, format!("Routing failed: {err}")).await;
            return;
        }
    };
    let _ = tx.send(Frame::Agent { agent }).await;

    match agent {
        RouteAgent::Bill | RouteAgent::Unknown => {
            run_bill_flow(svc, tx, participant, username, text).await;
        }
        RouteAgent::Travel => {
            run_travel_flow(svc, tx, room, participant, username, text).await;
        }
    }
}

async fn run_bill_flow(
    svc: &Services<'_>,
    tx: &mpsc::Sender<Frame>,
    participant: &ParticipantId,
    username: &str,
    text: &str,
) {
    let mut bindings = TemplateBindings::new();
    bindings.insert("utterance".to_string(), text.to_string());
    let raw = match svc.gateway.complete(TemplateId::Bill, bindings).await {
        Ok(raw) => raw,
        Err(err) => {
            emit_error(svc, tx, participant, username, format!("Bill handling failed: {err}")).await;
            return;
        }
    };

    match parse_bill_response(&raw) {
        Some(BillAction::Record(records)) if !records.is_empty() => {
            record_bills(svc, tx, participant, username, &records, text).await;
        }
        Some(BillAction::Record(_)) => {
            emit_ai(
                svc,
                tx,
                participant,
                username,
                Some(RouteAgent::Bill),
                "I couldn't find a complete bill in that message -- I need a topic, payer, \
                 participants, and an amount.",
            )
            .await;
        }
        Some(BillAction::Lookup(lookup)) => {
            lookup_bills(svc, tx, participant, username, lookup).await;
        }
        None => {
            emit_ai(
                svc,
                tx,
                participant,
                username,
                Some(RouteAgent::Bill),
                "I couldn't understand that as a bill request.",
            )
            .await;
        }
    }
}

async fn record_bills(
    svc: &Services<'_>,
    tx: &mpsc::Sender<Frame>,
    participant: &ParticipantId,
    username: &str,
    records: &[BillRecord],
    raw_input: &str,
) {
    match svc.storage.insert_bills(records, raw_input).await {
        Ok(ids) => {
            let _ = tx.send(Frame::BillIds { ids: ids.clone() }).await;
            let summary = format!(
                "Recorded {} bill(s) (id{}: {}).",
                ids.len(),
                if ids.len() == 1 { "" } else { "s" },
                ids.iter().map(i64::to_string).collect::<Vec<_>>().join(", ")
            );
            emit_ai(svc, tx, participant, username, Some(RouteAgent::Bill), summary).await;
        }
        Err(err) => {
            emit_error(svc, tx, participant, username, format!("Couldn't save that bill: {err}")).await;
        }
    }
}

async fn lookup_bills(
    svc: &Services<'_>,
    tx: &mpsc::Sender<Frame>,
    participant: &ParticipantId,
    username: &str,
    lookup: tripcast_router::BillLookup,
) {
    let result = match lookup.kind {
        BillQueryKind::Id => match lookup.value.parse::<i64>() {
            Ok(id) => svc.storage.get_bill(id).await.map(|b| b.into_iter().collect::<Vec<_>>()),
            Err(_) => Ok(Vec::new()),
        },
        BillQueryKind::Payer => svc.storage.list_bills(Some(&lookup.value), 20, 0).await,
        BillQueryKind::Participant => svc
            .storage
            .list_bills(None, 200, 0)
            .await
            .map(|bills| bills.into_iter().filter(|b| b.participants.iter().any(|p| p == &lookup.value)).collect()),
    };

    match result {
        Ok(bills) if bills.is_empty() => {
            emit_ai(svc, tx, participant, username, Some(RouteAgent::Bill), "No matching bills found.").await;
        }
        Ok(bills) => {
            let ids: Vec<i64> = bills.iter().map(|b| b.id).collect();
            let _ = tx.send(Frame::BillIds { ids: ids.clone() }).await;
            let summary = bills
                .iter()
                .map(|b| format!("#{} {} -- {} {} (paid by {})", b.id, b.topic, b.amount, b.currency, b.payer))
                .collect::<Vec<_>>()
                .join("\n");
            emit_ai(svc, tx, participant, username, Some(RouteAgent::Bill), summary).await;
        }
        Err(err) => {
            emit_error(svc, tx, participant, username, format!("Bill lookup failed: {err}")).await;
        }
    }
}

async fn run_travel_flow(
    svc: &Services<'_>,
    tx: &mpsc::Sender<Frame>,
    room: &mut RoomState,
    participant: &ParticipantId,
    username: &str,
    text: &str,
) {
    let mut bindings = TemplateBindings::new();
    bindings.insert("utterance".to_string(), text.to_string());
    bindings.insert(
        "previous_plan".to_string(),
        summarize_previous_plan(&room.route_plan, svc.limits.summary_truncate_chars),
    );
    bindings.insert("awaiting_replan_confirmation".to_string(), room.awaiting_replan_confirmation.to_string());

    let intent = match classify_intent(svc.gateway, bindings).await {
        Ok(intent) => intent,
        Err(err) => {
            emit_error(svc, tx, participant, username, format!("Couldn't classify that request: {err}")).await;
            return;
        }
    };

    match intent {
        Intent::ReplanAfterBudgetFail => {
            room.awaiting_replan_confirmation = false;
            run_full_replan(svc, tx, room, participant, username, text, true).await;
        }
        Intent::NewPlan => {
            apply_extraction(room, text, svc).await;
            run_full_replan(svc, tx, room, participant, username, text, false).await;
        }
        Intent::ModifyRoute => {
            dispatch_modification(svc, tx, room, participant, username, text, ModificationKind::Route).await;
        }
        Intent::ModifyRestaurant => {
            dispatch_modification(svc, tx, room, participant, username, text, ModificationKind::Restaurant).await;
        }
        Intent::ModifyBudget => {
            dispatch_modification(svc, tx, room, participant, username, text, ModificationKind::Budget).await;
        }
        Intent::ConfirmPlan => {
            open_confirmation(svc, tx, room, participant, username).await;
        }
    }
}

/// Structural extraction (with an LLM fallback for budget) feeding `room`
/// ahead of a fresh plan.
async fn apply_extraction(room: &mut RoomState, text: &str, svc: &Services<'_>) {
    let extracted = extract_travel_info(text);
    if let Some(days) = extracted.days {
        room.days = Some(days);
    }
    if let Some(budget) = extracted.budget {
        room.budget = Some(budget);
    } else if room.budget.is_none() {
        if let Ok(Some(budget)) = extract_budget_via_llm(svc.gateway, budget_bindings(text)).await {
            room.budget = Some(budget);
        }
    }
}

fn budget_bindings(text: &str) -> TemplateBindings {
    let mut bindings = TemplateBindings::new();
    bindings.insert("utterance".to_string(), text.to_string());
    bindings
}

/// Runs route planner (fresh or revision) -> restaurant planner -> budget
/// audit, applies the result to `room`, and announces pass/fail.
async fn run_full_replan(
    svc: &Services<'_>,
    tx: &mpsc::Sender<Frame>,
    room: &mut RoomState,
    participant: &ParticipantId,
    username: &str,
    request_text: &str,
    budget_friendly: bool,
) {
    let ctx = PlannerContext { gateway: svc.gateway, bus: svc.bus, tx, participant, username };

    let mut route_bindings = TemplateBindings::new();
    route_bindings.insert("mode".to_string(), if room.has_plan() { "revision" } else { "fresh" }.to_string());
    route_bindings.insert("request".to_string(), request_text.to_string());
    route_bindings.insert(
        "previous_plan".to_string(),
        summarize_previous_plan(&room.route_plan, svc.limits.plan_context_truncate_chars),
    );
    route_bindings.insert("days".to_string(), room.days.map(|d| d.to_string()).unwrap_or_default());
    route_bindings.insert("budget".to_string(), room.budget.map(|b| b.to_string()).unwrap_or_default());
    route_bindings.insert("budget_friendly".to_string(), budget_friendly.to_string());

    let route_plan = match run_route_planner(&ctx, route_bindings).await {
        Ok(text) => text,
        Err(err) => {
            emit_error(svc, tx, participant, username, format!("Route planning failed: {err}")).await;
            return;
        }
    };

    let mut restaurant_bindings = TemplateBindings::new();
    restaurant_bindings.insert("request".to_string(), request_text.to_string());
    restaurant_bindings.insert("route_plan".to_string(), route_plan.clone());

    let restaurant_plan = match run_restaurant_planner(&ctx, restaurant_bindings).await {
        Ok(text) => text,
        Err(err) => {
            emit_error(svc, tx, participant, username, format!("Restaurant planning failed: {err}")).await;
            return;
        }
    };

    finish_plan_attempt(svc, tx, room, participant, username, route_plan, restaurant_plan).await;
}

/// Shared budget-audit tail: stores the produced pair, flips
/// `awaiting_replan_confirmation`, and announces the outcome.
async fn finish_plan_attempt(
    svc: &Services<'_>,
    tx: &mpsc::Sender<Frame>,
    room: &mut RoomState,
    participant: &ParticipantId,
    username: &str,
    route_plan: String,
    restaurant_plan: String,
) {
    let ctx = PlannerContext { gateway: svc.gateway, bus: svc.bus, tx, participant, username };

    let mut audit_bindings = TemplateBindings::new();
    audit_bindings.insert("route_plan".to_string(), route_plan.clone());
    audit_bindings.insert("restaurant_plan".to_string(), restaurant_plan.clone());
    audit_bindings.insert("budget".to_string(), room.budget.map(|b| b.to_string()).unwrap_or_default());

    let result = match run_budget_audit(&ctx, audit_bindings, svc.limits.audit_reason_chunk_chars).await {
        Ok(result) => result,
        Err(err) => {
            emit_error(svc, tx, participant, username, format!("Budget audit failed: {err}")).await;
            return;
        }
    };

    room.route_plan = route_plan;
    room.restaurant_plan = restaurant_plan;
    room.awaiting_replan_confirmation = !result.passed();

    if result.passed() {
        room.confirmation_votes = None;
        emit_ai(
            svc,
            tx,
            participant,
            username,
            Some(RouteAgent::Travel),
            "The plan is within budget. Say something like \"confirm\" when everyone's happy with it.",
        )
        .await;
    }
    // a failing audit's replan prompt (with the agree-keyword hints) is part
    // of the Budget Alert frame itself -- see run_budget_audit.
}

/// `modify_route` / `modify_restaurant` / `modify_budget`: mediate if 2+
/// participants are active, otherwise apply directly.
async fn dispatch_modification(
    svc: &Services<'_>,
    tx: &mpsc::Sender<Frame>,
    room: &mut RoomState,
    participant: &ParticipantId,
    username: &str,
    text: &str,
    kind: ModificationKind,
) {
    let active = svc.bus.active_participants();
    if active.len() >= 2 {
        open_mediation(svc, tx, room, participant, username, text, kind).await;
        return;
    }

    match kind {
        ModificationKind::Route => run_modify_route(svc, tx, room, participant, username, text).await,
        ModificationKind::Restaurant => run_modify_restaurant(svc, tx, room, participant, username, text).await,
        ModificationKind::Budget => run_modify_budget(svc, tx, room, participant, username, text).await,
    }
}

async fn open_mediation(
    svc: &Services<'_>,
    tx: &mpsc::Sender<Frame>,
    room: &mut RoomState,
    participant: &ParticipantId,
    username: &str,
    text: &str,
    kind: ModificationKind,
) {
    let mut bindings = TemplateBindings::new();
    bindings.insert("kind".to_string(), modification_label(kind).to_string());
    bindings.insert("request".to_string(), text.to_string());
    bindings.insert("requester".to_string(), username.to_string());

    match svc.gateway.complete(TemplateId::Mediator, bindings).await {
        Ok(message) => {
            room.mediation = Some(MediationState::new(
                participant.clone(),
                username.to_string(),
                kind,
                text.to_string(),
            ));
            emit_ai(svc, tx, participant, username, Some(RouteAgent::Travel), message).await;
        }
        Err(err) => {
            emit_error(svc, tx, participant, username, format!("Couldn't open mediation: {err}")).await;
        }
    }
}

fn modification_label(kind: ModificationKind) -> &'static str {
    match kind {
        ModificationKind::Route => "route",
        ModificationKind::Restaurant => "restaurant",
        ModificationKind::Budget => "budget",
    }
}

pub(crate) async fn run_modify_route(
    svc: &Services<'_>,
    tx: &mpsc::Sender<Frame>,
    room: &mut RoomState,
    participant: &ParticipantId,
    username: &str,
    request_text: &str,
) {
    let ctx = PlannerContext { gateway: svc.gateway, bus: svc.bus, tx, participant, username };
    let mut bindings = TemplateBindings::new();
    bindings.insert("mode".to_string(), "revision".to_string());
    bindings.insert("request".to_string(), request_text.to_string());
    bindings.insert(
        "previous_plan".to_string(),
        summarize_previous_plan(&room.route_plan, svc.limits.plan_context_truncate_chars),
    );

    let route_plan = match run_route_planner(&ctx, bindings).await {
        Ok(text) => text,
        Err(err) => {
            emit_error(svc, tx, participant, username, format!("Route planning failed: {err}")).await;
            return;
        }
    };
    let restaurant_plan = room.restaurant_plan.clone();
    finish_plan_attempt(svc, tx, room, participant, username, route_plan, restaurant_plan).await;
}

pub(crate) async fn run_modify_restaurant(
    svc: &Services<'_>,
    tx: &mpsc::Sender<Frame>,
    room: &mut RoomState,
    participant: &ParticipantId,
    username: &str,
    request_text: &str,
) {
    let ctx = PlannerContext { gateway: svc.gateway, bus: svc.bus, tx, participant, username };
    let mut bindings = TemplateBindings::new();
    bindings.insert("request".to_string(), request_text.to_string());
    bindings.insert("route_plan".to_string(), room.route_plan.clone());

    let restaurant_plan = match run_restaurant_planner(&ctx, bindings).await {
        Ok(text) => text,
        Err(err) => {
            emit_error(svc, tx, participant, username, format!("Restaurant planning failed: {err}")).await;
            return;
        }
    };
    let route_plan = room.route_plan.clone();
    finish_plan_attempt(svc, tx, room, participant, username, route_plan, restaurant_plan).await;
}

/// `modify_budget`'s resolved value is written to room state even when the
/// subsequent budget audit fails -- only the plan text's finalization is
/// gated on the audit, not the stored figure.
pub(crate) async fn run_modify_budget(
    svc: &Services<'_>,
    tx: &mpsc::Sender<Frame>,
    room: &mut RoomState,
    participant: &ParticipantId,
    username: &str,
    request_text: &str,
) {
    let extracted = extract_travel_info(request_text);
    let resolved: Result<Option<f64>, TripcastError> = match extracted.budget {
        Some(budget) => Ok(Some(budget)),
        None => extract_budget_via_llm(svc.gateway, budget_bindings(request_text)).await,
    };
    match resolved {
        Ok(Some(budget)) => room.budget = Some(budget),
        Ok(None) => {
            emit_ai(
                svc,
                tx,
                participant,
                username,
                Some(RouteAgent::Travel),
                "I couldn't find a new budget figure in that message.",
            )
            .await;
            return;
        }
        Err(err) => {
            emit_error(svc, tx, participant, username, format!("Budget extraction failed: {err}")).await;
            return;
        }
    }

    let route_plan = room.route_plan.clone();
    let restaurant_plan = room.restaurant_plan.clone();
    finish_plan_attempt(svc, tx, room, participant, username, route_plan, restaurant_plan).await;
}

async fn open_confirmation(
    svc: &Services<'_>,
    tx: &mpsc::Sender<Frame>,
    room: &mut RoomState,
    participant: &ParticipantId,
    username: &str,
) {
    let mut bindings = TemplateBindings::new();
    bindings.insert("route_plan".to_string(), room.route_plan.clone());
    bindings.insert("restaurant_plan".to_string(), room.restaurant_plan.clone());
    bindings.insert("budget".to_string(), room.budget.map(|b| b.to_string()).unwrap_or_default());

    match svc.gateway.complete(TemplateId::PlanConfirmation, bindings).await {
        Ok(message) => {
            room.confirmation_votes = Some(std::collections::HashMap::new());
            emit_ai(svc, tx, participant, username, Some(RouteAgent::Travel), message).await;
        }
        Err(err) => {
            emit_error(svc, tx, participant, username, format!("Couldn't open confirmation: {err}")).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Limits;
    use tripcast_bus::{BusConfig, RoomBus};
    use tripcast_core::Persistence;
    use tripcast_storage::SqliteStorage;
    use tripcast_test_utils::MockGateway;

    async fn test_services() -> (MockGateway, SqliteStorage, RoomBus, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::new(dir.path().join("test.db").to_str().unwrap());
        storage.initialize().await.unwrap();
        (MockGateway::new(), storage, RoomBus::new(BusConfig::default()), dir)
    }

    /// A resolved `modify_budget` value is written to room state even when
    /// the subsequent budget audit fails.
    #[tokio::test]
    async fn modify_budget_persists_new_value_even_when_audit_fails() {
        let (gateway, storage, bus, _dir) = test_services().await;
        gateway.queue_response(
            TemplateId::BudgetChecker,
            r#"{"budget_ok": false, "is_feasible": false, "reason": "still too high", "suggestion": "cut a hotel night"}"#,
        );
        let svc = Services { gateway: &gateway, storage: &storage, bus: &bus, limits: Limits::default() };
        let mut room = RoomState::new("room", "USD");
        room.route_plan = "Day 1: Tokyo".into();
        room.restaurant_plan = "Sushi on day 1".into();
        room.budget = Some(1000.0);

        let participant = ParticipantId("alice".into());
        let (tx, mut rx) = mpsc::channel(32);
        run_modify_budget(&svc, &tx, &mut room, &participant, "alice", "actually, change the budget to $500").await;

        assert_eq!(room.budget, Some(500.0));
        assert!(room.awaiting_replan_confirmation, "a failing audit should still flag a pending replan");

        drop(tx);
        let mut saw_alert = false;
        while let Some(frame) = rx.recv().await {
            if let Frame::PlannerChunk { content, .. } = frame {
                if content.contains("Budget Alert") {
                    saw_alert = true;
                }
            }
        }
        assert!(saw_alert);
    }

    #[tokio::test]
    async fn modify_budget_with_no_resolvable_value_leaves_budget_untouched() {
        let (gateway, storage, bus, _dir) = test_services().await;
        // BudgetExtractor's fallback defaults `found` to false via MockGateway's
        // fixed "mock response" string, which salvages to no JSON object and
        // so to `None`.
        let svc = Services { gateway: &gateway, storage: &storage, bus: &bus, limits: Limits::default() };
        let mut room = RoomState::new("room", "USD");
        room.budget = Some(1000.0);

        let participant = ParticipantId("alice".into());
        let (tx, _rx) = mpsc::channel(32);
        run_modify_budget(&svc, &tx, &mut room, &participant, "alice", "please adjust the spending a bit").await;

        assert_eq!(room.budget, Some(1000.0));
    }

    #[tokio::test]
    async fn bill_route_agent_frame_emitted_before_recording() {
        let (gateway, storage, bus, _dir) = test_services().await;
        gateway.queue_response(TemplateId::Router, r#"{"agent": "bill"}"#);
        gateway.queue_response(
            TemplateId::Bill,
            r#"{"topic": "dinner", "payer": "alice", "participants": ["alice", "bob"], "amount": 80}"#,
        );
        let svc = Services { gateway: &gateway, storage: &storage, bus: &bus, limits: Limits::default() };
        let mut room = RoomState::new("room", "USD");
        let participant = ParticipantId("alice".into());
        let (tx, mut rx) = mpsc::channel(32);

        run_supervisor_dispatch(&svc, &tx, &mut room, &participant, "alice", "split dinner 80 between alice and bob").await;

        drop(tx);
        let mut frames = Vec::new();
        while let Some(frame) = rx.recv().await {
            frames.push(frame);
        }
        assert!(matches!(frames.first(), Some(Frame::Agent { agent: RouteAgent::Bill })));
        assert!(frames.iter().any(|f| matches!(f, Frame::BillIds { ids } if ids.len() == 1)));

        let bills = storage.list_bills(None, 10, 0).await.unwrap();
        assert_eq!(bills.len(), 1);
    }
}
