// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Streaming execution of the route planner, restaurant planner, and budget
//! auditor template calls. Each stage emits frames to its caller and
//! broadcasts the same content to the room as it's produced.

use futures::StreamExt;
use tokio::sync::mpsc;

use tripcast_core::{
    BudgetAuditResult, Frame, LlmGateway, ParticipantId, RoomEvent, TemplateBindings, TemplateId,
    TripcastError,
};
use tripcast_bus::RoomBus;
use tripcast_router::{audit_budget, chunk_reason};

use crate::event;

pub const BUDGET_AUDITOR_NAME: &str = "budget_auditor";

/// Fixed prompt appended to a failing budget audit's alert text, naming the
/// keywords a reply needs for the travel supervisor to classify the next
/// turn as `replan_after_budget_fail`.
const BUDGET_REPLAN_PROMPT: &str =
    "\nWould you like me to replan the route and restaurants to fit your budget?\n\
     Reply 'yes', 'ok', or 'replan' if you'd like a new plan within budget.\n";

/// Shared handles a planner stage needs: where to stream frames for this
/// turn's caller, and the room-wide bus everyone else's `GET /events`
/// connection reads from.
pub struct PlannerContext<'a> {
    pub gateway: &'a dyn LlmGateway,
    pub bus: &'a RoomBus,
    pub tx: &'a mpsc::Sender<Frame>,
    pub participant: &'a ParticipantId,
    pub username: &'a str,
}

impl PlannerContext<'_> {
    async fn emit(&self, frame: Frame, event: RoomEvent) {
        let _ = self.tx.send(frame).await;
        self.bus.publish(event);
    }

    async fn emit_start(&self, message_id: &str, planner: &str) {
        self.emit(
            Frame::PlannerStart { planner: planner.to_string() },
            event::planner_event(message_id, &self.participant.0, self.username, planner, "", true),
        )
        .await;
    }

    /// `delta` is the incremental text just produced, sent to this turn's
    /// own caller as a `Frame::PlannerChunk`. `snapshot` is the full text
    /// accumulated so far, published to the room bus under `message_id` so
    /// the replay ring holds one entry with the latest content rather than
    /// one entry per chunk.
    async fn emit_chunk(&self, message_id: &str, planner: &str, delta: &str, snapshot: &str) {
        self.emit(
            Frame::PlannerChunk { planner: planner.to_string(), content: delta.to_string() },
            event::planner_event(message_id, &self.participant.0, self.username, planner, snapshot, true),
        )
        .await;
    }

    /// `snapshot` is the full text accumulated over the run, republished
    /// under `message_id` with `is_streaming: false` so the ring's final
    /// entry for this message holds the complete content rather than being
    /// wiped back to empty.
    async fn emit_complete(&self, message_id: &str, planner: &str, snapshot: &str) {
        self.emit(
            Frame::PlannerComplete { planner: planner.to_string() },
            event::planner_event(message_id, &self.participant.0, self.username, planner, snapshot, false),
        )
        .await;
    }
}

async fn run_planner_stage(
    ctx: &PlannerContext<'_>,
    planner_name: &str,
    template_id: TemplateId,
    bindings: TemplateBindings,
) -> Result<String, TripcastError> {
    let message_id = uuid::Uuid::new_v4().to_string();
    ctx.emit_start(&message_id, planner_name).await;
    let mut stream = ctx.gateway.stream(template_id, bindings).await?;
    let mut full = String::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        full.push_str(&chunk);
        ctx.emit_chunk(&message_id, planner_name, &chunk, &full).await;
    }
    ctx.emit_complete(&message_id, planner_name, &full).await;
    Ok(full)
}

/// Runs the route planner. `bindings` should carry `mode` ("fresh" or
/// "revision") along with whatever context that mode needs -- see the
/// dispatch module for exact binding construction.
pub async fn run_route_planner(
    ctx: &PlannerContext<'_>,
    bindings: TemplateBindings,
) -> Result<String, TripcastError> {
    run_planner_stage(ctx, "route_planner", TemplateId::RoutePlanner, bindings).await
}

/// Runs the restaurant planner, given the current route plan as context.
pub async fn run_restaurant_planner(
    ctx: &PlannerContext<'_>,
    bindings: TemplateBindings,
) -> Result<String, TripcastError> {
    run_planner_stage(ctx, "restaurant_planner", TemplateId::RestaurantPlanner, bindings).await
}

/// Runs the budget auditor and re-streams its (fully buffered) reason in
/// fixed-size chunks of `reason_chunk_chars`, matching the original's
/// chunked re-emission cadence. On a failing audit, prefixes a "Budget
/// Alert" header, appends the suggestion, and closes with the fixed
/// replan-confirmation prompt.
pub async fn run_budget_audit(
    ctx: &PlannerContext<'_>,
    bindings: TemplateBindings,
    reason_chunk_chars: usize,
) -> Result<BudgetAuditResult, TripcastError> {
    let result = audit_budget(ctx.gateway, bindings).await?;
    let message_id = uuid::Uuid::new_v4().to_string();

    ctx.emit_start(&message_id, BUDGET_AUDITOR_NAME).await;

    let mut alert = String::new();
    if !result.passed() {
        alert.push_str("\u{26a0}\u{fe0f} Budget Alert\n");
        ctx.emit_chunk(&message_id, BUDGET_AUDITOR_NAME, "\u{26a0}\u{fe0f} Budget Alert\n", &alert).await;
    }
    for chunk in chunk_reason(&result.reason, reason_chunk_chars) {
        alert.push_str(&chunk);
        ctx.emit_chunk(&message_id, BUDGET_AUDITOR_NAME, &chunk, &alert).await;
    }
    if !result.passed() && !result.suggestion.is_empty() {
        let suggestion = format!("\nSuggestion: {}", result.suggestion);
        for chunk in chunk_reason(&suggestion, reason_chunk_chars) {
            alert.push_str(&chunk);
            ctx.emit_chunk(&message_id, BUDGET_AUDITOR_NAME, &chunk, &alert).await;
        }
    }
    if !result.passed() {
        alert.push_str(BUDGET_REPLAN_PROMPT);
        ctx.emit_chunk(&message_id, BUDGET_AUDITOR_NAME, BUDGET_REPLAN_PROMPT, &alert).await;
    }

    ctx.emit_complete(&message_id, BUDGET_AUDITOR_NAME, &alert).await;
    Ok(result)
}
