// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the tripcast workspace.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Opaque, client-supplied or server-generated participant identifier.
/// No identity verification is performed -- see the room's Non-goals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub String);

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for the shared room. Exactly one is active per process; see
/// the room configuration knob for the literal value in use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(pub String);

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bindings map passed to an LLM template invocation.
pub type TemplateBindings = HashMap<String, String>;

/// Identifies which prompt template a gateway call should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    Router,
    Bill,
    TravelSupervisor,
    RoutePlanner,
    RestaurantPlanner,
    BudgetChecker,
    BudgetExtractor,
    Mediator,
    PlanConfirmation,
}

impl TemplateId {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::Router => "router",
            TemplateId::Bill => "bill",
            TemplateId::TravelSupervisor => "travel_supervisor",
            TemplateId::RoutePlanner => "route_planner",
            TemplateId::RestaurantPlanner => "restaurant_planner",
            TemplateId::BudgetChecker => "budget_checker",
            TemplateId::BudgetExtractor => "budget_extractor",
            TemplateId::Mediator => "mediator",
            TemplateId::PlanConfirmation => "plan_confirmation",
        }
    }
}

/// Which top-level handler an utterance was routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteAgent {
    Travel,
    Bill,
    Unknown,
}

/// The travel supervisor's classification of an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    NewPlan,
    ModifyRoute,
    ModifyRestaurant,
    ModifyBudget,
    ReplanAfterBudgetFail,
    ConfirmPlan,
}

impl Default for Intent {
    fn default() -> Self {
        Intent::NewPlan
    }
}

/// Which vote protocol a tally belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteKind {
    Mediation,
    Confirmation,
}

/// A single participant's vote state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteState {
    Pending,
    Agree,
}

/// What an utterance reads as, under the fixed agree/disagree keyword lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteReading {
    Agree,
    Disagree,
    Neither,
}

/// Which modification type a mediation vote is gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModificationKind {
    Route,
    Restaurant,
    Budget,
}

/// Result of a budget audit, after JSON salvage and defaulting.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetAuditResult {
    pub budget_ok: bool,
    pub is_feasible: bool,
    pub reason: String,
    pub suggestion: String,
}

impl BudgetAuditResult {
    pub fn passed(&self) -> bool {
        self.budget_ok && self.is_feasible
    }

    /// The default applied when the auditor's output can't be parsed at all.
    /// Budget is assumed OK so a parse error never blocks the room.
    pub fn unparseable_default() -> Self {
        Self {
            budget_ok: true,
            is_feasible: true,
            reason: "Unable to parse the budget check result; assuming the plan is within budget."
                .to_string(),
            suggestion: String::new(),
        }
    }
}

/// A finalized bill record, ready for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillRecord {
    pub topic: String,
    pub payer: String,
    pub participants: Vec<String>,
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub note: String,
}

fn default_currency() -> String {
    "CNY".to_string()
}

/// A bill row as stored and returned from persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub id: i64,
    pub topic: String,
    pub payer: String,
    pub participants: Vec<String>,
    pub amount: f64,
    pub currency: String,
    pub note: String,
    pub created_at: String,
    pub user_input: String,
}

/// A finalized travel plan row as stored and returned from persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelPlan {
    pub id: i64,
    pub session_id: String,
    pub route_plan: String,
    pub restaurant_plan: String,
    pub budget: Option<f64>,
    pub currency: String,
    pub destination: Option<String>,
    pub days: Option<i64>,
    pub participants: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields required to insert a new travel plan.
#[derive(Debug, Clone)]
pub struct NewTravelPlan {
    pub session_id: String,
    pub route_plan: String,
    pub restaurant_plan: String,
    pub budget: Option<f64>,
    pub currency: String,
    pub destination: Option<String>,
    pub days: Option<i64>,
    pub participants: Vec<String>,
}

/// A frame of output from one `/chat` turn, serialized as the `data:`
/// payload of an SSE event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
    Start,
    Agent { agent: RouteAgent },
    Chunk { content: String },
    BillIds { ids: Vec<i64> },
    PlannerStart { planner: String },
    PlannerChunk { planner: String, content: String },
    PlannerComplete { planner: String },
    Complete,
    Error { content: String },
}

/// The payload carried by a room-wide broadcast event, as seen by
/// `GET /events` subscribers. Distinct from [`Frame`]: a `/chat` turn emits
/// a sequence of `Frame`s to its own caller while simultaneously emitting a
/// (coarser) sequence of `RoomEvent`s to every active subscriber.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomEvent {
    pub id: String,
    #[serde(flatten)]
    pub body: RoomEventBody,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoomEventBody {
    User {
        user_id: String,
        username: String,
        content: String,
    },
    Ai {
        user_id: String,
        username: String,
        agent: Option<RouteAgent>,
        content: String,
        #[serde(rename = "isStreaming")]
        is_streaming: bool,
    },
    Planner {
        user_id: String,
        username: String,
        planner: String,
        content: String,
        #[serde(rename = "isStreaming")]
        is_streaming: bool,
    },
    Error {
        user_id: String,
        username: String,
        content: String,
    },
}
