// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the chatroom's external surface.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use tripcast_core::{BillRecord, ParticipantId};

use crate::server::GatewayState;
use crate::sse;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse { error: message.into() })).into_response()
}

/// Pulls the caller's participant id from the `X-User-ID` header or a
/// `user_id` query parameter, in that order. No verification is performed;
/// see the room's Non-goals.
fn participant_from_request(headers: &HeaderMap, query_user_id: Option<&str>) -> Option<ParticipantId> {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| query_user_id.map(str::to_string))
        .filter(|s| !s.is_empty())
        .map(ParticipantId)
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub content: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// `POST /chat` -- submits one utterance and streams that turn's frames
/// back as Server-Sent Events.
pub async fn post_chat(State(state): State<GatewayState>, headers: HeaderMap, Json(body): Json<ChatRequest>) -> Response {
    let Some(participant) = participant_from_request(&headers, body.user_id.as_deref()) else {
        return error(StatusCode::BAD_REQUEST, "a participant id is required (X-User-ID header or user_id field)");
    };
    let Some(username) = state.users.lookup(&participant) else {
        return error(StatusCode::NOT_FOUND, "unknown participant id; call POST /user first");
    };

    sse::stream_chat(state, participant, username, body.content).await.into_response()
}

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub user_id: Option<String>,
}

/// `GET /events` -- subscribes to the room-wide broadcast feed.
pub async fn get_events(State(state): State<GatewayState>, headers: HeaderMap, Query(query): Query<EventsQuery>) -> Response {
    let Some(participant) = participant_from_request(&headers, query.user_id.as_deref()) else {
        return error(StatusCode::BAD_REQUEST, "a participant id is required (X-User-ID header or user_id query param)");
    };

    sse::stream_room_events(state, participant).await.into_response()
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user_id: String,
    pub username: String,
}

/// `POST /user` -- mints a new participant id and display name.
pub async fn post_user(State(state): State<GatewayState>) -> Json<UserResponse> {
    let (id, username) = state.users.create();
    Json(UserResponse { user_id: id.0, username })
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: Option<String>,
}

/// `GET /user` -- fetches a previously minted participant's display name.
pub async fn get_user(State(state): State<GatewayState>, headers: HeaderMap, Query(query): Query<UserQuery>) -> Response {
    let Some(participant) = participant_from_request(&headers, query.user_id.as_deref()) else {
        return error(StatusCode::BAD_REQUEST, "user_id is required");
    };
    match state.users.lookup(&participant) {
        Some(username) => Json(UserResponse { user_id: participant.0, username }).into_response(),
        None => error(StatusCode::NOT_FOUND, "user not found"),
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub client_configured: bool,
}

/// `GET /health` -- reports whether the LLM gateway has a working backend.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let client_configured = state.orchestrator.gateway_configured().await;
    Json(HealthResponse { status: "ok", client_configured })
}

#[derive(Debug, Deserialize)]
pub struct SaveBillsRequest {
    pub bills: Vec<BillRecord>,
    #[serde(default)]
    pub user_input: String,
}

#[derive(Debug, Serialize)]
pub struct SaveBillsResponse {
    pub success: bool,
    pub ids: Vec<i64>,
}

/// `POST /bills` -- records a batch of bills directly, bypassing the chat
/// router.
pub async fn post_bills(State(state): State<GatewayState>, Json(body): Json<SaveBillsRequest>) -> Response {
    if body.bills.is_empty() {
        return error(StatusCode::BAD_REQUEST, "bills must not be empty");
    }
    match state.storage.insert_bills(&body.bills, &body.user_input).await {
        Ok(ids) => Json(SaveBillsResponse { success: true, ids }).into_response(),
        Err(err) => error(StatusCode::INTERNAL_SERVER_ERROR, format!("failed to save bills: {err}")),
    }
}

#[derive(Debug, Deserialize)]
pub struct ListBillsQuery {
    pub payer: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub per_page: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ListBillsResponse {
    pub success: bool,
    pub data: Vec<tripcast_core::Bill>,
}

/// `GET /bills` -- lists bills newest-first, optionally filtered by payer.
pub async fn get_bills(State(state): State<GatewayState>, Query(query): Query<ListBillsQuery>) -> Response {
    let per_page = query.per_page.unwrap_or(20).clamp(1, 200);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    match state.storage.list_bills(query.payer.as_deref(), per_page, offset).await {
        Ok(data) => Json(ListBillsResponse { success: true, data }).into_response(),
        Err(err) => error(StatusCode::INTERNAL_SERVER_ERROR, format!("failed to list bills: {err}")),
    }
}

#[derive(Debug, Serialize)]
pub struct GetBillResponse {
    pub success: bool,
    pub data: tripcast_core::Bill,
}

/// `GET /bills/{id}` -- fetches a single bill.
pub async fn get_bill(State(state): State<GatewayState>, Path(id): Path<i64>) -> Response {
    match state.storage.get_bill(id).await {
        Ok(Some(bill)) => Json(GetBillResponse { success: true, data: bill }).into_response(),
        Ok(None) => error(StatusCode::NOT_FOUND, format!("no bill with id {id}")),
        Err(err) => error(StatusCode::INTERNAL_SERVER_ERROR, format!("failed to fetch bill: {err}")),
    }
}

#[derive(Debug, Deserialize)]
pub struct TravelPlansQuery {
    pub session_id: Option<String>,
}

/// `GET /travel-plans[?session_id=...]` -- lists finalized plans for a
/// room, defaulting to the current process's shared room.
pub async fn get_travel_plans(State(state): State<GatewayState>, Query(query): Query<TravelPlansQuery>) -> Response {
    let session_id = query.session_id.unwrap_or_else(|| state.room_session_id.clone());
    match state.storage.list_travel_plans(&session_id).await {
        Ok(plans) => Json(plans).into_response(),
        Err(err) => error(StatusCode::INTERNAL_SERVER_ERROR, format!("failed to list travel plans: {err}")),
    }
}

/// `GET /travel-plans/{id}` -- fetches a single finalized plan.
pub async fn get_travel_plan(State(state): State<GatewayState>, Path(id): Path<i64>) -> Response {
    match state.storage.get_travel_plan(id).await {
        Ok(Some(plan)) => Json(plan).into_response(),
        Ok(None) => error(StatusCode::NOT_FOUND, format!("no travel plan with id {id}")),
        Err(err) => error(StatusCode::INTERNAL_SERVER_ERROR, format!("failed to fetch travel plan: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn participant_prefers_header_over_query() {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", "from-header".parse().unwrap());
        let participant = participant_from_request(&headers, Some("from-query"));
        assert_eq!(participant, Some(ParticipantId("from-header".into())));
    }

    #[test]
    fn participant_falls_back_to_query() {
        let headers = HeaderMap::new();
        let participant = participant_from_request(&headers, Some("from-query"));
        assert_eq!(participant, Some(ParticipantId("from-query".into())));
    }

    #[test]
    fn participant_missing_is_none() {
        let headers = HeaderMap::new();
        assert_eq!(participant_from_request(&headers, None), None);
    }
}
