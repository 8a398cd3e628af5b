// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests covering the chat HTTP surface wired to a real SQLite
//! backend, without a configured LLM gateway.
//!
//! These exercise the gateway crate's handlers directly against a
//! `GatewayState` built the same way `run_serve` builds one, rather than
//! opening a real socket.

use std::sync::Arc;
use std::time::Duration;

use axum::body::to_bytes;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;

use tripcast_bus::{BusConfig, RoomBus};
use tripcast_core::TemplateId;
use tripcast_gateway::users::UserRegistry;
use tripcast_gateway::GatewayState;
use tripcast_orchestrator::{Limits, Orchestrator};
use tripcast_storage::SqliteStorage;
use tripcast_test_utils::MockGateway;

async fn test_state(gateway: MockGateway) -> (GatewayState, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(SqliteStorage::new(dir.path().join("e2e.db").to_str().unwrap()));
    tripcast_core::Persistence::initialize(storage.as_ref()).await.unwrap();
    let bus = Arc::new(RoomBus::new(BusConfig::default()));
    let orchestrator =
        Arc::new(Orchestrator::new(Arc::new(gateway), storage.clone(), bus, Limits::default(), "e2e-room", "USD"));
    let state = GatewayState {
        orchestrator,
        storage,
        users: Arc::new(UserRegistry::new()),
        room_session_id: "e2e-room".into(),
        heartbeat_interval: Duration::from_secs(1),
    };
    (state, dir)
}

#[tokio::test]
async fn minted_user_can_chat_and_record_a_bill() {
    let gateway = MockGateway::new();
    gateway.queue_response(TemplateId::Router, r#"{"agent": "bill"}"#);
    gateway.queue_response(
        TemplateId::Bill,
        r#"{"topic": "dinner", "payer": "alice", "participants": ["alice", "bob"], "amount": 60}"#,
    );
    let (state, _dir) = test_state(gateway).await;

    let mint = tripcast_gateway::handlers::post_user(State(state.clone())).await;
    let alice_id = mint.0.user_id.clone();

    let mut headers = HeaderMap::new();
    headers.insert("x-user-id", alice_id.parse().unwrap());
    let body = Json(tripcast_gateway::handlers::ChatRequest {
        content: "split dinner 60 between alice and bob".into(),
        user_id: None,
    });
    let response = tripcast_gateway::handlers::post_chat(State(state.clone()), headers, body).await;
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("\"type\":\"bill_ids\""));

    let bills = tripcast_core::Persistence::list_bills(state.storage.as_ref(), None, 10, 0).await.unwrap();
    assert_eq!(bills.len(), 1);
    assert_eq!(bills[0].topic, "dinner");
}

#[tokio::test]
async fn chat_without_a_minted_user_is_rejected() {
    let (state, _dir) = test_state(MockGateway::new()).await;
    let headers = HeaderMap::new();
    let body = Json(tripcast_gateway::handlers::ChatRequest { content: "hello".into(), user_id: Some("ghost".into()) });
    let response = tripcast_gateway::handlers::post_chat(State(state), headers, body).await;
    assert_eq!(response.into_response().status(), axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_gateway_unconfigured_for_the_default_mock() {
    let (state, _dir) = test_state(MockGateway::new()).await;
    let health = tripcast_gateway::handlers::get_health(State(state)).await;
    assert!(health.0.client_configured, "MockGateway always reports healthy");
}

#[tokio::test]
async fn bills_round_trip_through_the_crud_routes() {
    let (state, _dir) = test_state(MockGateway::new()).await;
    let bill = tripcast_core::BillRecord {
        topic: "hotel".into(),
        payer: "carol".into(),
        participants: vec!["carol".into(), "dave".into()],
        amount: 220.0,
        currency: "USD".into(),
        note: String::new(),
    };
    let save_body = Json(tripcast_gateway::handlers::SaveBillsRequest { bills: vec![bill], user_input: "manual entry".into() });
    let saved = tripcast_gateway::handlers::post_bills(State(state.clone()), save_body).await;
    let bytes = to_bytes(saved.into_body(), usize::MAX).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let id = parsed["ids"][0].as_i64().unwrap();

    let fetched = tripcast_gateway::handlers::get_bill(State(state), axum::extract::Path(id)).await;
    assert_eq!(fetched.into_response().status(), axum::http::StatusCode::OK);
}

#[tokio::test]
async fn travel_plans_default_to_the_shared_room_session() {
    let (state, _dir) = test_state(MockGateway::new()).await;
    let response =
        tripcast_gateway::handlers::get_travel_plans(State(state), Query(tripcast_gateway::handlers::TravelPlansQuery { session_id: None }))
            .await;
    assert_eq!(response.into_response().status(), axum::http::StatusCode::OK);
}
