// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes and shared state for the chatroom's external surface.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use tripcast_core::{Persistence, TripcastError};
use tripcast_orchestrator::Orchestrator;

use crate::handlers;
use crate::users::UserRegistry;

/// Shared state for every axum request handler.
#[derive(Clone)]
pub struct GatewayState {
    pub orchestrator: Arc<Orchestrator>,
    pub storage: Arc<dyn Persistence>,
    pub users: Arc<UserRegistry>,
    pub room_session_id: String,
    /// Idle time before `GET /events` emits a heartbeat comment line.
    pub heartbeat_interval: Duration,
}

/// Host/port the gateway binds to.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Starts the gateway HTTP server. Binds to the configured host:port and
/// serves routes until the listener is dropped or the process is signaled.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), TripcastError> {
    let app = Router::new()
        .route("/chat", post(handlers::post_chat))
        .route("/events", get(handlers::get_events))
        .route("/user", get(handlers::get_user).post(handlers::post_user))
        .route("/health", get(handlers::get_health))
        .route("/bills", post(handlers::post_bills).get(handlers::get_bills))
        .route("/bills/{id}", get(handlers::get_bill))
        .route("/travel-plans", get(handlers::get_travel_plans))
        .route("/travel-plans/{id}", get(handlers::get_travel_plan))
        .with_state(state)
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TripcastError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!(%addr, "gateway server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| TripcastError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
