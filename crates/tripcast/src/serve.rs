// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tripcast serve` command implementation.
//!
//! Wires together SQLite storage, the room broadcast bus, the orchestrator,
//! and the gateway HTTP server, then runs until a shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use tripcast_bus::RoomBus;
use tripcast_config::TripcastConfig;
use tripcast_core::{Persistence, TripcastError};
use tripcast_gateway::{GatewayState, ServerConfig};
use tripcast_orchestrator::{Limits, Orchestrator};
use tripcast_storage::SqliteStorage;

use crate::null_gateway::NullGateway;

const DEFAULT_ROOM_CURRENCY: &str = "USD";

/// Runs the `tripcast serve` command.
///
/// Initializes storage and the room bus, constructs the orchestrator around
/// a gateway that surfaces whatever LLM configuration is present (see
/// [`NullGateway`]), and serves the HTTP surface until interrupted.
pub async fn run_serve(config: TripcastConfig) -> Result<(), TripcastError> {
    init_tracing();

    info!("starting tripcast serve");

    let storage = SqliteStorage::new(config.storage.database_path.clone());
    storage.initialize().await?;
    let storage: Arc<dyn Persistence> = Arc::new(storage);

    let gateway = Arc::new(NullGateway::new(config.gateway.openai_api_key.is_some()));

    let bus_config = tripcast_bus::BusConfig {
        ring_capacity: config.bus.ring_capacity,
        replay_count: config.bus.replay_count,
        subscriber_queue_capacity: config.bus.subscriber_queue_capacity,
    };
    let bus = Arc::new(RoomBus::new(bus_config));

    let limits = Limits {
        plan_context_truncate_chars: config.limits.plan_context_truncate_chars,
        summary_truncate_chars: config.limits.summary_truncate_chars,
        audit_reason_chunk_chars: config.limits.audit_reason_chunk_chars,
    };

    let orchestrator = Arc::new(Orchestrator::new(
        gateway,
        storage.clone(),
        bus,
        limits,
        config.room.shared_session_id.clone(),
        DEFAULT_ROOM_CURRENCY,
    ));

    let state = GatewayState {
        orchestrator,
        storage: storage.clone(),
        users: Arc::new(tripcast_gateway::users::UserRegistry::new()),
        room_session_id: config.room.shared_session_id.clone(),
        heartbeat_interval: Duration::from_secs(config.bus.heartbeat_interval_secs),
    };

    let server_config = ServerConfig { host: config.server.host.clone(), port: config.server.port };

    tokio::select! {
        result = tripcast_gateway::start_server(&server_config, state) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    storage.shutdown().await?;
    info!("tripcast serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tripcast=info,warn"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_thread_names(false).try_init();
}
