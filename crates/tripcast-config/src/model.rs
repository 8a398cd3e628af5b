// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the tripcast chatroom service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Top-level tripcast configuration.
///
/// Loaded from `./tripcast.toml` with `TRIPCAST_*` environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TripcastConfig {
    /// HTTP server bind settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// SQLite persistence settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// LLM gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Shared chatroom identity.
    #[serde(default)]
    pub room: RoomConfig,

    /// Broadcast bus sizing.
    #[serde(default)]
    pub bus: BusConfig,

    /// Text-handling limits shared across planner and auditor modules.
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the server to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// SQLite persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("tripcast").join("tripcast.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("tripcast.db"))
        .to_string_lossy()
        .into_owned()
}

/// LLM gateway configuration.
///
/// `openai_api_key` is carried for parity with the original service's
/// `OPENAI_API_KEY` environment variable and surfaces as `client_configured`
/// on the health endpoint; no production gateway implementation ships here.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    #[serde(default, skip_serializing)]
    pub openai_api_key: Option<SecretString>,
}

/// Shared chatroom identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoomConfig {
    /// The single shared room id every participant joins, regardless of how
    /// they connect. `GET /travel-plans?session_id=...` filters by this
    /// value across history; it does not select among multiple live rooms.
    #[serde(default = "default_shared_session_id")]
    pub shared_session_id: String,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            shared_session_id: default_shared_session_id(),
        }
    }
}

fn default_shared_session_id() -> String {
    "shared-chatroom".to_string()
}

/// Broadcast bus sizing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BusConfig {
    /// Capacity of the replay ring; oldest events are evicted on overflow.
    #[serde(default = "default_ring_capacity")]
    pub ring_capacity: usize,

    /// How many of the most recent ring events a new subscriber replays.
    #[serde(default = "default_replay_count")]
    pub replay_count: usize,

    /// Capacity of each subscriber's outbound queue.
    #[serde(default = "default_subscriber_queue_capacity")]
    pub subscriber_queue_capacity: usize,

    /// Idle seconds before a heartbeat frame is emitted on a subscription.
    #[serde(default = "default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            ring_capacity: default_ring_capacity(),
            replay_count: default_replay_count(),
            subscriber_queue_capacity: default_subscriber_queue_capacity(),
            heartbeat_interval_secs: default_heartbeat_interval_secs(),
        }
    }
}

fn default_ring_capacity() -> usize {
    1000
}

fn default_replay_count() -> usize {
    50
}

fn default_subscriber_queue_capacity() -> usize {
    100
}

fn default_heartbeat_interval_secs() -> u64 {
    1
}

/// Text-handling limits shared across the supervisor, planner, and auditor.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Max characters of a previous plan fed back into a revision prompt.
    #[serde(default = "default_plan_context_truncate_chars")]
    pub plan_context_truncate_chars: usize,

    /// Max characters of a previous plan summarized for the supervisor.
    #[serde(default = "default_summary_truncate_chars")]
    pub summary_truncate_chars: usize,

    /// Chunk size used when streaming a budget audit's reason text.
    #[serde(default = "default_audit_reason_chunk_chars")]
    pub audit_reason_chunk_chars: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            plan_context_truncate_chars: default_plan_context_truncate_chars(),
            summary_truncate_chars: default_summary_truncate_chars(),
            audit_reason_chunk_chars: default_audit_reason_chunk_chars(),
        }
    }
}

fn default_plan_context_truncate_chars() -> usize {
    3000
}

fn default_summary_truncate_chars() -> usize {
    500
}

fn default_audit_reason_chunk_chars() -> usize {
    50
}
