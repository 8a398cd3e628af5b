// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared across the tripcast workspace.

use thiserror::Error;

/// The primary error type used across tripcast's adapter traits and
/// orchestration logic.
#[derive(Debug, Error)]
pub enum TripcastError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// The LLM gateway has no configured backend; callers surface a single
    /// error frame and stop rather than retry.
    #[error("llm gateway not configured: {0}")]
    GatewayUnconfigured(String),

    /// The LLM gateway's underlying stream failed mid-flight.
    #[error("llm gateway stream error: {message}")]
    GatewayStream {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Persistence backend errors (database connection, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A room, participant, or record was referenced that doesn't exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TripcastError {
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage {
            source: Box::new(err),
        }
    }
}
