// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-empty hosts and non-zero bus/limit sizes.

use crate::diagnostic::ConfigError;
use crate::model::TripcastConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TripcastConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.server.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    }

    if config.server.port == 0 {
        errors.push(ConfigError::Validation {
            message: "server.port must not be 0".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.room.shared_session_id.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "room.shared_session_id must not be empty".to_string(),
        });
    }

    if config.bus.ring_capacity == 0 {
        errors.push(ConfigError::Validation {
            message: "bus.ring_capacity must be greater than 0".to_string(),
        });
    }

    if config.bus.subscriber_queue_capacity == 0 {
        errors.push(ConfigError::Validation {
            message: "bus.subscriber_queue_capacity must be greater than 0".to_string(),
        });
    }

    if config.bus.replay_count > config.bus.ring_capacity {
        errors.push(ConfigError::Validation {
            message: "bus.replay_count must not exceed bus.ring_capacity".to_string(),
        });
    }

    if config.limits.plan_context_truncate_chars == 0 {
        errors.push(ConfigError::Validation {
            message: "limits.plan_context_truncate_chars must be greater than 0".to_string(),
        });
    }

    if config.limits.audit_reason_chunk_chars == 0 {
        errors.push(ConfigError::Validation {
            message: "limits.audit_reason_chunk_chars must be greater than 0".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
