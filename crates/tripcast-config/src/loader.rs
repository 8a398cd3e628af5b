// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Merge order: compiled defaults, then `./tripcast.toml`, then
//! `TRIPCAST_*` environment variable overrides.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::TripcastConfig;

/// Load configuration from `./tripcast.toml` with env var overrides.
pub fn load_config() -> Result<TripcastConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<TripcastConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TripcastConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TripcastConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TripcastConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TripcastConfig::default()))
        .merge(Toml::file("tripcast.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// CRITICAL: uses `Env::map()` not `Env::split("_")` so `TRIPCAST_STORAGE_DATABASE_PATH`
/// maps to `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("TRIPCAST_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("gateway_", "gateway.", 1)
            .replacen("room_", "room.", 1)
            .replacen("bus_", "bus.", 1)
            .replacen("limits_", "limits.", 1);
        mapped.into()
    })
}
