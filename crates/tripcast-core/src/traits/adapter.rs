// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait shared by the gateway and persistence backends.

use async_trait::async_trait;

use crate::error::TripcastError;

/// The base trait for tripcast's two pluggable backends (the LLM gateway and
/// the persistence layer). Provides identity, health, and shutdown only --
/// the domain-specific operations live on [`crate::traits::gateway::LlmGateway`]
/// and [`crate::traits::storage::Persistence`].
#[async_trait]
pub trait ServiceAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Performs a health check, returning an error if the backend is unreachable
    /// or otherwise degraded.
    async fn health_check(&self) -> Result<(), TripcastError>;

    /// Gracefully shuts down the adapter, releasing any held resources.
    async fn shutdown(&self) -> Result<(), TripcastError>;
}
