// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway trait for the LLM backend behind every prompt template.

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::error::TripcastError;
use crate::traits::adapter::ServiceAdapter;
use crate::types::{TemplateBindings, TemplateId};

/// A stream of incremental text chunks from a single template invocation.
pub type GatewayStream = Pin<Box<dyn Stream<Item = Result<String, TripcastError>> + Send>>;

/// Adapter for the LLM backend that drives every prompt template (router,
/// planners, budget auditor, mediator, confirmation agent, ...).
///
/// A gateway with no configured backend is a valid, expected state: callers
/// are expected to surface [`TripcastError::GatewayUnconfigured`] as a single
/// error frame rather than retry.
#[async_trait]
pub trait LlmGateway: ServiceAdapter {
    /// Runs `template_id` against `bindings` and streams the response
    /// incrementally.
    async fn stream(
        &self,
        template_id: TemplateId,
        bindings: TemplateBindings,
    ) -> Result<GatewayStream, TripcastError>;

    /// Runs `template_id` against `bindings` and returns the fully buffered
    /// response. Used by callers that need the complete text before acting on
    /// it (bill parsing, JSON salvage of supervisor/mediator output).
    async fn complete(
        &self,
        template_id: TemplateId,
        bindings: TemplateBindings,
    ) -> Result<String, TripcastError> {
        use futures::StreamExt;

        let mut stream = self.stream(template_id, bindings).await?;
        let mut buffer = String::new();
        while let Some(chunk) = stream.next().await {
            buffer.push_str(&chunk?);
        }
        Ok(buffer)
    }
}
