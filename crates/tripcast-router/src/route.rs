// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Top-level router: classifies an utterance as bill or travel handling.

use tripcast_core::{LlmGateway, RouteAgent, TemplateBindings, TemplateId, TripcastError};

use crate::salvage::salvage_json;

/// Runs the router template and salvages its `agent` field. Any salvage
/// failure, or an `agent` value outside `travel`/`bill`/`unknown`, defaults
/// to [`RouteAgent::Unknown`] -- which is handled identically to `bill` by
/// the orchestrator, matching the original router's fallback behavior.
pub async fn classify_route(
    gateway: &dyn LlmGateway,
    bindings: TemplateBindings,
) -> Result<RouteAgent, TripcastError> {
    let text = gateway.complete(TemplateId::Router, bindings).await?;
    Ok(parse_route_response(&text))
}

fn parse_route_response(text: &str) -> RouteAgent {
    let Some(value) = salvage_json(text) else {
        tracing::debug!("router salvage failed, defaulting to unknown");
        return RouteAgent::Unknown;
    };
    match value.get("agent").and_then(|v| v.as_str()) {
        Some("travel") => RouteAgent::Travel,
        Some("bill") => RouteAgent::Bill,
        _ => RouteAgent::Unknown,
    }
}
