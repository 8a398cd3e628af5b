// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A gateway with no vendor backend wired up.
//!
//! Tripcast ships no production LLM integration; every template invocation
//! in this process fails with [`TripcastError::GatewayUnconfigured`], and
//! the room's guard/dispatch logic surfaces that as a single error frame per
//! turn rather than retrying. `health_check` reports whether an API key is
//! configured at all, independent of whether calls would actually succeed --
//! this is what `GET /health`'s `client_configured` field reflects.

use async_trait::async_trait;

use tripcast_core::{GatewayStream, LlmGateway, ServiceAdapter, TemplateBindings, TemplateId, TripcastError};

pub struct NullGateway {
    configured: bool,
}

impl NullGateway {
    pub fn new(configured: bool) -> Self {
        Self { configured }
    }
}

#[async_trait]
impl ServiceAdapter for NullGateway {
    fn name(&self) -> &str {
        "null-gateway"
    }

    async fn health_check(&self) -> Result<(), TripcastError> {
        if self.configured {
            Ok(())
        } else {
            Err(TripcastError::GatewayUnconfigured("no gateway API key configured".into()))
        }
    }

    async fn shutdown(&self) -> Result<(), TripcastError> {
        Ok(())
    }
}

#[async_trait]
impl LlmGateway for NullGateway {
    async fn stream(&self, _template_id: TemplateId, _bindings: TemplateBindings) -> Result<GatewayStream, TripcastError> {
        Err(TripcastError::GatewayUnconfigured(
            "this build ships no production LLM vendor integration".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_fails_health_check() {
        let gateway = NullGateway::new(false);
        assert!(gateway.health_check().await.is_err());
    }

    #[tokio::test]
    async fn configured_passes_health_check_but_still_refuses_to_stream() {
        let gateway = NullGateway::new(true);
        assert!(gateway.health_check().await.is_ok());
        let result = gateway.stream(TemplateId::Router, TemplateBindings::default()).await;
        assert!(matches!(result, Err(TripcastError::GatewayUnconfigured(_))));
    }
}
