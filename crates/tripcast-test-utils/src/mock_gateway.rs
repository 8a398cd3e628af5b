// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock LLM gateway for deterministic testing.
//!
//! `MockGateway` implements `LlmGateway` with a per-template FIFO response
//! queue, enabling fast, CI-runnable orchestrator and router tests without a
//! real LLM backend.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream;

use tripcast_core::traits::provider::GatewayStream;
use tripcast_core::{LlmGateway, ServiceAdapter, TemplateBindings, TemplateId, TripcastError};

/// A mock LLM gateway. Each [`TemplateId`] has its own FIFO response queue;
/// when a template's queue is empty, a fixed default response is returned
/// instead of erroring, so tests that don't care about a given template's
/// output don't need to pre-load one.
pub struct MockGateway {
    responses: Mutex<HashMap<&'static str, VecDeque<String>>>,
    chunk_size: usize,
}

impl MockGateway {
    /// Creates a mock gateway with empty response queues and no artificial
    /// chunking (each `stream()` call yields the whole response in one item).
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            chunk_size: usize::MAX,
        }
    }

    /// Creates a mock gateway that splits each streamed response into
    /// `chunk_size`-character pieces, to exercise incremental consumption.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            chunk_size: chunk_size.max(1),
        }
    }

    /// Queues a response for the given template, to be returned on the next
    /// call to that template (FIFO across multiple queued responses).
    pub fn queue_response(&self, template_id: TemplateId, text: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .entry(template_id.as_str())
            .or_default()
            .push_back(text.into());
    }

    fn next_response(&self, template_id: TemplateId) -> String {
        self.responses
            .lock()
            .unwrap()
            .get_mut(template_id.as_str())
            .and_then(|q| q.pop_front())
            .unwrap_or_else(|| format!("mock response for {}", template_id.as_str()))
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceAdapter for MockGateway {
    fn name(&self) -> &str {
        "mock-gateway"
    }

    async fn health_check(&self) -> Result<(), TripcastError> {
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), TripcastError> {
        Ok(())
    }
}

#[async_trait]
impl LlmGateway for MockGateway {
    async fn stream(
        &self,
        template_id: TemplateId,
        _bindings: TemplateBindings,
    ) -> Result<GatewayStream, TripcastError> {
        let text = self.next_response(template_id);
        let pieces: Vec<Result<String, TripcastError>> = if self.chunk_size >= text.len() {
            vec![Ok(text)]
        } else {
            text.chars()
                .collect::<Vec<_>>()
                .chunks(self.chunk_size)
                .map(|c| Ok(c.iter().collect()))
                .collect()
        };
        Ok(Box::pin(stream::iter(pieces)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn default_response_when_queue_empty() {
        let gateway = MockGateway::new();
        let text = gateway.complete(TemplateId::Router, TemplateBindings::new()).await.unwrap();
        assert!(text.contains("router"));
    }

    #[tokio::test]
    async fn queued_responses_are_fifo_per_template() {
        let gateway = MockGateway::new();
        gateway.queue_response(TemplateId::Router, "first");
        gateway.queue_response(TemplateId::Router, "second");

        assert_eq!(
            gateway.complete(TemplateId::Router, TemplateBindings::new()).await.unwrap(),
            "first"
        );
        assert_eq!(
            gateway.complete(TemplateId::Router, TemplateBindings::new()).await.unwrap(),
            "second"
        );
    }

    #[tokio::test]
    async fn queues_are_independent_per_template() {
        let gateway = MockGateway::new();
        gateway.queue_response(TemplateId::Router, "router-reply");
        gateway.queue_response(TemplateId::Bill, "bill-reply");

        assert_eq!(
            gateway.complete(TemplateId::Bill, TemplateBindings::new()).await.unwrap(),
            "bill-reply"
        );
        assert_eq!(
            gateway.complete(TemplateId::Router, TemplateBindings::new()).await.unwrap(),
            "router-reply"
        );
    }

    #[tokio::test]
    async fn chunked_streaming_yields_multiple_pieces() {
        let gateway = MockGateway::with_chunk_size(4);
        gateway.queue_response(TemplateId::RoutePlanner, "abcdefgh");
        let mut stream = gateway.stream(TemplateId::RoutePlanner, TemplateBindings::new()).await.unwrap();
        let mut pieces = Vec::new();
        while let Some(chunk) = stream.next().await {
            pieces.push(chunk.unwrap());
        }
        assert_eq!(pieces, vec!["abcd".to_string(), "efgh".to_string()]);
    }
}
