// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Budget auditor response parsing: default-to-OK-on-parse-failure is
//! deliberate and load bearing -- a parse error must never block the room.

use tripcast_core::{BudgetAuditResult, LlmGateway, TemplateBindings, TemplateId, TripcastError};

use crate::salvage::salvage_json;

/// Runs the budget checker template and parses its verdict.
pub async fn audit_budget(
    gateway: &dyn LlmGateway,
    bindings: TemplateBindings,
) -> Result<BudgetAuditResult, TripcastError> {
    let text = gateway.complete(TemplateId::BudgetChecker, bindings).await?;
    Ok(parse_budget_audit_response(&text))
}

fn parse_budget_audit_response(text: &str) -> BudgetAuditResult {
    let Some(value) = salvage_json(text) else {
        return BudgetAuditResult::unparseable_default();
    };
    BudgetAuditResult {
        budget_ok: value.get("budget_ok").and_then(|v| v.as_bool()).unwrap_or(true),
        is_feasible: value.get("is_feasible").and_then(|v| v.as_bool()).unwrap_or(true),
        reason: value
            .get("reason")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        suggestion: value
            .get("suggestion")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
    }
}

/// Splits `reason` into fixed-size chunks for incremental re-emission,
/// matching the original's chunked re-streaming of a fully-buffered string.
pub fn chunk_reason(reason: &str, chunk_chars: usize) -> Vec<String> {
    if chunk_chars == 0 || reason.is_empty() {
        return Vec::new();
    }
    let chars: Vec<char> = reason.chars().collect();
    chars
        .chunks(chunk_chars)
        .map(|c| c.iter().collect())
        .collect()
}
