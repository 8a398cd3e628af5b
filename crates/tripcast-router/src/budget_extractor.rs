// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Budget Extractor: a narrow LLM fallback for pulling a numeric budget out
//! of free text that [`crate::extraction::extract_budget`] couldn't parse
//! syntactically.

use tripcast_core::{LlmGateway, TemplateBindings, TemplateId, TripcastError};

use crate::salvage::salvage_json;

/// Runs the budget extractor template and salvages a numeric budget.
/// Returns `Some(value)` only when the salvaged object's `found` field is
/// truthy and `value` parses as a number; `None` in every other case.
pub async fn extract_budget_via_llm(
    gateway: &dyn LlmGateway,
    bindings: TemplateBindings,
) -> Result<Option<f64>, TripcastError> {
    let text = gateway.complete(TemplateId::BudgetExtractor, bindings).await?;
    Ok(parse_budget_extractor_response(&text))
}

fn parse_budget_extractor_response(text: &str) -> Option<f64> {
    let value = salvage_json(text)?;
    let found = value.get("found")?.as_bool().unwrap_or(false);
    if !found {
        return None;
    }
    value.get("value")?.as_f64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_value_when_found_true() {
        let text = r#"{"found": true, "value": 1200.5}"#;
        assert_eq!(parse_budget_extractor_response(text), Some(1200.5));
    }

    #[test]
    fn returns_none_when_found_false() {
        let text = r#"{"found": false, "value": 1200.5}"#;
        assert_eq!(parse_budget_extractor_response(text), None);
    }

    #[test]
    fn returns_none_on_salvage_failure() {
        assert_eq!(parse_budget_extractor_response("not json"), None);
    }
}
