// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Travel supervisor: classifies a travel-routed utterance into an [`Intent`].

use tripcast_core::{Intent, LlmGateway, TemplateBindings, TemplateId, TripcastError};

use crate::salvage::salvage_json;

/// Runs the travel supervisor template and salvages its `intent` field,
/// defaulting to [`Intent::NewPlan`] on any salvage failure or an absent /
/// unrecognized field -- matching the original exactly.
pub async fn classify_intent(
    gateway: &dyn LlmGateway,
    bindings: TemplateBindings,
) -> Result<Intent, TripcastError> {
    let text = gateway.complete(TemplateId::TravelSupervisor, bindings).await?;
    Ok(parse_intent_response(&text))
}

fn parse_intent_response(text: &str) -> Intent {
    let Some(value) = salvage_json(text) else {
        return Intent::NewPlan;
    };
    match value.get("intent").and_then(|v| v.as_str()) {
        Some("new_plan") => Intent::NewPlan,
        Some("modify_route") => Intent::ModifyRoute,
        Some("modify_restaurant") => Intent::ModifyRestaurant,
        Some("modify_budget") => Intent::ModifyBudget,
        Some("replan_after_budget_fail") => Intent::ReplanAfterBudgetFail,
        Some("confirm_plan") => Intent::ConfirmPlan,
        _ => Intent::NewPlan,
    }
}

/// Truncates previous plan text for inclusion in a supervisor prompt.
/// Returns the literal `"None"` when the trimmed text carries fewer than 10
/// characters of meaningful content, matching the original's heuristic for
/// "no real previous plan yet".
pub fn summarize_previous_plan(text: &str, truncate_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.len() < 10 {
        return "None".to_string();
    }
    truncate_chars_boundary(trimmed, truncate_chars).to_string()
}

fn truncate_chars_boundary(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
