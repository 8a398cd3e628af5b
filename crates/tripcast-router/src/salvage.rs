// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recovers a JSON value embedded in free-form LLM output.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn object_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*?\}").unwrap())
}

fn array_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\[.*?\]").unwrap())
}

/// Recovers a JSON value from `text`, trying in order: the first `{...}`
/// span, the first `[...]` span, then the whole text. Returns `None` if none
/// of the three parse.
pub fn salvage_json(text: &str) -> Option<Value> {
    if let Some(m) = object_pattern().find(text) {
        if let Ok(v) = serde_json::from_str(m.as_str()) {
            return Some(v);
        }
    }
    if let Some(m) = array_pattern().find(text) {
        if let Ok(v) = serde_json::from_str(m.as_str()) {
            return Some(v);
        }
    }
    serde_json::from_str(text.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn salvages_object_with_surrounding_commentary() {
        let text = "Here you go:\n```json\n{\"agent\": \"travel\"}\n```\nthanks";
        assert_eq!(salvage_json(text), Some(json!({"agent": "travel"})));
    }

    #[test]
    fn salvages_array_when_no_object_parses() {
        let text = "results: [{\"a\": 1}, {\"a\": 2}] done";
        assert_eq!(salvage_json(text), Some(json!([{"a": 1}, {"a": 2}])));
    }

    #[test]
    fn falls_back_to_whole_text() {
        let text = "  \"just a string\"  ";
        assert_eq!(salvage_json(text), Some(json!("just a string")));
    }

    #[test]
    fn returns_none_on_total_garbage() {
        assert_eq!(salvage_json("not json at all, no braces"), None);
    }

    #[test]
    fn prefers_object_over_array_when_both_present() {
        let text = "noise [1,2,3] then {\"agent\":\"bill\"} more noise";
        assert_eq!(salvage_json(text), Some(json!({"agent": "bill"})));
    }
}
