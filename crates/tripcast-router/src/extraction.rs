// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structural (regex/keyword) extraction of destination, day count, and
//! budget from free-form utterances, used before falling back to an LLM
//! call.

use regex::Regex;
use std::sync::OnceLock;

/// Best-effort structural extraction result, ahead of any LLM fallback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedTravelInfo {
    pub days: Option<i64>,
    pub budget: Option<f64>,
}

/// Narrower city table used only at plan-confirmation time, to populate the
/// persisted plan's `destination` column from the finalized route plan text.
const DESTINATION_CITIES: &[&str] = &[
    "Tokyo",
    "Paris",
    "London",
    "New York",
    "Beijing",
    "Shanghai",
    "Taipei",
    "Bangkok",
    "Singapore",
    "Sydney",
    "Dubai",
    "Rome",
    "Barcelona",
    "Amsterdam",
    "Berlin",
    "Vienna",
    "Prague",
    "Athens",
    "Istanbul",
    "Bali",
    "Phuket",
    "Seoul",
    "Hong Kong",
    "Macau",
    "Osaka",
    "Kyoto",
];

/// Day-count regex cascade, tried in order; the first match wins.
fn day_patterns() -> &'static [Regex; 6] {
    static PATTERNS: OnceLock<[Regex; 6]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"(\d+)\s*days?").unwrap(),
            Regex::new(r"(\d+)\s*day").unwrap(),
            Regex::new(r"(\d+)\s*-day").unwrap(),
            Regex::new(r"for\s*(\d+)\s*days?").unwrap(),
            Regex::new(r"(\d+)\s*night").unwrap(),
            Regex::new(r"(\d+)\s*nights?").unwrap(),
        ]
    })
}

fn budget_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[$¥€£]\s*([\d,]+(?:\.\d+)?)|([\d,]+(?:\.\d+)?)\s*(?:usd|dollars?|cny|yuan|rmb)").unwrap())
}

/// Extracts the first matching day count from the lowercased cascade above.
pub fn extract_days(text: &str) -> Option<i64> {
    let lower = text.to_lowercase();
    for pattern in day_patterns() {
        if let Some(caps) = pattern.captures(&lower) {
            if let Some(m) = caps.get(1) {
                if let Ok(n) = m.as_str().parse::<i64>() {
                    return Some(n);
                }
            }
        }
    }
    None
}

/// Extracts a numeric budget with an adjacent currency symbol or code.
/// Returns `None` when no such pattern is present; callers fall back to the
/// Budget Extractor LLM call in that case.
pub fn extract_budget(text: &str) -> Option<f64> {
    let lower = text.to_lowercase();
    let caps = budget_pattern().captures(&lower)?;
    let raw = caps.get(1).or_else(|| caps.get(2))?.as_str();
    raw.replace(',', "").parse::<f64>().ok()
}

/// Runs both structural extractors over a single utterance.
pub fn extract_travel_info(text: &str) -> ExtractedTravelInfo {
    ExtractedTravelInfo { days: extract_days(text), budget: extract_budget(text) }
}

/// Matches the finalized route plan text against the narrower city table,
/// used only when persisting a confirmed plan. First substring hit, in
/// table order, wins.
pub fn extract_destination_city(route_plan_text: &str) -> Option<String> {
    let lower = route_plan_text.to_lowercase();
    DESTINATION_CITIES
        .iter()
        .find(|city| lower.contains(&city.to_lowercase()))
        .map(|city| city.to_string())
}
