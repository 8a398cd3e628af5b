// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bill recording: the router's secondary dispatch path, parsed from the
//! bill template's salvaged JSON output.

use serde_json::Value;
use tripcast_core::BillRecord;

use crate::salvage::salvage_json;

/// Which column a bill lookup filters on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillQueryKind {
    Id,
    Payer,
    Participant,
}

/// A lookup request against the `bills` table.
#[derive(Debug, Clone, PartialEq)]
pub struct BillLookup {
    pub kind: BillQueryKind,
    pub value: String,
}

/// What the bill template's output resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum BillAction {
    Lookup(BillLookup),
    Record(Vec<BillRecord>),
}

const REQUIRED_FIELDS: &[&str] = &["topic", "payer", "participants", "amount"];

/// Parses the bill template's raw text output into a [`BillAction`].
///
/// An object with a truthy `query` field is a lookup. An array, or a single
/// object carrying all four required fields, is a recording request; each
/// candidate missing a required field is skipped rather than aborting the
/// whole batch. Returns `None` when salvage fails or neither shape matches.
pub fn parse_bill_response(text: &str) -> Option<BillAction> {
    let value = salvage_json(text)?;

    if let Value::Object(ref map) = value {
        if map.get("query").map(|q| is_truthy(q)).unwrap_or(false) {
            let kind = match map.get("type").and_then(|v| v.as_str()) {
                Some("payer") => BillQueryKind::Payer,
                Some("participant") => BillQueryKind::Participant,
                _ => BillQueryKind::Id,
            };
            let value = map.get("value").and_then(|v| v.as_str()).unwrap_or("").to_string();
            return Some(BillAction::Lookup(BillLookup { kind, value }));
        }
    }

    let candidates: Vec<Value> = match value {
        Value::Array(items) => items,
        Value::Object(_) if has_all_required_fields(&value) => vec![value],
        _ => return None,
    };

    let records: Vec<BillRecord> = candidates
        .into_iter()
        .filter_map(|candidate| parse_bill_record(&candidate))
        .collect();

    Some(BillAction::Record(records))
}

fn has_all_required_fields(value: &Value) -> bool {
    REQUIRED_FIELDS.iter().all(|field| value.get(field).is_some())
}

fn parse_bill_record(value: &Value) -> Option<BillRecord> {
    if !has_all_required_fields(value) {
        tracing::debug!("skipping candidate bill missing a required field");
        return None;
    }
    serde_json::from_value::<BillRecord>(value.clone()).ok()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Null => false,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_lookup_by_payer() {
        let text = json!({"query": true, "type": "payer", "value": "alice"}).to_string();
        let action = parse_bill_response(&text).unwrap();
        assert_eq!(
            action,
            BillAction::Lookup(BillLookup {
                kind: BillQueryKind::Payer,
                value: "alice".into(),
            })
        );
    }

    #[test]
    fn parses_single_bill_object_as_record() {
        let text = json!({
            "topic": "dinner",
            "payer": "bob",
            "participants": ["bob", "alice"],
            "amount": 80.0
        })
        .to_string();
        let action = parse_bill_response(&text).unwrap();
        match action {
            BillAction::Record(bills) => assert_eq!(bills.len(), 1),
            _ => panic!("expected a record action"),
        }
    }

    #[test]
    fn parses_array_skipping_invalid_entries() {
        let text = json!([
            {"topic": "dinner", "payer": "bob", "participants": ["bob"], "amount": 40.0},
            {"topic": "missing amount", "payer": "bob", "participants": ["bob"]},
        ])
        .to_string();
        let action = parse_bill_response(&text).unwrap();
        match action {
            BillAction::Record(bills) => assert_eq!(bills.len(), 1),
            _ => panic!("expected a record action"),
        }
    }

    #[test]
    fn empty_batch_when_all_invalid() {
        let text = json!([{"topic": "incomplete"}]).to_string();
        let action = parse_bill_response(&text).unwrap();
        match action {
            BillAction::Record(bills) => assert!(bills.is_empty()),
            _ => panic!("expected a record action"),
        }
    }

    #[test]
    fn returns_none_when_salvage_fails() {
        assert_eq!(parse_bill_response("nonsense"), None);
    }
}
