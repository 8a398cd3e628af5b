// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Utterance routing for tripcast: JSON salvage from LLM output, top-level
//! bill/travel routing, travel-intent classification, structural
//! destination/day/budget extraction, and budget audit parsing.
//!
//! Every function here is a pure parser or a thin LLM-call-plus-parse; none
//! hold orchestration state. That lives in `tripcast-orchestrator`.

pub mod bill;
pub mod budget_audit;
pub mod budget_extractor;
pub mod extraction;
pub mod route;
pub mod salvage;
pub mod supervisor;

pub use bill::{parse_bill_response, BillAction, BillLookup, BillQueryKind};
pub use budget_audit::{audit_budget, chunk_reason};
pub use budget_extractor::extract_budget_via_llm;
pub use extraction::{extract_destination_city, extract_travel_info, ExtractedTravelInfo};
pub use route::classify_route;
pub use salvage::salvage_json;
pub use supervisor::{classify_intent, summarize_previous_plan};
