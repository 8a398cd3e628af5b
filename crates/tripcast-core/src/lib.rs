// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core trait definitions, error types, and domain types shared across the
//! tripcast workspace. The gateway and storage crates each implement a
//! trait defined here; the router and orchestrator crates depend only on
//! these traits, never on a concrete backend.

pub mod error;
pub mod traits;
pub mod types;

pub use error::TripcastError;
pub use types::{
    Bill, BillRecord, BudgetAuditResult, Frame, Intent, ModificationKind, NewTravelPlan,
    ParticipantId, RoomEvent, RoomEventBody, RoomId, RouteAgent, TemplateBindings, TemplateId,
    TravelPlan, VoteKind, VoteReading, VoteState,
};

pub use traits::{GatewayStream, LlmGateway, Persistence, ServiceAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tripcast_error_variants_construct() {
        let _config = TripcastError::Config("test".into());
        let _unconfigured = TripcastError::GatewayUnconfigured("no backend".into());
        let _stream = TripcastError::GatewayStream {
            message: "dropped".into(),
            source: None,
        };
        let _storage = TripcastError::storage(std::io::Error::other("disk full"));
        let _not_found = TripcastError::NotFound("room-1".into());
        let _timeout = TripcastError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _internal = TripcastError::Internal("unexpected".into());
    }

    #[test]
    fn template_id_round_trips_as_str() {
        let ids = [
            TemplateId::Router,
            TemplateId::Bill,
            TemplateId::TravelSupervisor,
            TemplateId::RoutePlanner,
            TemplateId::RestaurantPlanner,
            TemplateId::BudgetChecker,
            TemplateId::BudgetExtractor,
            TemplateId::Mediator,
            TemplateId::PlanConfirmation,
        ];
        assert_eq!(ids.len(), 9);
        for id in ids {
            assert!(!id.as_str().is_empty());
        }
    }

    #[test]
    fn intent_defaults_to_new_plan() {
        assert_eq!(Intent::default(), Intent::NewPlan);
    }

    #[test]
    fn budget_audit_passed_requires_both_flags() {
        let ok = BudgetAuditResult {
            budget_ok: true,
            is_feasible: true,
            reason: String::new(),
            suggestion: String::new(),
        };
        assert!(ok.passed());

        let infeasible = BudgetAuditResult {
            budget_ok: true,
            is_feasible: false,
            reason: String::new(),
            suggestion: String::new(),
        };
        assert!(!infeasible.passed());

        let unparseable = BudgetAuditResult::unparseable_default();
        assert!(unparseable.passed(), "unparseable output must default to OK");
    }

    #[test]
    fn participant_and_room_id_equality() {
        let a = ParticipantId("user-1".into());
        let b = a.clone();
        assert_eq!(a, b);

        let room = RoomId("shared-trip".into());
        assert_eq!(room.to_string(), "shared-trip");
    }

    #[test]
    fn frame_serializes_with_tagged_type() {
        let frame = Frame::Chunk {
            content: "hello".into(),
        };
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["type"], "chunk");
        assert_eq!(json["content"], "hello");
    }

    #[test]
    fn traits_are_object_safe() {
        fn _assert_service_adapter<T: ServiceAdapter>() {}
        fn _assert_llm_gateway<T: LlmGateway>() {}
        fn _assert_persistence<T: Persistence>() {}
    }
}
