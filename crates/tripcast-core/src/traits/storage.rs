// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence trait for bills and travel plans.

use async_trait::async_trait;

use crate::error::TripcastError;
use crate::traits::adapter::ServiceAdapter;
use crate::types::{Bill, BillRecord, NewTravelPlan, TravelPlan};

/// Adapter for the durable store backing bills and travel plans.
///
/// Implementations own their own connection lifecycle; [`ServiceAdapter::shutdown`]
/// is expected to flush and checkpoint before returning.
#[async_trait]
pub trait Persistence: ServiceAdapter {
    /// Runs any pending schema migrations. Called once at startup.
    async fn initialize(&self) -> Result<(), TripcastError>;

    /// Closes the backend, flushing pending writes and releasing connections.
    async fn close(&self) -> Result<(), TripcastError>;

    /// Inserts a batch of bills recorded from a single utterance, returning
    /// their assigned ids in the same order. `user_input` is the raw
    /// utterance that produced them, kept for audit purposes.
    async fn insert_bills(
        &self,
        bills: &[BillRecord],
        user_input: &str,
    ) -> Result<Vec<i64>, TripcastError>;

    /// Fetches a single bill by id.
    async fn get_bill(&self, id: i64) -> Result<Option<Bill>, TripcastError>;

    /// Lists bills newest-first, optionally filtered by a `payer` substring,
    /// with `limit`/`offset` pagination.
    async fn list_bills(
        &self,
        payer: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Bill>, TripcastError>;

    /// Inserts a finalized travel plan, returning its assigned id.
    async fn insert_travel_plan(&self, plan: NewTravelPlan) -> Result<i64, TripcastError>;

    /// Fetches a single travel plan by id.
    async fn get_travel_plan(&self, id: i64) -> Result<Option<TravelPlan>, TripcastError>;

    /// Lists travel plans for a given room session, newest-first.
    async fn list_travel_plans(&self, session_id: &str) -> Result<Vec<TravelPlan>, TripcastError>;
}
