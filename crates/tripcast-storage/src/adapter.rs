// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the `Persistence` trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use tripcast_core::{Bill, BillRecord, NewTravelPlan, Persistence, ServiceAdapter, TravelPlan, TripcastError};

use crate::database::Database;
use crate::queries;

/// SQLite-backed persistence adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily opened on the first call to
/// [`Persistence::initialize`].
pub struct SqliteStorage {
    database_path: String,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new adapter for the database at `database_path`.
    ///
    /// The connection is not opened until [`initialize`](Persistence::initialize) is called.
    pub fn new(database_path: impl Into<String>) -> Self {
        Self {
            database_path: database_path.into(),
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, TripcastError> {
        self.db
            .get()
            .ok_or_else(|| TripcastError::Internal("storage not initialized -- call initialize() first".into()))
    }
}

#[async_trait]
impl ServiceAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn health_check(&self) -> Result<(), TripcastError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)
    }

    async fn shutdown(&self) -> Result<(), TripcastError> {
        if let Some(db) = self.db.get() {
            db.close().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl Persistence for SqliteStorage {
    async fn initialize(&self) -> Result<(), TripcastError> {
        let db = Database::open(&self.database_path).await?;
        self.db
            .set(db)
            .map_err(|_| TripcastError::Internal("storage already initialized".into()))?;
        debug!(path = %self.database_path, "sqlite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), TripcastError> {
        self.db()?.close().await
    }

    async fn insert_bills(
        &self,
        bills: &[BillRecord],
        user_input: &str,
    ) -> Result<Vec<i64>, TripcastError> {
        queries::bills::insert_bills(self.db()?, bills, user_input).await
    }

    async fn get_bill(&self, id: i64) -> Result<Option<Bill>, TripcastError> {
        queries::bills::get_bill(self.db()?, id).await
    }

    async fn list_bills(
        &self,
        payer: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Bill>, TripcastError> {
        queries::bills::list_bills(self.db()?, payer, limit, offset).await
    }

    async fn insert_travel_plan(&self, plan: NewTravelPlan) -> Result<i64, TripcastError> {
        queries::travel_plans::insert_travel_plan(self.db()?, plan).await
    }

    async fn get_travel_plan(&self, id: i64) -> Result<Option<TravelPlan>, TripcastError> {
        queries::travel_plans::get_travel_plan(self.db()?, id).await
    }

    async fn list_travel_plans(&self, session_id: &str) -> Result<Vec<TravelPlan>, TripcastError> {
        queries::travel_plans::list_travel_plans(self.db()?, session_id).await
    }
}
