// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Travel plan CRUD operations.

use rusqlite::params;
use tripcast_core::{NewTravelPlan, TravelPlan, TripcastError};

use crate::database::Database;

fn row_to_plan(row: &rusqlite::Row) -> rusqlite::Result<TravelPlan> {
    let participants_json: String = row.get(8)?;
    let participants: Vec<String> = serde_json::from_str(&participants_json).unwrap_or_default();
    Ok(TravelPlan {
        id: row.get(0)?,
        session_id: row.get(1)?,
        route_plan: row.get(2)?,
        restaurant_plan: row.get(3)?,
        budget: row.get(4)?,
        currency: row.get(5)?,
        destination: row.get(6)?,
        days: row.get(7)?,
        participants,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

const SELECT_COLUMNS: &str = "id, session_id, route_plan, restaurant_plan, budget, currency, \
    destination, days, participants, created_at, updated_at";

/// Insert a finalized travel plan, returning its assigned id.
pub async fn insert_travel_plan(
    db: &Database,
    plan: NewTravelPlan,
) -> Result<i64, TripcastError> {
    db.connection()
        .call(move |conn| {
            let participants_json =
                serde_json::to_string(&plan.participants).unwrap_or_else(|_| "[]".to_string());
            conn.execute(
                "INSERT INTO travel_plans
                     (session_id, route_plan, restaurant_plan, budget, currency, destination,
                      days, participants, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8,
                         strftime('%Y-%m-%dT%H:%M:%fZ', 'now'),
                         strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))",
                params![
                    plan.session_id,
                    plan.route_plan,
                    plan.restaurant_plan,
                    plan.budget,
                    plan.currency,
                    plan.destination,
                    plan.days,
                    participants_json,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch a single travel plan by id.
pub async fn get_travel_plan(db: &Database, id: i64) -> Result<Option<TravelPlan>, TripcastError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM travel_plans WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], row_to_plan);
            match result {
                Ok(plan) => Ok(Some(plan)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List travel plans for a room session, newest first.
pub async fn list_travel_plans(
    db: &Database,
    session_id: &str,
) -> Result<Vec<TravelPlan>, TripcastError> {
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM travel_plans
                 WHERE session_id = ?1 ORDER BY created_at DESC"
            ))?;
            let rows = stmt.query_map(params![session_id], row_to_plan)?;
            let mut plans = Vec::new();
            for row in rows {
                plans.push(row?);
            }
            Ok(plans)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_plan(session_id: &str) -> NewTravelPlan {
        NewTravelPlan {
            session_id: session_id.to_string(),
            route_plan: "Day 1: Tokyo\nDay 2: Kyoto".to_string(),
            restaurant_plan: "Sushi on day 1".to_string(),
            budget: Some(2000.0),
            currency: "USD".to_string(),
            destination: Some("Tokyo".to_string()),
            days: Some(2),
            participants: vec!["alice".to_string(), "bob".to_string()],
        }
    }

    #[tokio::test]
    async fn insert_and_get_travel_plan_roundtrips() {
        let (db, _dir) = setup_db().await;
        let id = insert_travel_plan(&db, make_plan("room-1")).await.unwrap();

        let plan = get_travel_plan(&db, id).await.unwrap().unwrap();
        assert_eq!(plan.session_id, "room-1");
        assert_eq!(plan.destination.as_deref(), Some("Tokyo"));
        assert_eq!(plan.days, Some(2));
        assert_eq!(plan.budget, Some(2000.0));
        assert_eq!(plan.participants, vec!["alice", "bob"]);
    }

    #[tokio::test]
    async fn get_nonexistent_travel_plan_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_travel_plan(&db, 42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn insert_travel_plan_tolerates_missing_budget_and_destination() {
        let (db, _dir) = setup_db().await;
        let mut plan = make_plan("room-2");
        plan.budget = None;
        plan.destination = None;
        plan.days = None;

        let id = insert_travel_plan(&db, plan).await.unwrap();
        let stored = get_travel_plan(&db, id).await.unwrap().unwrap();
        assert!(stored.budget.is_none());
        assert!(stored.destination.is_none());
        assert!(stored.days.is_none());
    }

    #[tokio::test]
    async fn list_travel_plans_filters_by_session_newest_first() {
        let (db, _dir) = setup_db().await;
        insert_travel_plan(&db, make_plan("room-a")).await.unwrap();
        insert_travel_plan(&db, make_plan("room-a")).await.unwrap();
        insert_travel_plan(&db, make_plan("room-b")).await.unwrap();

        let room_a = list_travel_plans(&db, "room-a").await.unwrap();
        assert_eq!(room_a.len(), 2);

        let room_b = list_travel_plans(&db, "room-b").await.unwrap();
        assert_eq!(room_b.len(), 1);
    }
}
