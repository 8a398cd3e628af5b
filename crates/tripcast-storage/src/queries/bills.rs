// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bill CRUD operations.

use rusqlite::params;
use tripcast_core::{Bill, BillRecord, TripcastError};

use crate::database::Database;

fn row_to_bill(row: &rusqlite::Row) -> rusqlite::Result<Bill> {
    let participants_json: String = row.get(3)?;
    let participants: Vec<String> = serde_json::from_str(&participants_json).unwrap_or_default();
    Ok(Bill {
        id: row.get(0)?,
        topic: row.get(1)?,
        payer: row.get(2)?,
        participants,
        amount: row.get(4)?,
        currency: row.get(5)?,
        note: row.get(6)?,
        created_at: row.get(7)?,
        user_input: row.get(8)?,
    })
}

const SELECT_COLUMNS: &str =
    "id, topic, payer, participants, amount, currency, COALESCE(note, ''), created_at, COALESCE(user_input, '')";

/// Insert a batch of bill records in a single transaction tied to the same
/// `user_input`. The whole batch rolls back if any insert fails.
pub async fn insert_bills(
    db: &Database,
    bills: &[BillRecord],
    user_input: &str,
) -> Result<Vec<i64>, TripcastError> {
    let bills = bills.to_vec();
    let user_input = user_input.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let mut ids = Vec::with_capacity(bills.len());
            for bill in &bills {
                let participants_json = serde_json::to_string(&bill.participants)
                    .unwrap_or_else(|_| "[]".to_string());
                tx.execute(
                    "INSERT INTO bills (topic, payer, participants, amount, currency, note, created_at, user_input)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'), ?7)",
                    params![
                        bill.topic,
                        bill.payer,
                        participants_json,
                        bill.amount,
                        bill.currency,
                        bill.note,
                        user_input,
                    ],
                )?;
                ids.push(tx.last_insert_rowid());
            }
            tx.commit()?;
            Ok(ids)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a bill by id.
pub async fn get_bill(db: &Database, id: i64) -> Result<Option<Bill>, TripcastError> {
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {SELECT_COLUMNS} FROM bills WHERE id = ?1"))?;
            let result = stmt.query_row(params![id], row_to_bill);
            match result {
                Ok(bill) => Ok(Some(bill)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List bills, optionally filtered by payer, newest first.
pub async fn list_bills(
    db: &Database,
    payer: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Bill>, TripcastError> {
    let payer = payer.map(|p| p.to_string());
    db.connection()
        .call(move |conn| {
            let mut bills = Vec::new();
            match &payer {
                Some(payer_filter) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {SELECT_COLUMNS} FROM bills WHERE payer = ?1
                         ORDER BY created_at DESC LIMIT ?2 OFFSET ?3"
                    ))?;
                    let rows = stmt.query_map(params![payer_filter, limit, offset], row_to_bill)?;
                    for row in rows {
                        bills.push(row?);
                    }
                }
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {SELECT_COLUMNS} FROM bills
                         ORDER BY created_at DESC LIMIT ?1 OFFSET ?2"
                    ))?;
                    let rows = stmt.query_map(params![limit, offset], row_to_bill)?;
                    for row in rows {
                        bills.push(row?);
                    }
                }
            }
            Ok(bills)
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

    fn make_record(topic: &str, payer: &str, amount: f64) -> BillRecord {
        BillRecord {
            topic: topic.to_string(),
            payer: payer.to_string(),
            participants: vec!["alice".to_string(), "bob".to_string()],
            amount,
            currency: "CNY".to_string(),
            note: String::new(),
        }
    }

    #[tokio::test]
    async fn insert_and_get_bill_roundtrips() {
        let (db, _dir) = setup_db().await;
        let records = vec![make_record("dinner", "alice", 120.5)];
        let ids = insert_bills(&db, &records, "let's split dinner").await.unwrap();
        assert_eq!(ids.len(), 1);

        let bill = get_bill(&db, ids[0]).await.unwrap().unwrap();
        assert_eq!(bill.topic, "dinner");
        assert_eq!(bill.payer, "alice");
        assert_eq!(bill.participants, vec!["alice", "bob"]);
        assert_eq!(bill.amount, 120.5);
        assert_eq!(bill.currency, "CNY");
        assert_eq!(bill.user_input, "let's split dinner");
    }

    #[tokio::test]
    async fn get_nonexistent_bill_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_bill(&db, 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn insert_bills_batch_is_atomic() {
        let (db, _dir) = setup_db().await;
        let records = vec![
            make_record("lunch", "alice", 30.0),
            make_record("taxi", "bob", 15.0),
        ];
        let ids = insert_bills(&db, &records, "two items").await.unwrap();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }

    #[tokio::test]
    async fn list_bills_filters_by_payer() {
        let (db, _dir) = setup_db().await;
        insert_bills(&db, &[make_record("a", "alice", 10.0)], "x").await.unwrap();
        insert_bills(&db, &[make_record("b", "bob", 20.0)], "y").await.unwrap();

        let alice_bills = list_bills(&db, Some("alice"), 10, 0).await.unwrap();
        assert_eq!(alice_bills.len(), 1);
        assert_eq!(alice_bills[0].payer, "alice");

        let all = list_bills(&db, None, 10, 0).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn list_bills_respects_limit_and_offset() {
        let (db, _dir) = setup_db().await;
        for i in 0..5 {
            insert_bills(&db, &[make_record(&format!("item-{i}"), "alice", 1.0)], "x")
                .await
                .unwrap();
        }
        let page = list_bills(&db, None, 2, 1).await.unwrap();
        assert_eq!(page.len(), 2);
    }
}
