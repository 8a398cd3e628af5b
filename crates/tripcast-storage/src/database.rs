// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. `Database` IS the single writer: every query module accepts
//! `&Database` and runs its statement through `connection().call()`. Do not
//! open a second `Connection` against the same file for writes.

use tripcast_core::TripcastError;

/// A single-writer handle to the SQLite database.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path`, enable WAL mode, and run
    /// pending migrations.
    ///
    /// Migrations run against a plain blocking `rusqlite::Connection` before
    /// the long-lived `tokio_rusqlite::Connection` is established, since
    /// refinery's runner takes `&mut rusqlite::Connection` directly and
    /// `tokio_rusqlite::Connection::call` closures must return
    /// `rusqlite::Error`, not our own error type.
    pub async fn open(path: &str) -> Result<Self, TripcastError> {
        let path_owned = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), TripcastError> {
            let mut conn =
                rusqlite::Connection::open(&path_owned).map_err(TripcastError::storage)?;
            conn.execute_batch(
                "PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON; PRAGMA synchronous=NORMAL;",
            )
            .map_err(TripcastError::storage)?;
            crate::migrations::run_migrations(&mut conn)
        })
        .await
        .map_err(|e| TripcastError::Internal(format!("migration task panicked: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(TripcastError::storage)?;

        Ok(Self { conn })
    }

    /// The underlying connection. All query modules call through this.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL before process shutdown.
    pub async fn close(&self) -> Result<(), TripcastError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

/// Maps `tokio_rusqlite`'s connection/task error into a single
/// `TripcastError::Storage`, used by every query module.
pub(crate) fn map_tr_err(err: tokio_rusqlite::Error) -> TripcastError {
    TripcastError::storage(err)
}
