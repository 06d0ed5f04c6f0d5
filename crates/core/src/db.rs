// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed durable queue.
//!
//! The [`Database`] struct persists queued requests in a single
//! `pending_requests` table keyed by an auto-incrementing id.

use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::request::{QueuedRequest, RequestId, RequestPatch, RequestStatus};
use crate::store::{next_retry, FailureOutcome, QueueBackend};
use crate::validate::ValidRequest;

/// SQL schema for the pending request queue.
pub const SCHEMA: &str = r#"
-- AUTOINCREMENT keeps ids from being reused after deletes or a clear
CREATE TABLE IF NOT EXISTS pending_requests (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    method TEXT NOT NULL DEFAULT 'GET',
    headers TEXT NOT NULL DEFAULT '{}',
    body TEXT,
    timestamp INTEGER NOT NULL,
    retries INTEGER NOT NULL DEFAULT 0,
    max_retries INTEGER NOT NULL DEFAULT 5,
    status TEXT NOT NULL DEFAULT 'pending',
    CHECK (retries <= max_retries)
);

CREATE INDEX IF NOT EXISTS idx_pending_timestamp ON pending_requests(timestamp);
CREATE INDEX IF NOT EXISTS idx_pending_retries ON pending_requests(retries);
"#;

const SELECT_COLUMNS: &str =
    "id, url, method, headers, body, timestamp, retries, max_retries, status";

/// Parse a string value from the database, returning a rusqlite error on parse failure.
fn parse_db<T: std::str::FromStr>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    value.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData(format!(
                "invalid value '{value}' in column '{column}'"
            ))),
        )
    })
}

/// Parse a JSON text column from the database.
fn parse_json<T: serde::de::DeserializeOwned>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    serde_json::from_str(value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData(format!(
                "invalid JSON in column '{column}': {e}"
            ))),
        )
    })
}

fn map_row(row: &Row<'_>) -> std::result::Result<QueuedRequest, rusqlite::Error> {
    let method: String = row.get(2)?;
    let headers: String = row.get(3)?;
    let body: Option<String> = row.get(4)?;
    let status: String = row.get(8)?;

    Ok(QueuedRequest {
        id: RequestId::new(row.get(0)?),
        url: row.get(1)?,
        method: parse_db(&method, "method")?,
        headers: parse_json::<BTreeMap<String, String>>(&headers, "headers")?,
        body: body.map(|b| parse_json(&b, "body")).transpose()?,
        timestamp: row.get(5)?,
        retries: row.get(6)?,
        max_retries: row.get(7)?,
        status: parse_db(&status, "status")?,
    })
}

/// Create the schema if it does not exist yet.
pub fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// SQLite database connection holding the durable queue.
pub struct Database {
    /// The underlying SQLite connection.
    pub conn: Connection,
}

impl Database {
    /// Open a database connection at the given path, creating the schema if needed.
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // WAL lets a reader list the queue while another process enqueues
        conn.execute_batch(
            "PRAGMA busy_timeout = 5000;
             PRAGMA journal_mode = WAL;",
        )?;

        let db = Database { conn };
        create_schema(&db.conn)?;
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        create_schema(&db.conn)?;
        Ok(db)
    }

    fn find(conn: &Connection, id: RequestId) -> Result<Option<QueuedRequest>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM pending_requests WHERE id = ?1");
        Ok(conn.query_row(&sql, params![id.get()], map_row).optional()?)
    }
}

impl QueueBackend for Database {
    /// Insert a validated request.
    ///
    /// The capacity check and the insert share one IMMEDIATE transaction,
    /// which takes the write lock up front so concurrent writers on the same
    /// file cannot both observe `capacity - 1` and overshoot.
    fn insert(
        &mut self,
        request: &ValidRequest,
        timestamp_ms: i64,
        max_retries: u32,
        capacity: usize,
    ) -> Result<RequestId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let count: i64 =
            tx.query_row("SELECT COUNT(*) FROM pending_requests", [], |row| row.get(0))?;
        if usize::try_from(count).unwrap_or(usize::MAX) >= capacity {
            return Err(Error::QueueFull { capacity });
        }

        let headers = serde_json::to_string(request.headers())?;
        let body = request.body().map(serde_json::to_string).transpose()?;
        tx.execute(
            "INSERT INTO pending_requests (url, method, headers, body, timestamp,
             retries, max_retries, status)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?7)",
            params![
                request.url(),
                request.method().as_str(),
                headers,
                body,
                timestamp_ms,
                max_retries,
                RequestStatus::Pending.as_str(),
            ],
        )?;
        let id = RequestId::new(tx.last_insert_rowid());
        tx.commit()?;
        Ok(id)
    }

    fn list_pending(&self) -> Result<Vec<QueuedRequest>> {
        let sql =
            format!("SELECT {SELECT_COLUMNS} FROM pending_requests ORDER BY timestamp ASC, id ASC");
        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map([], map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn get(&self, id: RequestId) -> Result<QueuedRequest> {
        Self::find(&self.conn, id)?.ok_or(Error::NotFound(id))
    }

    fn remove(&mut self, id: RequestId) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM pending_requests WHERE id = ?1", params![id.get()])?;
        Ok(affected > 0)
    }

    fn update(&mut self, id: RequestId, patch: &RequestPatch) -> Result<QueuedRequest> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut record = Self::find(&tx, id)?.ok_or(Error::NotFound(id))?;
        patch.apply(&mut record)?;

        tx.execute(
            "UPDATE pending_requests SET retries = ?1, status = ?2 WHERE id = ?3",
            params![record.retries, record.status.as_str(), id.get()],
        )?;
        tx.commit()?;
        Ok(record)
    }

    fn clear(&mut self) -> Result<()> {
        self.conn.execute("DELETE FROM pending_requests", [])?;
        Ok(())
    }

    fn count(&self) -> Result<usize> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM pending_requests", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn record_failure(&mut self, id: RequestId) -> Result<FailureOutcome> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(mut record) = Self::find(&tx, id)? else {
            return Ok(FailureOutcome::AlreadyHandled);
        };
        let outcome = match next_retry(&record) {
            Some(retries) => {
                tx.execute(
                    "UPDATE pending_requests SET retries = ?1, status = ?2 WHERE id = ?3",
                    params![retries, RequestStatus::Failed.as_str(), id.get()],
                )?;
                FailureOutcome::Retry { retries }
            }
            None => {
                tx.execute("DELETE FROM pending_requests WHERE id = ?1", params![id.get()])?;
                record.status = RequestStatus::Dead;
                FailureOutcome::Dead(record)
            }
        };
        tx.commit()?;
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
