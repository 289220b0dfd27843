//! Per-owner generation history with soft deletion.

use serde::{Deserialize, Serialize};

use crate::{Database, DbError};

/// One recorded generation. `params` holds the JSON-encoded render options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: i64,
    pub owner_id: String,
    pub text: String,
    #[serde(rename = "date")]
    pub created_at: String,
    pub params: String,
    pub active: bool,
}

impl Database {
    /// Append an active entry and return its id.
    pub fn record_history(
        &self,
        owner_id: &str,
        text: &str,
        created_at: &str,
        params_json: &str,
    ) -> Result<i64, DbError> {
        if owner_id.is_empty() {
            return Err(DbError::InvalidData("owner id must not be empty".into()));
        }
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO history (owner_id, text, created_at, params, active)
                 VALUES (?1, ?2, ?3, ?4, 1)",
                rusqlite::params![owner_id, text, created_at, params_json],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Most recent active entries for one owner, newest first.
    pub fn list_active_history(&self, owner_id: &str, limit: i64) -> Result<Vec<HistoryEntry>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, owner_id, text, created_at, COALESCE(params, '{}'), active
                 FROM history
                 WHERE owner_id = ?1 AND active = 1
                 ORDER BY id DESC
                 LIMIT ?2",
            )?;
            let rows = stmt.query_map(rusqlite::params![owner_id, limit], |row| {
                Ok(HistoryEntry {
                    id: row.get(0)?,
                    owner_id: row.get(1)?,
                    text: row.get(2)?,
                    created_at: row.get(3)?,
                    params: row.get(4)?,
                    active: row.get::<_, i64>(5)? != 0,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
    }

    /// Flag every active entry of one owner inactive. Returns the number of rows changed.
    pub fn deactivate_history(&self, owner_id: &str) -> Result<usize, DbError> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE history SET active = 0 WHERE owner_id = ?1 AND active = 1",
                [owner_id],
            )?;
            Ok(changed)
        })
    }

    /// Total rows for an owner, active or not.
    pub fn count_history(&self, owner_id: &str) -> Result<i64, DbError> {
        self.with_conn(|conn| {
            let count = conn.query_row(
                "SELECT COUNT(*) FROM history WHERE owner_id = ?1",
                [owner_id],
                |row| row.get(0),
            )?;
            Ok(count)
        })
    }
}
