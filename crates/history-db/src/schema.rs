//! Database schema definitions and migrations.

use rusqlite::Connection;

use crate::DbError;

pub fn run_migrations(conn: &Connection) -> Result<(), DbError> {
    migrate_legacy_history(conn)?;
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Older history tables used camel-case column names.
/// history: (userId, date) → (owner_id, created_at)
fn migrate_legacy_history(conn: &Connection) -> Result<(), DbError> {
    if !table_exists(conn, "history")? {
        return Ok(());
    }
    if column_exists(conn, "history", "userId")? {
        tracing::info!("Migrating history.userId to owner_id");
        conn.execute_batch("ALTER TABLE history RENAME COLUMN userId TO owner_id;")?;
    }
    if column_exists(conn, "history", "date")? {
        tracing::info!("Migrating history.date to created_at");
        conn.execute_batch("ALTER TABLE history RENAME COLUMN date TO created_at;")?;
    }
    // Legacy rows may carry a NULL owner or params; normalize so reads never fail.
    conn.execute_batch(
        "UPDATE history SET owner_id = '' WHERE owner_id IS NULL;
         UPDATE history SET params = '{}' WHERE params IS NULL;
         UPDATE history SET active = 1 WHERE active IS NULL;",
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool, DbError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool, DbError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let exists = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .any(|name| name.as_deref() == Ok(column));
    Ok(exists)
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id TEXT NOT NULL,
    text TEXT NOT NULL,
    created_at TEXT NOT NULL,
    params TEXT NOT NULL DEFAULT '{}',
    active INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_history_owner_active ON history(owner_id, active, id);

CREATE TABLE IF NOT EXISTS logo_assets (
    storage_key TEXT PRIMARY KEY,
    original_name TEXT NOT NULL,
    byte_size INTEGER NOT NULL DEFAULT 0,
    uploaded_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);
"#;
