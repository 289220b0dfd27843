//! Display metadata for uploaded logo files.

use serde::{Deserialize, Serialize};

use crate::settings::OptionalExt;
use crate::{Database, DbError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogoAsset {
    pub storage_key: String,
    pub original_name: String,
    pub byte_size: i64,
    pub uploaded_at: String,
}

impl Database {
    /// Insert or refresh the metadata row for a stored logo.
    pub fn upsert_logo_asset(&self, asset: &LogoAsset) -> Result<(), DbError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO logo_assets (storage_key, original_name, byte_size, uploaded_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(storage_key) DO UPDATE SET
                    original_name = ?2, byte_size = ?3, uploaded_at = ?4",
                rusqlite::params![
                    asset.storage_key,
                    asset.original_name,
                    asset.byte_size,
                    asset.uploaded_at,
                ],
            )?;
            Ok(())
        })
    }

    pub fn get_logo_asset(&self, storage_key: &str) -> Result<Option<LogoAsset>, DbError> {
        self.with_conn(|conn| {
            let asset = conn
                .query_row(
                    "SELECT storage_key, original_name, byte_size, uploaded_at
                     FROM logo_assets WHERE storage_key = ?1",
                    [storage_key],
                    |row| {
                        Ok(LogoAsset {
                            storage_key: row.get(0)?,
                            original_name: row.get(1)?,
                            byte_size: row.get(2)?,
                            uploaded_at: row.get(3)?,
                        })
                    },
                )
                .optional()?;
            Ok(asset)
        })
    }
}
