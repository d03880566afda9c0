//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! The provider calls store methods; it never executes SQL directly.

use crate::{
    error::StaffingResult,
    reference::{ReferenceRow, ReferenceTable, TABLE_FORMAT_VERSION},
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

pub struct ModelStore {
    conn: Connection,
}

/// Summary of a persisted table, readable without decoding its rows.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredModelInfo {
    pub model_id:       String,
    pub generation_id:  String,
    pub format_version: u32,
    pub seed:           u64,
    pub created_at:     DateTime<Utc>,
    pub row_count:      usize,
}

impl ModelStore {
    /// Open (or create) the model database at `path`.
    pub fn open(path: &str) -> StaffingResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (:memory: ignores it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> StaffingResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> StaffingResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_reference_model.sql"))?;
        Ok(())
    }

    // ── Reference tables ───────────────────────────────────────

    /// Persist `table` under its model id, replacing any earlier generation.
    pub fn save_table(&self, table: &ReferenceTable) -> StaffingResult<()> {
        let rows_json = serde_json::to_string(&table.rows)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO reference_model
                (model_id, generation_id, format_version, seed, created_at, row_count, rows_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                table.model_id,
                table.generation_id,
                TABLE_FORMAT_VERSION as i64,
                table.seed as i64,
                table.created_at.to_rfc3339(),
                table.rows.len() as i64,
                rows_json,
            ],
        )?;
        log::debug!(
            "Saved reference table '{}' (generation {})",
            table.model_id,
            table.generation_id
        );
        Ok(())
    }

    /// Metadata of the persisted table, if any.
    pub fn table_info(&self, model_id: &str) -> StaffingResult<Option<StoredModelInfo>> {
        let raw = self
            .conn
            .query_row(
                "SELECT model_id, generation_id, format_version, seed, created_at, row_count
                 FROM reference_model WHERE model_id = ?1",
                params![model_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, i64>(5)?,
                    ))
                },
            )
            .optional()?;

        let Some((model_id, generation_id, format_version, seed, created_at, row_count)) = raw else {
            return Ok(None);
        };
        Ok(Some(StoredModelInfo {
            model_id,
            generation_id,
            format_version: format_version as u32,
            seed:           seed as u64,
            created_at:     parse_timestamp(&created_at)?,
            row_count:      row_count as usize,
        }))
    }

    /// Load the persisted table. Tables written with another format version
    /// are reported as absent.
    pub fn load_table(&self, model_id: &str) -> StaffingResult<Option<ReferenceTable>> {
        let Some(info) = self.table_info(model_id)? else {
            return Ok(None);
        };
        if info.format_version != TABLE_FORMAT_VERSION {
            log::warn!(
                "Ignoring reference table '{model_id}': format version {} (expected {})",
                info.format_version,
                TABLE_FORMAT_VERSION
            );
            return Ok(None);
        }

        let rows_json: String = self.conn.query_row(
            "SELECT rows_json FROM reference_model WHERE model_id = ?1",
            params![model_id],
            |row| row.get(0),
        )?;
        let rows: Vec<ReferenceRow> = serde_json::from_str(&rows_json)?;

        Ok(Some(ReferenceTable {
            model_id:      info.model_id,
            generation_id: info.generation_id,
            seed:          info.seed,
            created_at:    info.created_at,
            rows,
        }))
    }

    /// Remove the persisted table. Returns whether one existed.
    pub fn delete_table(&self, model_id: &str) -> StaffingResult<bool> {
        let removed = self.conn.execute(
            "DELETE FROM reference_model WHERE model_id = ?1",
            params![model_id],
        )?;
        Ok(removed > 0)
    }

    // ── Test / summary helpers ────────────────────────────────────────

    /// Number of persisted tables (for tests).
    pub fn table_count(&self) -> StaffingResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM reference_model",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Overwrite the stored format version (for schema-evolution tests).
    pub fn set_format_version(&self, model_id: &str, version: u32) -> StaffingResult<()> {
        self.conn.execute(
            "UPDATE reference_model SET format_version = ?2 WHERE model_id = ?1",
            params![model_id, version as i64],
        )?;
        Ok(())
    }
}

fn parse_timestamp(raw: &str) -> StaffingResult<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| anyhow::anyhow!("Invalid created_at '{raw}': {e}"))?;
    Ok(parsed.with_timezone(&Utc))
}
