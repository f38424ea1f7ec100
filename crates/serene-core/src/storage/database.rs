//! SQLite-backed limit storage.
//!
//! Each limit is stored as scalar columns plus one JSON document holding
//! its day ledgers. Amounts and quotas are stored as exact decimal
//! strings, so repeated encode/decode cycles never drift. Clean-date
//! resets live in their own append-only table.
//!
//! Saves are best effort from the domain's point of view: callers mutate
//! in-memory state first and do not roll it back when a save fails.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::cleantime::CleanTime;
use crate::error::StoreError;
use crate::limit::{Category, DayLedger, Limit, Period};

use super::data_dir;

/// SQLite repository for limits and the clean-date history.
///
/// The domain aggregates stay plain values; persistence happens only when
/// a caller invokes `save` or `delete` explicitly.
pub struct LimitStore {
    conn: Connection,
}

impl LimitStore {
    /// Open the store at `<data_dir>/serene.db`, creating the schema if
    /// needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StoreError> {
        let path = data_dir()?.join("serene.db");
        Self::open_at(&path)
    }

    /// Open the store at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: PathBuf::from(path),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (for tests).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::OpenFailed {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS limits (
                    id          TEXT PRIMARY KEY,
                    name        TEXT NOT NULL,
                    category    TEXT NOT NULL,
                    units_name  TEXT NOT NULL,
                    quota       TEXT NOT NULL,
                    period      TEXT NOT NULL,
                    icon        TEXT NOT NULL DEFAULT '',
                    created_at  TEXT NOT NULL,
                    ledgers     TEXT NOT NULL DEFAULT '[]'
                );

                CREATE TABLE IF NOT EXISTS clean_dates (
                    id    INTEGER PRIMARY KEY AUTOINCREMENT,
                    date  TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_limits_name ON limits(name);
                CREATE INDEX IF NOT EXISTS idx_limits_category ON limits(category);",
            )
            .map_err(|e| StoreError::MigrationFailed(e.to_string()))
    }

    /// Load every stored limit, sorted by name.
    ///
    /// Decoding is strict: an unrecognized category or period tag, or a
    /// corrupt ledger document, fails the load instead of falling back to
    /// a default.
    pub fn load_all(&self) -> Result<Vec<Limit>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, category, units_name, quota, period, icon, created_at, ledgers
             FROM limits ORDER BY name",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, String>(7)?,
                row.get::<_, String>(8)?,
            ))
        })?;

        let mut limits = Vec::new();
        for row in rows {
            limits.push(decode_row(row?)?);
        }
        Ok(limits)
    }

    /// Insert or update a limit.
    pub fn save(&self, limit: &Limit) -> Result<(), StoreError> {
        let ledgers = serde_json::to_string(limit.ledgers())
            .map_err(|e| StoreError::CorruptLedgers(e.to_string()))?;
        self.conn.execute(
            "INSERT INTO limits (id, name, category, units_name, quota, period, icon, created_at, ledgers)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                category = excluded.category,
                units_name = excluded.units_name,
                quota = excluded.quota,
                period = excluded.period,
                icon = excluded.icon,
                created_at = excluded.created_at,
                ledgers = excluded.ledgers",
            params![
                limit.id.to_string(),
                limit.name(),
                limit.category.as_str(),
                limit.units_name(),
                limit.quota().to_string(),
                limit.period.as_str(),
                limit.icon,
                limit.created_at.to_rfc3339(),
                ledgers,
            ],
        )?;
        debug!(name = limit.name(), "saved limit");
        Ok(())
    }

    /// Delete a limit. Cascades by construction: the ledgers live inside
    /// the row.
    pub fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM limits WHERE id = ?1", params![id.to_string()])?;
        debug!(%id, "deleted limit");
        Ok(())
    }

    /// Load the clean-date reset history, oldest first.
    pub fn load_clean_time(&self) -> Result<CleanTime, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT date FROM clean_dates ORDER BY id")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut resets = Vec::new();
        for row in rows {
            let raw = row?;
            let date = DateTime::parse_from_rfc3339(&raw)
                .map_err(|e| StoreError::InvalidField {
                    field: "clean date",
                    message: e.to_string(),
                })?
                .with_timezone(&Utc);
            resets.push(date);
        }
        Ok(CleanTime::from_resets(resets))
    }

    /// Append one clean-date reset.
    pub fn append_clean_date(&self, date: DateTime<Utc>) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO clean_dates (date) VALUES (?1)",
            params![date.to_rfc3339()],
        )?;
        Ok(())
    }
}

#[allow(clippy::type_complexity)]
fn decode_row(
    (id, name, category, units_name, quota, period, icon, created_at, ledgers): (
        String,
        String,
        String,
        String,
        String,
        String,
        String,
        String,
        String,
    ),
) -> Result<Limit, StoreError> {
    let id = Uuid::parse_str(&id).map_err(|e| StoreError::InvalidField {
        field: "id",
        message: e.to_string(),
    })?;
    let category = Category::from_tag(&category).ok_or(StoreError::UnknownTag {
        field: "category",
        value: category,
    })?;
    let period = Period::from_tag(&period).ok_or(StoreError::UnknownTag {
        field: "period",
        value: period,
    })?;
    let quota = Decimal::from_str(&quota).map_err(|e| StoreError::InvalidField {
        field: "quota",
        message: e.to_string(),
    })?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| StoreError::InvalidField {
            field: "created_at",
            message: e.to_string(),
        })?
        .with_timezone(&Utc);
    let ledgers: Vec<DayLedger> =
        serde_json::from_str(&ledgers).map_err(|e| StoreError::CorruptLedgers(e.to_string()))?;

    Limit::from_parts(
        id, name, category, units_name, quota, period, icon, created_at, ledgers,
    )
    .map_err(|e| StoreError::InvalidField {
        field: "limit",
        message: e.to_string(),
    })
}
