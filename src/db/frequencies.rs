//! Frequency store
//!
//! CRUD operations over the frequencies table. A frequency and its embedded
//! phrases load and save as a single row; `save` is a whole-row update keyed
//! by id with last-write-wins semantics — there is no per-record version
//! stamp, so concurrent writers resolve to whichever save lands last.

use crate::db::models::{Frequency, NewFrequency, Phrase};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

/// Load every frequency, newest first (descending id)
pub async fn list_all(db: &SqlitePool) -> Result<Vec<Frequency>> {
    let rows = sqlx::query(
        "SELECT id, interval_minutes, duration_minutes, privacy, owner, \
         created_at, updated_at, completed_at, phrases \
         FROM frequencies ORDER BY id DESC",
    )
    .fetch_all(db)
    .await?;

    rows.iter().map(row_to_frequency).collect()
}

/// Load one frequency by id
pub async fn find_by_id(db: &SqlitePool, id: i64) -> Result<Frequency> {
    let row = sqlx::query(
        "SELECT id, interval_minutes, duration_minutes, privacy, owner, \
         created_at, updated_at, completed_at, phrases \
         FROM frequencies WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| Error::NotFound(format!("frequency {}", id)))?;

    row_to_frequency(&row)
}

/// Insert a new frequency and return it with its assigned id
///
/// Sets `created_at = updated_at = now`, no completion, empty phrase list.
pub async fn insert(db: &SqlitePool, new: NewFrequency) -> Result<Frequency> {
    let now = Utc::now();

    let result = sqlx::query(
        "INSERT INTO frequencies \
         (interval_minutes, duration_minutes, privacy, owner, created_at, updated_at, phrases) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(new.interval_minutes)
    .bind(new.duration_minutes)
    .bind(&new.privacy)
    .bind(&new.owner)
    .bind(now)
    .bind(now)
    .bind("[]")
    .execute(db)
    .await?;

    find_by_id(db, result.last_insert_rowid()).await
}

/// Persist a frequency's mutable state (whole-row update, last write wins)
///
/// `created_at` is immutable and deliberately excluded from the update.
pub async fn save(db: &SqlitePool, frequency: &Frequency) -> Result<()> {
    let phrases_json = serde_json::to_string(&frequency.phrases)
        .map_err(|e| Error::Internal(format!("failed to serialize phrases: {}", e)))?;

    let result = sqlx::query(
        "UPDATE frequencies SET \
         interval_minutes = ?, duration_minutes = ?, privacy = ?, owner = ?, \
         updated_at = ?, completed_at = ?, phrases = ? \
         WHERE id = ?",
    )
    .bind(frequency.interval_minutes)
    .bind(frequency.duration_minutes)
    .bind(&frequency.privacy)
    .bind(&frequency.owner)
    .bind(frequency.updated_at)
    .bind(frequency.completed_at)
    .bind(phrases_json)
    .bind(frequency.id)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("frequency {}", frequency.id)));
    }

    Ok(())
}

fn row_to_frequency(row: &SqliteRow) -> Result<Frequency> {
    let phrases_json: String = row.get("phrases");
    let phrases: Vec<Phrase> = serde_json::from_str(&phrases_json)
        .map_err(|e| Error::Internal(format!("corrupt phrases column: {}", e)))?;

    Ok(Frequency {
        id: row.get("id"),
        interval_minutes: row.get("interval_minutes"),
        duration_minutes: row.get("duration_minutes"),
        privacy: row.get("privacy"),
        owner: row.get("owner"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
        updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
        completed_at: row.get::<Option<DateTime<Utc>>, _>("completed_at"),
        phrases,
    })
}
