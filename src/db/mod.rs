//! Database access layer
//!
//! Pool initialization plus the frequency store. The schema is created
//! idempotently at startup; there is no separate migration step.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

pub mod frequencies;
pub mod models;

pub use models::{Frequency, NewFrequency, Phrase};

/// Initialize the database connection pool and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // mode=rwc creates the database file on first run
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows the sweep and request handlers to read concurrently with a writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_frequencies_table(&pool).await?;

    Ok(pool)
}

/// Create the frequencies table (idempotent)
///
/// Phrases are embedded as a JSON array so a frequency round-trips as one
/// record: one row read on load, one row write on save, last write wins.
async fn create_frequencies_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS frequencies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            interval_minutes INTEGER NOT NULL CHECK (interval_minutes > 0),
            duration_minutes INTEGER NOT NULL CHECK (duration_minutes > 0),
            privacy TEXT NOT NULL DEFAULT '',
            owner TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            completed_at TEXT,
            phrases TEXT NOT NULL DEFAULT '[]'
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
