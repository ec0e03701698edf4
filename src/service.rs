//! Frequency service
//!
//! The two user-triggered write operations: create a frequency and append a
//! phrase. Both are thin wrappers over the store; they run concurrently with
//! the sweep against the same rows with no coordination (the store is last
//! write wins), which is the documented behavior of this application.

use crate::db::frequencies;
use crate::db::models::{Frequency, NewFrequency, Phrase};
use crate::error::{Error, Result};
use crate::events::{CadenceEvent, EventBus};
use sqlx::SqlitePool;
use tracing::info;

/// Owner recorded on every frequency until real authentication exists
pub const PLACEHOLDER_OWNER: &str = "anonymous";

/// Create a frequency from raw request parameters
///
/// `interval` and `duration` must both be present and positive; everything
/// else is stamped by the store (`created_at = updated_at = now`, empty
/// phrase list, no completion).
pub async fn create_frequency(
    db: &SqlitePool,
    events: &EventBus,
    interval: Option<i64>,
    duration: Option<i64>,
    privacy: Option<String>,
) -> Result<Frequency> {
    let interval_minutes = match interval {
        Some(minutes) if minutes > 0 => minutes,
        Some(minutes) => {
            return Err(Error::InvalidInput(format!(
                "interval must be positive, got {}",
                minutes
            )))
        }
        None => return Err(Error::InvalidInput("interval is required".to_string())),
    };

    let duration_minutes = match duration {
        Some(minutes) if minutes > 0 => minutes,
        Some(minutes) => {
            return Err(Error::InvalidInput(format!(
                "duration must be positive, got {}",
                minutes
            )))
        }
        None => return Err(Error::InvalidInput("duration is required".to_string())),
    };

    let frequency = frequencies::insert(
        db,
        NewFrequency {
            interval_minutes,
            duration_minutes,
            privacy: privacy.unwrap_or_default(),
            owner: PLACEHOLDER_OWNER.to_string(),
        },
    )
    .await?;

    info!(
        "Created frequency {} (interval: {}m, duration: {}m)",
        frequency.id, frequency.interval_minutes, frequency.duration_minutes
    );

    events.emit_lossy(CadenceEvent::FrequencyCreated {
        frequency_id: frequency.id,
        timestamp: frequency.created_at,
    });

    Ok(frequency)
}

/// Append a phrase to an existing frequency
///
/// Loads the record (NotFound if absent), pushes the phrase, refreshes
/// `updated_at`, and saves. There is no guard against appending to a
/// completed frequency; the sweep skips completed records regardless.
pub async fn append_phrase(
    db: &SqlitePool,
    events: &EventBus,
    frequency_id: i64,
    text: String,
) -> Result<Frequency> {
    let mut frequency = frequencies::find_by_id(db, frequency_id).await?;

    let phrase = Phrase::new(text);
    let phrase_id = phrase.id;
    let appended_at = phrase.created_at;

    frequency.phrases.push(phrase);
    frequency.updated_at = appended_at;

    frequencies::save(db, &frequency).await?;

    info!(
        "Appended phrase {} to frequency {}",
        phrase_id, frequency.id
    );

    events.emit_lossy(CadenceEvent::PhraseAppended {
        frequency_id: frequency.id,
        phrase_id,
        timestamp: appended_at,
    });

    Ok(frequency)
}
