//! Database models

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single text entry inside a frequency.
///
/// Phrases are embedded in their frequency (JSON column) and are append-only:
/// the sweep may blank the text of the latest phrase, but entries are never
/// removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phrase {
    pub id: Uuid,
    /// Empty text means the phrase was cleared by the sweep
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Phrase {
    pub fn new(text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            created_at: Utc::now(),
        }
    }

    /// True once the sweep has blanked this phrase
    pub fn is_cleared(&self) -> bool {
        self.text.is_empty()
    }
}

/// A time-bounded bucket that collects phrases.
///
/// `duration_minutes` bounds the total lifetime (after which the sweep marks
/// the record completed); `interval_minutes` is the cadence on which the
/// latest phrase goes stale if no new phrase arrives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frequency {
    pub id: i64,
    pub interval_minutes: i64,
    pub duration_minutes: i64,
    /// Opaque visibility tag; not interpreted by the sweep or the store
    pub privacy: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    /// Last append-or-prune time; completion does not touch it
    pub updated_at: DateTime<Utc>,
    /// Set once by the sweep when the lifetime elapses, never cleared
    pub completed_at: Option<DateTime<Utc>>,
    pub phrases: Vec<Phrase>,
}

impl Frequency {
    /// The instant at which this frequency's lifetime elapses
    pub fn completion_deadline(&self) -> DateTime<Utc> {
        self.created_at + Duration::minutes(self.duration_minutes)
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// True when no phrase has arrived within the last interval as of `now`
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.updated_at < now - Duration::minutes(self.interval_minutes)
    }
}

/// Fields supplied by the service when inserting a new frequency
#[derive(Debug, Clone)]
pub struct NewFrequency {
    pub interval_minutes: i64,
    pub duration_minutes: i64,
    pub privacy: String,
    pub owner: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frequency(interval: i64, duration: i64, created_at: DateTime<Utc>) -> Frequency {
        Frequency {
            id: 1,
            interval_minutes: interval,
            duration_minutes: duration,
            privacy: String::new(),
            owner: "anonymous".to_string(),
            created_at,
            updated_at: created_at,
            completed_at: None,
            phrases: Vec::new(),
        }
    }

    #[test]
    fn test_completion_deadline_is_created_plus_duration() {
        let created = Utc::now();
        let f = frequency(1, 10, created);
        assert_eq!(f.completion_deadline(), created + Duration::minutes(10));
    }

    #[test]
    fn test_is_stale_respects_interval() {
        let now = Utc::now();
        let mut f = frequency(5, 60, now - Duration::minutes(10));
        f.updated_at = now - Duration::minutes(6);
        assert!(f.is_stale(now));

        f.updated_at = now - Duration::minutes(4);
        assert!(!f.is_stale(now));
    }

    #[test]
    fn test_cleared_phrase() {
        let mut phrase = Phrase::new("hello".to_string());
        assert!(!phrase.is_cleared());
        phrase.text = String::new();
        assert!(phrase.is_cleared());
    }
}
