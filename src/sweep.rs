//! Periodic frequency sweep
//!
//! Runs on a fixed wall-clock period, loads every frequency, and applies two
//! time rules per record:
//!
//! 1. Completion: once `now >= created_at + duration_minutes`, set
//!    `completed_at` and stop touching the record forever. Completion takes
//!    precedence over pruning within a tick.
//! 2. Pruning: if the record is not completed and `updated_at` is older than
//!    `now - interval_minutes`, blank the text of the latest phrase and
//!    refresh `updated_at`. A stale frequency with no phrases is left
//!    untouched (and untimestamped) so it stays eligible every tick until a
//!    phrase exists.
//!
//! The sweep coordinates with nobody: request handlers append phrases to the
//! same rows between a tick's load and its save, and the store resolves the
//! conflict as last write wins. A per-record save failure is logged and does
//! not affect sibling records; a load failure aborts the tick and the next
//! tick retries from scratch.

use crate::db::frequencies;
use crate::db::models::Frequency;
use crate::error::Result;
use crate::events::{CadenceEvent, EventBus};
use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

/// Sweep configuration
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Sweep period in seconds (default: 5s)
    pub period_secs: u64,

    /// Enable the sweep (default: true)
    pub enabled: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            period_secs: 5,
            enabled: true,
        }
    }
}

/// What a single tick decides to do with one frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepAction {
    /// Completed already, or neither rule applies
    Leave,
    /// Lifetime elapsed: set completed_at
    Complete,
    /// Stale with phrases: blank the latest phrase
    Prune,
    /// Stale but nothing to prune: observe, do not write
    SkipEmpty,
}

/// Decide the action for one frequency at one instant
///
/// Pure so the time-window edges are testable without a database. Completion
/// uses a non-strict comparison: a record exactly at its deadline completes
/// on the earliest tick that observes it.
pub fn classify(frequency: &Frequency, now: DateTime<Utc>) -> SweepAction {
    if frequency.is_completed() {
        return SweepAction::Leave;
    }

    if now >= frequency.completion_deadline() {
        return SweepAction::Complete;
    }

    let stale_threshold = now - Duration::minutes(frequency.interval_minutes);
    if frequency.updated_at < stale_threshold {
        if frequency.phrases.is_empty() {
            SweepAction::SkipEmpty
        } else {
            SweepAction::Prune
        }
    } else {
        SweepAction::Leave
    }
}

/// Counts of what one tick did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub examined: usize,
    pub completed: usize,
    pub pruned: usize,
    pub skipped_empty: usize,
    pub save_failures: usize,
}

impl SweepStats {
    /// True when the tick wrote anything
    pub fn mutated(&self) -> bool {
        self.completed > 0 || self.pruned > 0
    }
}

/// Run one sweep pass over every frequency
///
/// `now` is a parameter so tests can drive the time windows directly; the
/// background task passes `Utc::now()` each tick. Returns Err only when the
/// initial load fails — per-record save failures are logged, counted, and
/// swallowed so sibling records still get processed.
pub async fn sweep_tick(
    db: &SqlitePool,
    events: &EventBus,
    now: DateTime<Utc>,
) -> Result<SweepStats> {
    let all = frequencies::list_all(db).await?;

    let mut stats = SweepStats {
        examined: all.len(),
        ..Default::default()
    };

    for mut frequency in all {
        match classify(&frequency, now) {
            SweepAction::Leave => {}

            SweepAction::Complete => {
                info!("Completing frequency {}", frequency.id);
                frequency.completed_at = Some(now);

                match frequencies::save(db, &frequency).await {
                    Ok(()) => {
                        stats.completed += 1;
                        events.emit_lossy(CadenceEvent::FrequencyCompleted {
                            frequency_id: frequency.id,
                            timestamp: now,
                        });
                    }
                    Err(e) => {
                        stats.save_failures += 1;
                        error!("Failed to complete frequency {}: {}", frequency.id, e);
                    }
                }
            }

            SweepAction::SkipEmpty => {
                debug!("Frequency {} is stale but has no phrases", frequency.id);
                stats.skipped_empty += 1;
                events.emit_lossy(CadenceEvent::PruneSkippedEmpty {
                    frequency_id: frequency.id,
                    timestamp: now,
                });
            }

            SweepAction::Prune => {
                if let Some(last) = frequency.phrases.last_mut() {
                    info!("Pruning frequency {}", frequency.id);
                    let phrase_id = last.id;
                    last.text = String::new();
                    frequency.updated_at = now;

                    match frequencies::save(db, &frequency).await {
                        Ok(()) => {
                            stats.pruned += 1;
                            events.emit_lossy(CadenceEvent::PhrasePruned {
                                frequency_id: frequency.id,
                                phrase_id,
                                timestamp: now,
                            });
                        }
                        Err(e) => {
                            stats.save_failures += 1;
                            error!("Failed to prune frequency {}: {}", frequency.id, e);
                        }
                    }
                }
            }
        }
    }

    Ok(stats)
}

/// Background sweep task
///
/// Owned by the process lifecycle: started once after the database is ready,
/// runs until shutdown. Ticks never overlap (each awaits its predecessor) and
/// missed ticks are skipped rather than bursted.
pub struct Sweeper {
    config: SweepConfig,
    db: SqlitePool,
    events: Arc<EventBus>,
}

impl Sweeper {
    pub fn new(config: SweepConfig, db: SqlitePool, events: Arc<EventBus>) -> Self {
        Self { config, db, events }
    }

    /// Spawn the periodic sweep task
    pub fn run(self: Arc<Self>) {
        if !self.config.enabled {
            info!("Sweeper disabled by configuration");
            return;
        }

        // A zero period would panic in tokio::time::interval
        let period_secs = self.config.period_secs.max(1);

        info!("Starting sweeper (period: {}s)", period_secs);

        tokio::spawn(async move {
            let mut timer = interval(std::time::Duration::from_secs(period_secs));
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                timer.tick().await;

                match sweep_tick(&self.db, &self.events, Utc::now()).await {
                    Ok(stats) if stats.mutated() => {
                        info!(
                            "Sweep: {} examined, {} completed, {} pruned, {} empty, {} save failures",
                            stats.examined,
                            stats.completed,
                            stats.pruned,
                            stats.skipped_empty,
                            stats.save_failures
                        );
                    }
                    Ok(stats) => {
                        debug!("Sweep: {} examined, nothing to do", stats.examined);
                    }
                    Err(e) => {
                        // Nothing was loaded; the next tick retries from scratch
                        error!("Sweep tick failed: {}", e);
                    }
                }
            }
        });
    }
}
