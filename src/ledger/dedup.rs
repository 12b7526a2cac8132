//! Event deduplication.
//!
//! Upstream feeds occasionally deliver several records for the same
//! real-world game (re-publishes, multi-source ingestion). They are
//! collapsed by a composite event key; the first occurrence wins and no
//! fields are ever merged across colliding records, because merging would
//! silently mix odds and confidence from unrelated upstream entries.

use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::debug;

use crate::types::PredictionRecord;

/// Composite identifier for one real-world event:
/// `(normalized home, normalized away, calendar date of kickoff)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKey {
    pub home: String,
    pub away: String,
    pub date: NaiveDate,
}

impl EventKey {
    pub fn of(record: &PredictionRecord) -> Self {
        EventKey {
            home: normalize_team(&record.home_team),
            away: normalize_team(&record.away_team),
            date: record.game_time.date_naive(),
        }
    }
}

/// Case- and whitespace-insensitive team name form.
fn normalize_team(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapse duplicate records, keeping the first occurrence per event key
/// and preserving the relative order of survivors.
///
/// Idempotent: running the output through again is a no-op.
pub fn dedup_records(records: &[PredictionRecord]) -> Vec<PredictionRecord> {
    let mut seen: HashSet<EventKey> = HashSet::with_capacity(records.len());
    let mut unique = Vec::with_capacity(records.len());

    for record in records {
        if seen.insert(EventKey::of(record)) {
            unique.push(record.clone());
        } else {
            debug!(
                id = %record.id,
                matchup = %record.matchup(),
                date = %record.game_time.date_naive(),
                "Dropping duplicate record for already-seen event"
            );
        }
    }

    unique
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
