//! Daily accuracy aggregation.
//!
//! Buckets graded records by the calendar date of their kickoff, computes
//! per-day accuracy, and smooths it with a trailing moving average.
//!
//! A day only exists in the series if at least one event was graded on it.
//! The moving-average window slides over those non-empty days: a quiet
//! Tuesday is skipped entirely, never counted as a zero-accuracy day, and
//! at the start of a series the window shrinks instead of padding with
//! synthetic zeros.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::VecDeque;

use crate::types::{GameResult, PredictionRecord, Sport};

/// Default trailing window, in graded days.
pub const DEFAULT_WINDOW_DAYS: usize = 7;

// ---------------------------------------------------------------------------
// Daily aggregate
// ---------------------------------------------------------------------------

/// Accuracy figures for one calendar day with at least one graded event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    /// Set when the series was filtered to a single sport.
    pub sport: Option<Sport>,
    pub total_graded: usize,
    pub wins: usize,
    pub losses: usize,
    /// `wins / (wins + losses) × 100`.
    pub accuracy_pct: f64,
    /// Mean accuracy over the trailing window of non-empty days,
    /// including this one.
    pub moving_avg: f64,
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Buckets graded records per day and computes the accuracy series.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    window_days: usize,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

impl Aggregator {
    pub fn new(window_days: usize) -> Self {
        Self {
            window_days: window_days.max(1),
        }
    }

    /// Daily series over all sports, ascending by date.
    pub fn daily(&self, records: &[PredictionRecord]) -> Vec<DailyAggregate> {
        self.daily_series(records.iter().filter(|r| r.is_graded()), None)
    }

    /// Daily series restricted to one sport.
    pub fn daily_for_sport(&self, records: &[PredictionRecord], sport: Sport) -> Vec<DailyAggregate> {
        self.daily_series(
            records.iter().filter(|r| r.is_graded() && r.sport == sport),
            Some(sport),
        )
    }

    fn daily_series<'a>(
        &self,
        graded: impl Iterator<Item = &'a PredictionRecord>,
        sport: Option<Sport>,
    ) -> Vec<DailyAggregate> {
        // BTreeMap keys give the ascending date walk for free; days with no
        // graded events simply never become keys.
        let mut buckets: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
        for record in graded {
            let bucket = buckets.entry(record.game_time.date_naive()).or_insert((0, 0));
            match record.result {
                GameResult::Win => bucket.0 += 1,
                GameResult::Loss => bucket.1 += 1,
                GameResult::Pending => {}
            }
        }

        let mut window: VecDeque<f64> = VecDeque::with_capacity(self.window_days);
        let mut series = Vec::with_capacity(buckets.len());

        for (date, (wins, losses)) in buckets {
            let total_graded = wins + losses;
            let accuracy_pct = wins as f64 / total_graded as f64 * 100.0;

            if window.len() == self.window_days {
                window.pop_front();
            }
            window.push_back(accuracy_pct);
            let moving_avg = window.iter().sum::<f64>() / window.len() as f64;

            series.push(DailyAggregate {
                date,
                sport,
                total_graded,
                wins,
                losses,
                accuracy_pct,
                moving_avg,
            });
        }

        series
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
