//! Headline performance numbers for the results view.
//!
//! Everything here is a projection of the ledger plus the graded record
//! counts: overall accuracy, net profit, the peak of the running total,
//! the deepest drawdown from that peak, and the current win/loss streak.

use serde::Serialize;
use std::collections::HashMap;

use crate::ledger::engine::LedgerEntry;
use crate::types::{GameResult, PredictionRecord};

/// Aggregate performance across the whole (deduplicated) snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSummary {
    pub total_records: usize,
    pub total_graded: usize,
    pub pending: usize,
    pub wins: usize,
    pub losses: usize,
    /// `wins / (wins + losses) × 100`; 0.0 when nothing is graded.
    pub accuracy_pct: f64,
    /// Final running total of the ledger.
    pub net_profit: i64,
    /// Highest running total reached (at least 0).
    pub peak_total: i64,
    /// Deepest drop from a prior peak of the running total.
    pub max_drawdown: i64,
    /// Consecutive identical results at the end of the ledger:
    /// positive = wins, negative = losses, 0 = empty ledger.
    pub current_streak: i64,
}

/// Compute the summary from a snapshot and the ledger built from it.
pub fn summarize(records: &[PredictionRecord], ledger: &[LedgerEntry]) -> PerformanceSummary {
    let wins = records.iter().filter(|r| r.result == GameResult::Win).count();
    let losses = records.iter().filter(|r| r.result == GameResult::Loss).count();
    let total_graded = wins + losses;
    let accuracy_pct = if total_graded == 0 {
        0.0
    } else {
        wins as f64 / total_graded as f64 * 100.0
    };

    let net_profit = ledger.last().map(|e| e.running_total).unwrap_or(0);

    let mut peak_total: i64 = 0;
    let mut max_drawdown: i64 = 0;
    for entry in ledger {
        peak_total = peak_total.max(entry.running_total);
        max_drawdown = max_drawdown.max(peak_total - entry.running_total);
    }

    PerformanceSummary {
        total_records: records.len(),
        total_graded,
        pending: records.len() - total_graded,
        wins,
        losses,
        accuracy_pct,
        net_profit,
        peak_total,
        max_drawdown,
        current_streak: current_streak(records, ledger),
    }
}

/// Signed length of the trailing run of identical results in ledger order.
fn current_streak(records: &[PredictionRecord], ledger: &[LedgerEntry]) -> i64 {
    let results: HashMap<&str, GameResult> = records
        .iter()
        .map(|r| (r.id.as_str(), r.result))
        .collect();

    let mut streak: i64 = 0;
    let mut tail: Option<GameResult> = None;

    for entry in ledger.iter().rev() {
        let Some(result) = results.get(entry.prediction_id.as_str()) else {
            break;
        };
        match tail {
            None => {
                tail = Some(*result);
                streak = 1;
            }
            Some(t) if t == *result => streak += 1,
            Some(_) => break,
        }
    }

    match tail {
        Some(GameResult::Loss) => -streak,
        Some(_) => streak,
        None => 0,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
