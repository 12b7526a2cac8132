//! Ledger engine — per-event profit/loss and running totals.
//!
//! Each graded event settles at a flat stake: a win pays
//! `round(stake × (decimalOdds − 1))`, a loss costs the stake. The running
//! total is the exact prefix sum of the per-event amounts; rounding happens
//! once per entry and is never re-applied to the cumulative sum, so the
//! ledger is reproducible bit for bit on every recomputation.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::*;
use serde::Serialize;

use crate::normalize::odds::OddsNormalizer;
use crate::types::{GameResult, PredictionRecord};

// ---------------------------------------------------------------------------
// Ledger entry
// ---------------------------------------------------------------------------

/// One settled event in the ledger, in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub prediction_id: String,
    /// Flat stake in whole currency units.
    pub stake: i64,
    /// Signed settlement amount for this event.
    pub profit_loss: i64,
    /// Prefix sum of `profit_loss` up to and including this entry.
    pub running_total: i64,
    /// Chronological index, 0-based.
    pub position: usize,
}

// ---------------------------------------------------------------------------
// Currency rounding
// ---------------------------------------------------------------------------

/// Round a decimal amount to whole currency units, half away from zero.
///
/// The single rounding point for every derived amount in the crate.
pub(crate) fn round_currency(value: Decimal) -> i64 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

/// Graded records in chronological order. The sort is stable, so records
/// sharing a kickoff instant keep their snapshot order.
pub fn chronological_graded(records: &[PredictionRecord]) -> Vec<PredictionRecord> {
    let mut graded: Vec<PredictionRecord> = records
        .iter()
        .filter(|r| r.is_graded())
        .cloned()
        .collect();
    graded.sort_by_key(|r| r.game_time);
    graded
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Computes the profit/loss ledger from a record snapshot.
///
/// Stateless: every call works only from its arguments, so any prefix of a
/// larger chronological list produces exactly the prefix of the full ledger.
#[derive(Debug, Clone, Copy)]
pub struct LedgerEngine {
    stake: i64,
    odds: OddsNormalizer,
}

impl LedgerEngine {
    pub fn new(stake: i64, odds: OddsNormalizer) -> Self {
        Self { stake, odds }
    }

    /// The flat per-event stake.
    pub fn stake(&self) -> i64 {
        self.stake
    }

    /// Build the ledger for a snapshot. Pending records are skipped;
    /// graded records are settled in chronological order.
    pub fn build(&self, records: &[PredictionRecord]) -> Vec<LedgerEntry> {
        self.entries_from_sorted(&chronological_graded(records))
    }

    /// Settle an already-sorted graded list.
    fn entries_from_sorted(&self, graded: &[PredictionRecord]) -> Vec<LedgerEntry> {
        debug_assert!(
            graded.windows(2).all(|w| w[0].game_time <= w[1].game_time),
            "ledger input must be chronologically ascending"
        );

        let mut entries = Vec::with_capacity(graded.len());
        let mut running_total: i64 = 0;

        for (position, record) in graded.iter().enumerate() {
            let profit_loss = self.settle(record);
            running_total += profit_loss;
            entries.push(LedgerEntry {
                prediction_id: record.id.clone(),
                stake: self.stake,
                profit_loss,
                running_total,
                position,
            });
        }

        entries
    }

    /// Signed settlement amount for one graded record.
    fn settle(&self, record: &PredictionRecord) -> i64 {
        match record.result {
            GameResult::Win => {
                let odds = self.odds.normalize(&record.raw_odds);
                round_currency(Decimal::from(self.stake) * odds.payout_multiple())
            }
            GameResult::Loss => -self.stake,
            GameResult::Pending => 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
