//! Tabular export projection.
//!
//! One row per graded event in ledger order: a direct join of the ledger
//! with the originating record, ready for a results table or spreadsheet
//! export. The engine owns no file format; rows are plain serializable
//! values and the caller decides how to render them.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use crate::normalize::confidence::NormalizedConfidence;
use crate::normalize::odds::{OddsNormalizer, OddsNotation};
use crate::types::{GameResult, PredictionRecord, Sport};

use super::engine::LedgerEntry;

/// One export row: ledger entry joined with its record's display fields.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRow {
    pub date: NaiveDate,
    pub sport: Sport,
    pub home_team: String,
    pub away_team: String,
    pub pick: String,
    /// Normalized confidence, integer percent.
    pub confidence_pct: u8,
    /// Odds rendered in the caller's preferred notation.
    pub odds: String,
    pub result: GameResult,
    pub profit_loss: i64,
    pub running_total: i64,
}

/// Project the ledger into export rows, preserving ledger order.
///
/// Entries whose record is missing from the snapshot are skipped; that can
/// only happen if the caller pairs a ledger with a different snapshot than
/// the one it was built from.
pub fn export_rows(
    records: &[PredictionRecord],
    ledger: &[LedgerEntry],
    odds: &OddsNormalizer,
    notation: OddsNotation,
) -> Vec<ExportRow> {
    let by_id: HashMap<&str, &PredictionRecord> =
        records.iter().map(|r| (r.id.as_str(), r)).collect();

    ledger
        .iter()
        .filter_map(|entry| {
            let record = by_id.get(entry.prediction_id.as_str())?;
            Some(ExportRow {
                date: record.game_time.date_naive(),
                sport: record.sport,
                home_team: record.home_team.clone(),
                away_team: record.away_team.clone(),
                pick: record.pick.clone(),
                confidence_pct: NormalizedConfidence::from_raw(record.raw_confidence).value(),
                odds: odds.normalize(&record.raw_odds).display_as(notation),
                result: record.result,
                profit_loss: entry.profit_loss,
                running_total: entry.running_total,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
