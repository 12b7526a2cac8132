//! End-to-end pipeline test: snapshot JSON → dedup → ledger → aggregates →
//! summary → stake, exercising the full read path the dashboard serves.

use rust_decimal_macros::dec;

use picktally::analytics::aggregate::Aggregator;
use picktally::analytics::stake::StakeAdvisor;
use picktally::analytics::summary::summarize;
use picktally::ledger::dedup::dedup_records;
use picktally::ledger::engine::LedgerEngine;
use picktally::ledger::export::export_rows;
use picktally::normalize::confidence::NormalizedConfidence;
use picktally::normalize::odds::{OddsNormalizer, OddsNotation};
use picktally::types::{GameResult, PredictionRecord, Sport};

/// A messy but realistic snapshot: mixed odds notations, mixed confidence
/// units, a duplicate event from a re-publish, a dirty odds string, an
/// unknown sport label, and an ungraded record.
const SNAPSHOT: &str = r#"[
    {
        "id": "pk-1",
        "sport": "soccer",
        "homeTeam": "Arsenal",
        "awayTeam": "Chelsea",
        "gameTime": "2026-03-01T15:00:00Z",
        "pick": "Arsenal ML",
        "rawConfidence": 0.73,
        "rawOdds": "1.91",
        "result": "win"
    },
    {
        "id": "pk-1-repub",
        "sport": "soccer",
        "homeTeam": " ARSENAL ",
        "awayTeam": "chelsea",
        "gameTime": "2026-03-01T17:00:00Z",
        "pick": "Arsenal ML",
        "rawConfidence": 73,
        "rawOdds": "+200",
        "result": "win"
    },
    {
        "id": "pk-2",
        "sport": "nba",
        "homeTeam": "Lakers",
        "awayTeam": "Celtics",
        "gameTime": "2026-03-02T19:30:00Z",
        "pick": "Celtics +4.5",
        "rawConfidence": 61,
        "rawOdds": "N/A",
        "result": "loss"
    },
    {
        "id": "pk-3",
        "sport": "kabaddi",
        "homeTeam": "Patna",
        "awayTeam": "Jaipur",
        "gameTime": "2026-03-05T12:00:00Z",
        "pick": "Patna ML",
        "rawConfidence": 0.58,
        "rawOdds": "3/2",
        "result": "win"
    },
    {
        "id": "pk-4",
        "sport": "nfl",
        "homeTeam": "Chiefs",
        "awayTeam": "Bills",
        "gameTime": "2026-03-06T23:00:00Z",
        "pick": "Over 47.5",
        "rawConfidence": 0.66,
        "rawOdds": "+150",
        "result": "pending"
    }
]"#;

fn load_snapshot() -> Vec<PredictionRecord> {
    serde_json::from_str(SNAPSHOT).unwrap()
}

#[test]
fn snapshot_parses_with_tolerant_fields() {
    let records = load_snapshot();
    assert_eq!(records.len(), 5);
    assert_eq!(records[3].sport, Sport::Other); // "kabaddi"
    assert_eq!(records[4].result, GameResult::Pending);
}

#[test]
fn dedup_collapses_republished_event() {
    let records = load_snapshot();
    let unique = dedup_records(&records);

    // pk-1-repub shares (arsenal, chelsea, 2026-03-01) with pk-1.
    assert_eq!(unique.len(), 4);
    assert!(unique.iter().all(|r| r.id != "pk-1-repub"));
    // First occurrence survives untouched: odds stay "1.91", not "+200".
    assert_eq!(unique[0].raw_odds, "1.91");

    // Idempotent.
    let twice = dedup_records(&unique);
    assert_eq!(twice.len(), unique.len());
}

#[test]
fn ledger_settles_mixed_notations_deterministically() {
    let records = dedup_records(&load_snapshot());
    let engine = LedgerEngine::new(1000, OddsNormalizer::new(dec!(1.91)));

    let ledger = engine.build(&records);

    // Three graded events: win @1.91, loss (dirty odds, costs the stake
    // regardless), win @3/2 = 2.50.
    let pnl: Vec<i64> = ledger.iter().map(|e| e.profit_loss).collect();
    let totals: Vec<i64> = ledger.iter().map(|e| e.running_total).collect();
    assert_eq!(pnl, vec![910, -1000, 1500]);
    assert_eq!(totals, vec![910, -90, 1410]);

    // Bit-identical on recomputation.
    assert_eq!(ledger, engine.build(&records));
}

#[test]
fn aggregates_skip_quiet_days() {
    let records = dedup_records(&load_snapshot());
    let series = Aggregator::new(7).daily(&records);

    // Graded days: 03-01, 03-02, 03-05. The 03-03/03-04 gap contributes
    // nothing and the pending 03-06 game never appears.
    assert_eq!(series.len(), 3);
    assert!((series[0].accuracy_pct - 100.0).abs() < 1e-10);
    assert!((series[1].accuracy_pct - 0.0).abs() < 1e-10);
    assert!((series[2].accuracy_pct - 100.0).abs() < 1e-10);
    assert!((series[2].moving_avg - 200.0 / 3.0).abs() < 1e-10);
}

#[test]
fn summary_headline_numbers() {
    let records = dedup_records(&load_snapshot());
    let ledger = LedgerEngine::new(1000, OddsNormalizer::new(dec!(1.91))).build(&records);
    let summary = summarize(&records, &ledger);

    assert_eq!(summary.total_graded, 3);
    assert_eq!(summary.pending, 1);
    assert_eq!(summary.wins, 2);
    assert_eq!(summary.losses, 1);
    assert_eq!(summary.net_profit, 1410);
    assert_eq!(summary.peak_total, 1410);
    assert_eq!(summary.max_drawdown, 1000);
    assert_eq!(summary.current_streak, 1);
}

#[test]
fn export_projects_ledger_order() {
    let records = dedup_records(&load_snapshot());
    let odds = OddsNormalizer::new(dec!(1.91));
    let ledger = LedgerEngine::new(1000, odds).build(&records);
    let rows = export_rows(&records, &ledger, &odds, OddsNotation::American);

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].date, "2026-03-01".parse().unwrap());
    assert_eq!(rows[0].odds, "-110"); // 1.91 rendered as American
    assert_eq!(rows[1].odds, "-110"); // the fallback 1.91, same notation
    assert_eq!(rows[2].running_total, 1410);
}

#[test]
fn stake_advisor_on_pending_pick() {
    // The user asks for a stake on the ungraded Chiefs game.
    let records = dedup_records(&load_snapshot());
    let pending = records.iter().find(|r| r.id == "pk-4").unwrap();

    let odds = OddsNormalizer::new(dec!(1.91)).normalize(&pending.raw_odds);
    let confidence = NormalizedConfidence::from_raw(pending.raw_confidence);
    assert_eq!(confidence.value(), 66);

    let rec = StakeAdvisor::new(dec!(0.10)).recommend(&pending.id, 10_000, confidence, &odds);

    // p=0.66, d=2.50: raw = (1.65 - 1) / 1.5 ≈ 0.4333 → capped at 0.10.
    assert_eq!(rec.capped_fraction, dec!(0.10));
    assert_eq!(rec.recommended_stake, 1000);
    assert_eq!(rec.potential_profit, 1500);
}
