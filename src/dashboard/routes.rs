//! Dashboard API route handlers.
//!
//! All endpoints return JSON. The only shared state is the raw record
//! snapshot behind an `RwLock`; every derived number (ledger, aggregates,
//! summary, stake) is recomputed from that snapshot on each request.
//! There is no cached derived state to invalidate, so a snapshot swap is
//! always consistent with the next response.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::analytics::aggregate::{Aggregator, DailyAggregate};
use crate::analytics::stake::{StakeAdvisor, StakeRecommendation};
use crate::analytics::summary::{summarize, PerformanceSummary};
use crate::config::EngineConfig;
use crate::ledger::dedup::dedup_records;
use crate::ledger::engine::{LedgerEngine, LedgerEntry};
use crate::ledger::export::{export_rows, ExportRow};
use crate::normalize::confidence::NormalizedConfidence;
use crate::normalize::odds::OddsNormalizer;
use crate::types::{PredictionRecord, Sport};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct DashboardState {
    records: RwLock<Vec<PredictionRecord>>,
    engine: EngineConfig,
}

pub type AppState = Arc<DashboardState>;

impl DashboardState {
    pub fn new(records: Vec<PredictionRecord>, engine: EngineConfig) -> Self {
        Self {
            records: RwLock::new(records),
            engine,
        }
    }

    /// Swap in a freshly fetched snapshot.
    pub async fn replace_snapshot(&self, records: Vec<PredictionRecord>) {
        *self.records.write().await = records;
    }

    fn odds(&self) -> OddsNormalizer {
        OddsNormalizer::new(self.engine.fallback_odds)
    }

    fn ledger_engine(&self) -> LedgerEngine {
        LedgerEngine::new(self.engine.flat_stake, self.odds())
    }

    /// Deduplicated view of the current snapshot.
    async fn deduped(&self) -> Vec<PredictionRecord> {
        dedup_records(&self.records.read().await)
    }
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    pub currency: String,
    pub flat_stake: i64,
    #[serde(flatten)]
    pub performance: PerformanceSummary,
}

#[derive(Debug, Deserialize)]
pub struct DailyParams {
    /// Optional sport filter, upstream label form ("nba", "soccer", ...).
    pub sport: Option<String>,
    /// Moving-average window override, in graded days.
    pub window: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct StakeParams {
    pub bankroll: Option<i64>,
    /// Raw confidence in either unit convention.
    pub confidence: Option<f64>,
    /// Raw odds string in any supported notation.
    pub odds: Option<String>,
    /// Prediction the calculation is for; ad hoc when absent.
    pub id: Option<String>,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /api/summary
pub async fn get_summary(State(state): State<AppState>) -> Json<SummaryResponse> {
    let records = state.deduped().await;
    let ledger = state.ledger_engine().build(&records);
    Json(SummaryResponse {
        currency: state.engine.currency.clone(),
        flat_stake: state.engine.flat_stake,
        performance: summarize(&records, &ledger),
    })
}

/// GET /api/ledger
pub async fn get_ledger(State(state): State<AppState>) -> Json<Vec<LedgerEntry>> {
    let records = state.deduped().await;
    Json(state.ledger_engine().build(&records))
}

/// GET /api/daily?sport=nba&window=7
pub async fn get_daily(
    State(state): State<AppState>,
    Query(params): Query<DailyParams>,
) -> Json<Vec<DailyAggregate>> {
    let records = state.deduped().await;
    let window = params.window.unwrap_or(state.engine.moving_average_days);
    let aggregator = Aggregator::new(window);

    let series = match params.sport.as_deref() {
        Some(label) => aggregator.daily_for_sport(&records, Sport::from_label(label)),
        None => aggregator.daily(&records),
    };
    Json(series)
}

/// GET /api/export
pub async fn get_export(State(state): State<AppState>) -> Json<Vec<ExportRow>> {
    let records = state.deduped().await;
    let ledger = state.ledger_engine().build(&records);
    Json(export_rows(
        &records,
        &ledger,
        &state.odds(),
        state.engine.odds_display,
    ))
}

/// GET /api/stake?bankroll=10000&confidence=70&odds=-110
pub async fn get_stake(
    State(state): State<AppState>,
    Query(params): Query<StakeParams>,
) -> Json<StakeRecommendation> {
    let advisor = StakeAdvisor::new(state.engine.kelly_cap_fraction);
    let confidence = NormalizedConfidence::from_raw(params.confidence.unwrap_or(0.0));
    let odds = state.odds().normalize(params.odds.as_deref().unwrap_or(""));

    Json(advisor.recommend(
        params.id.as_deref().unwrap_or("adhoc"),
        params.bankroll.unwrap_or(0),
        confidence,
        &odds,
    ))
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
