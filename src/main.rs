//! PICKTALLY — Prediction Performance Ledger & Wagering Analytics Engine
//!
//! Entry point. Loads configuration, initialises structured logging, reads
//! the initial prediction snapshot, and serves the dashboard while
//! periodically re-reading the snapshot with graceful shutdown. All derived
//! numbers are recomputed from the latest snapshot on every request; the
//! refresh loop only swaps raw records.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use picktally::analytics::summary::summarize;
use picktally::config::AppConfig;
use picktally::dashboard::routes::DashboardState;
use picktally::dashboard::spawn_dashboard;
use picktally::ledger::dedup::dedup_records;
use picktally::ledger::engine::LedgerEngine;
use picktally::normalize::odds::OddsNormalizer;
use picktally::source::{RecordSource, SnapshotSource};
use picktally::types::PredictionRecord;

const BANNER: &str = r#"
 ____  ___ ____ _  _______  _    _     _  __   __
|  _ \|_ _/ ___| |/ /_   _|/ \  | |   | | \ \ / /
| |_) || | |   | ' /  | | / _ \ | |   | |  \ V /
|  __/ | | |___| . \  | |/ ___ \| |___| |___| |
|_|   |___\____|_|\_\ |_/_/   \_\_____|_____|_|

  Prediction Performance Ledger & Wagering Analytics
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML
    let cfg = AppConfig::load("config.toml")?;

    // Initialise structured logging
    init_logging();

    // Print startup banner
    println!("{BANNER}");
    info!(
        flat_stake = cfg.engine.flat_stake,
        currency = %cfg.engine.currency,
        fallback_odds = %cfg.engine.fallback_odds,
        kelly_cap = %cfg.engine.kelly_cap_fraction,
        snapshot = %cfg.snapshot_path(),
        "PICKTALLY starting up"
    );

    // -- Initial snapshot ------------------------------------------------

    let source = SnapshotSource::new(cfg.snapshot_path());
    let records = match source.fetch_records().await {
        Ok(records) => records,
        Err(e) => {
            // The dashboard must come up even with a missing or dirty
            // snapshot; it renders empty until the next refresh succeeds.
            warn!(error = %e, "Initial snapshot unavailable, starting empty");
            Vec::new()
        }
    };

    log_snapshot_report(&cfg, &records);

    // -- Dashboard -------------------------------------------------------

    let state = Arc::new(DashboardState::new(records, cfg.engine.clone()));
    if cfg.dashboard.enabled {
        spawn_dashboard(state.clone(), cfg.dashboard.port)?;
    }

    // -- Refresh loop ----------------------------------------------------

    let mut interval = tokio::time::interval(Duration::from_secs(cfg.snapshot.refresh_secs));
    interval.tick().await; // first tick fires immediately
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        refresh_secs = cfg.snapshot.refresh_secs,
        "Entering refresh loop. Press Ctrl+C to stop."
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match source.fetch_records().await {
                    Ok(records) => {
                        log_snapshot_report(&cfg, &records);
                        state.replace_snapshot(records).await;
                    }
                    Err(e) => {
                        // Keep serving the previous snapshot.
                        error!(error = %e, "Snapshot refresh failed");
                    }
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received. Stopping.");
                break;
            }
        }
    }

    Ok(())
}

/// Log a human-readable summary of a freshly loaded snapshot.
fn log_snapshot_report(cfg: &AppConfig, records: &[PredictionRecord]) {
    let deduped = dedup_records(records);
    let ledger = LedgerEngine::new(
        cfg.engine.flat_stake,
        OddsNormalizer::new(cfg.engine.fallback_odds),
    )
    .build(&deduped);
    let summary = summarize(&deduped, &ledger);

    info!(
        records = records.len(),
        unique = deduped.len(),
        graded = summary.total_graded,
        pending = summary.pending,
        accuracy = format!("{:.1}%", summary.accuracy_pct),
        net = format!("{} {}", summary.net_profit, cfg.engine.currency),
        streak = summary.current_streak,
        "Snapshot processed"
    );
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("picktally=info"));

    let json_logging = std::env::var("PICKTALLY_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
