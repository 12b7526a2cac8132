//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! The snapshot path can be overridden at runtime via the
//! `PICKTALLY_SNAPSHOT` environment variable.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::fs;

use crate::normalize::odds::OddsNotation;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub snapshot: SnapshotConfig,
    pub dashboard: DashboardConfig,
}

/// Settings that parameterize the computation engine.
///
/// All arithmetic knobs live here so that every view reads the same flat
/// stake and the same Kelly cap. The upstream dashboard suffered from
/// per-view stake constants drifting apart; a single config value is the fix.
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// Flat stake per graded event, in whole currency units.
    pub flat_stake: i64,
    /// ISO currency code, display only.
    pub currency: String,
    /// Substituted decimal odds when the raw string is unparseable.
    pub fallback_odds: Decimal,
    /// Ceiling on the Kelly fraction (e.g. 0.10 = never stake more than
    /// 10% of bankroll regardless of perceived edge).
    pub kelly_cap_fraction: Decimal,
    /// Trailing window for the accuracy moving average, in graded days.
    pub moving_average_days: usize,
    /// Preferred notation for odds presented back to the user.
    pub odds_display: OddsNotation,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            flat_stake: 1000,
            currency: "USD".to_string(),
            fallback_odds: dec!(1.91),
            kelly_cap_fraction: dec!(0.10),
            moving_average_days: 7,
            odds_display: OddsNotation::American,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SnapshotConfig {
    /// Path to the prediction snapshot JSON produced by the fetch layer.
    pub path: String,
    /// How often the binary re-reads the snapshot, in seconds.
    pub refresh_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub enabled: bool,
    pub port: u16,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Snapshot path, honouring the env-var override.
    pub fn snapshot_path(&self) -> String {
        std::env::var("PICKTALLY_SNAPSHOT").unwrap_or_else(|_| self.snapshot.path.clone())
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.engine.flat_stake > 0,
            "engine.flat_stake must be positive, got {}",
            self.engine.flat_stake
        );
        anyhow::ensure!(
            self.engine.fallback_odds > Decimal::ONE,
            "engine.fallback_odds must exceed 1.0, got {}",
            self.engine.fallback_odds
        );
        anyhow::ensure!(
            self.engine.kelly_cap_fraction >= Decimal::ZERO
                && self.engine.kelly_cap_fraction <= Decimal::ONE,
            "engine.kelly_cap_fraction must be in [0, 1], got {}",
            self.engine.kelly_cap_fraction
        );
        anyhow::ensure!(
            self.engine.moving_average_days >= 1,
            "engine.moving_average_days must be at least 1"
        );
        Ok(())
    }
}
