//! Shared types for the PICKTALLY engine.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that the normalize, ledger,
//! and analytics modules can depend on them without circular references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Sport
// ---------------------------------------------------------------------------

/// Sport discipline of a prediction.
///
/// Upstream feeds use inconsistent labels ("nba", "basketball",
/// "football_eu", ...) so parsing is case-insensitive and falls back to
/// `Other` instead of erroring — dirty labels must never block ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sport {
    Soccer,
    Basketball,
    AmericanFootball,
    Baseball,
    IceHockey,
    Tennis,
    Other,
}

impl Sport {
    /// All known sports (useful for iteration).
    pub const ALL: &'static [Sport] = &[
        Sport::Soccer,
        Sport::Basketball,
        Sport::AmericanFootball,
        Sport::Baseball,
        Sport::IceHockey,
        Sport::Tennis,
        Sport::Other,
    ];

    /// Resolve an upstream label to a sport. Unknown labels map to `Other`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "soccer" | "football" | "football_eu" => Sport::Soccer,
            "basketball" | "nba" => Sport::Basketball,
            "american_football" | "american football" | "nfl" => Sport::AmericanFootball,
            "baseball" | "mlb" => Sport::Baseball,
            "ice_hockey" | "ice hockey" | "hockey" | "nhl" => Sport::IceHockey,
            "tennis" => Sport::Tennis,
            _ => Sport::Other,
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sport::Soccer => write!(f, "Soccer"),
            Sport::Basketball => write!(f, "Basketball"),
            Sport::AmericanFootball => write!(f, "American Football"),
            Sport::Baseball => write!(f, "Baseball"),
            Sport::IceHockey => write!(f, "Ice Hockey"),
            Sport::Tennis => write!(f, "Tennis"),
            Sport::Other => write!(f, "Other"),
        }
    }
}

impl std::str::FromStr for Sport {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Sport::from_label(s))
    }
}

impl<'de> Deserialize<'de> for Sport {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(Sport::from_label(&label))
    }
}

// ---------------------------------------------------------------------------
// Game result
// ---------------------------------------------------------------------------

/// Outcome of a graded prediction.
///
/// The lifecycle is owned upstream: `pending → {win, loss}`, at most once.
/// The engine never mutates a result — if upstream re-grades an event,
/// everything is recomputed from the new snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    #[default]
    Pending,
    Win,
    Loss,
}

impl GameResult {
    /// Whether the prediction has been graded (win or loss).
    pub fn is_graded(&self) -> bool {
        matches!(self, GameResult::Win | GameResult::Loss)
    }

    /// Resolve an upstream result label. Anything that is not a win or a
    /// loss ("void", "postponed", typos) stays pending — ungraded, not
    /// wrong.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "win" | "won" | "w" => GameResult::Win,
            "loss" | "lost" | "lose" | "l" => GameResult::Loss,
            _ => GameResult::Pending,
        }
    }
}

impl<'de> Deserialize<'de> for GameResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(GameResult::from_label(&label))
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::Pending => write!(f, "PENDING"),
            GameResult::Win => write!(f, "WIN"),
            GameResult::Loss => write!(f, "LOSS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Prediction record
// ---------------------------------------------------------------------------

/// A single prediction+outcome record as delivered by the upstream feed.
///
/// Raw fields are intentionally left in their ambiguous upstream encoding:
/// `raw_odds` may be American (`+150`), decimal (`1.91`) or fractional
/// (`10/11`); `raw_confidence` may be a fraction in `[0,1]` or a percentage
/// in `(1,100]`. Normalization happens exactly once, at the engine boundary
/// (see the `normalize` module).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub id: String,
    pub sport: Sport,
    pub home_team: String,
    pub away_team: String,
    /// Scheduled kickoff / tip-off instant.
    pub game_time: DateTime<Utc>,
    /// The published pick, e.g. "Arsenal ML" or "Over 2.5".
    pub pick: String,
    /// Ambiguous unit: fraction in [0,1] or percentage in (1,100].
    pub raw_confidence: f64,
    /// Ambiguous notation: American, decimal or fractional.
    pub raw_odds: String,
    #[serde(default)]
    pub result: GameResult,
}

impl PredictionRecord {
    /// Whether this record carries a graded outcome.
    pub fn is_graded(&self) -> bool {
        self.result.is_graded()
    }

    /// "Home vs Away" label for logs and the export table.
    pub fn matchup(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }

    /// Helper to build a test record with sensible defaults.
    #[cfg(test)]
    pub fn sample() -> Self {
        PredictionRecord {
            id: "pred-001".to_string(),
            sport: Sport::Soccer,
            home_team: "Arsenal".to_string(),
            away_team: "Chelsea".to_string(),
            game_time: "2026-03-07T15:00:00Z".parse().unwrap(),
            pick: "Arsenal ML".to_string(),
            raw_confidence: 0.73,
            raw_odds: "+150".to_string(),
            result: GameResult::Win,
        }
    }
}

impl fmt::Display for PredictionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} | {} @ {} ({}) — {}",
            self.sport,
            self.matchup(),
            self.pick,
            self.raw_odds,
            self.game_time.format("%Y-%m-%d"),
            self.result,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
