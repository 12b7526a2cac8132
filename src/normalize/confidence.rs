//! Confidence normalization.
//!
//! Upstream confidence values arrive in two unit conventions: a fraction in
//! `[0,1]` or a percentage in `(1,100]`. This module resolves the ambiguity
//! once, at ingestion, into a canonical integer percentage wrapped in a type
//! that downstream code cannot re-normalize by accident.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Canonical confidence: an integer percentage in `[0, 100]`.
///
/// The inner value is private; the only way in is `from_raw`, so the `<= 1`
/// unit test can fire at most once per value. Raw `1.0` is read as the
/// fraction 100%, not the percentage 1% (fixed policy; see DESIGN.md).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NormalizedConfidence(u8);

impl NormalizedConfidence {
    /// Resolve a raw upstream confidence value.
    ///
    /// `value <= 1` is treated as a fraction and scaled by 100; anything
    /// else is already a percentage. The result is rounded to the nearest
    /// integer and clamped to `[0, 100]`. Non-finite input is a
    /// data-quality event and collapses to 0.
    pub fn from_raw(value: f64) -> Self {
        if !value.is_finite() {
            warn!(raw = value, "Non-finite confidence, treating as 0");
            return NormalizedConfidence(0);
        }
        let pct = if value <= 1.0 { value * 100.0 } else { value };
        NormalizedConfidence(pct.round().clamp(0.0, 100.0) as u8)
    }

    /// The integer percentage.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Win probability for stake sizing: `value / 100`.
    pub fn as_probability(&self) -> Decimal {
        Decimal::from(self.0) / dec!(100)
    }
}

impl fmt::Display for NormalizedConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl<'de> Deserialize<'de> for NormalizedConfidence {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        Ok(NormalizedConfidence(value.min(100)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
