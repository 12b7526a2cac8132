//! Stake sizing via the Kelly criterion.
//!
//! Turns a normalized confidence (as win probability) and canonical decimal
//! odds into a recommended stake for a user-supplied bankroll:
//!
//!   f* = (p·d − 1) / (d − 1)
//!
//! The raw fraction is clamped to `[0, cap]`: a negative fraction means no
//! perceived edge and stakes nothing; anything above the cap is silently
//! capped. Degenerate odds (`d = 1`) and non-positive bankrolls produce a
//! zero recommendation rather than an error, because the bankroll is live
//! user input that is transiently invalid while being edited.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::ledger::engine::round_currency;
use crate::normalize::confidence::NormalizedConfidence;
use crate::normalize::odds::CanonicalOdds;

// ---------------------------------------------------------------------------
// Recommendation
// ---------------------------------------------------------------------------

/// Kelly stake recommendation for a single prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StakeRecommendation {
    pub prediction_id: String,
    /// Bankroll as supplied, in whole currency units.
    pub bankroll: i64,
    /// Unclamped Kelly fraction; negative means no perceived edge.
    pub raw_kelly_fraction: Decimal,
    /// Raw fraction clamped to `[0, cap]`.
    pub capped_fraction: Decimal,
    pub recommended_stake: i64,
    /// Profit if the pick wins at the given odds.
    pub potential_profit: i64,
}

// ---------------------------------------------------------------------------
// Advisor
// ---------------------------------------------------------------------------

/// Stake advisor with a configured Kelly cap.
#[derive(Debug, Clone, Copy)]
pub struct StakeAdvisor {
    cap_fraction: Decimal,
}

impl StakeAdvisor {
    pub fn new(cap_fraction: Decimal) -> Self {
        Self {
            cap_fraction: cap_fraction.clamp(Decimal::ZERO, Decimal::ONE),
        }
    }

    /// The configured fraction ceiling.
    pub fn cap_fraction(&self) -> Decimal {
        self.cap_fraction
    }

    /// Compute a stake recommendation.
    pub fn recommend(
        &self,
        prediction_id: &str,
        bankroll: i64,
        confidence: NormalizedConfidence,
        odds: &CanonicalOdds,
    ) -> StakeRecommendation {
        let raw_kelly_fraction = kelly_fraction(confidence.as_probability(), odds.decimal);
        let capped_fraction = raw_kelly_fraction.clamp(Decimal::ZERO, self.cap_fraction);

        if raw_kelly_fraction > self.cap_fraction {
            debug!(
                prediction_id,
                raw = %raw_kelly_fraction,
                cap = %self.cap_fraction,
                "Kelly fraction capped"
            );
        }

        // A non-positive bankroll stakes nothing; the fractions above are
        // still reported so the calculator can show the perceived edge.
        let recommended_stake = if bankroll > 0 {
            round_currency(Decimal::from(bankroll) * capped_fraction)
        } else {
            0
        };
        let potential_profit =
            round_currency(Decimal::from(recommended_stake) * odds.payout_multiple());

        StakeRecommendation {
            prediction_id: prediction_id.to_string(),
            bankroll,
            raw_kelly_fraction,
            capped_fraction,
            recommended_stake,
            potential_profit,
        }
    }
}

/// Raw Kelly fraction `(p·d − 1) / (d − 1)`.
///
/// `d = 1` would pay nothing on a win; there is no edge to size, so the
/// fraction is zero rather than a division error.
fn kelly_fraction(p: Decimal, d: Decimal) -> Decimal {
    if d <= Decimal::ONE {
        return Decimal::ZERO;
    }
    (p * d - Decimal::ONE) / (d - Decimal::ONE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
