//! Odds normalization.
//!
//! Converts raw odds strings in American (`+150`, `-110`), decimal (`1.91`)
//! or fractional (`10/11`) notation into one canonical decimal form, and
//! formats canonical odds back into any notation for presentation.
//!
//! Unparseable or out-of-range input never raises: it is replaced by a
//! configured fallback decimal and flagged as a data-quality event, because
//! downstream displays must never be blocked by dirty odds.

use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Ceiling for plausible decimal odds. Anything above this is treated as
/// dirty data and replaced by the fallback.
const MAX_DECIMAL_ODDS: Decimal = dec!(1000);

/// Largest denominator considered when rendering fractional odds.
const MAX_FRACTION_DENOMINATOR: u64 = 100;

// ---------------------------------------------------------------------------
// Notation
// ---------------------------------------------------------------------------

/// Odds notation, as detected on input or selected for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OddsNotation {
    American,
    Decimal,
    Fractional,
}

impl fmt::Display for OddsNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OddsNotation::American => write!(f, "american"),
            OddsNotation::Decimal => write!(f, "decimal"),
            OddsNotation::Fractional => write!(f, "fractional"),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a raw odds string failed strict parsing.
///
/// Never escapes the module boundary as a hard error: `OddsNormalizer`
/// recovers every variant with the configured fallback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OddsParseError {
    #[error("empty odds string")]
    Empty,
    #[error("unrecognized odds format: {0:?}")]
    Unrecognized(String),
    #[error("odds out of range: {0}")]
    OutOfRange(Decimal),
}

// ---------------------------------------------------------------------------
// Canonical odds
// ---------------------------------------------------------------------------

/// Decimal odds value with the notation it was detected in.
///
/// Invariant: `decimal >= 1.0`. The notation tag exists for round-trip
/// display only and never feeds back into ledger math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CanonicalOdds {
    pub decimal: Decimal,
    pub notation: OddsNotation,
    /// True when the value is the configured fallback rather than parsed
    /// input — the data-quality marker surfaced to observability.
    pub fallback: bool,
}

impl CanonicalOdds {
    /// Wrap an already-decimal value, clamping below 1.0 to 1.0.
    pub fn from_decimal(decimal: Decimal) -> Self {
        CanonicalOdds {
            decimal: decimal.max(Decimal::ONE),
            notation: OddsNotation::Decimal,
            fallback: false,
        }
    }

    /// Net profit per unit staked: `decimal − 1`.
    pub fn payout_multiple(&self) -> Decimal {
        self.decimal - Decimal::ONE
    }

    /// Render in the notation the value was originally detected in.
    pub fn display(&self) -> String {
        self.display_as(self.notation)
    }

    /// Render in an arbitrary notation. Pure presentation: the returned
    /// string is never parsed back into ledger math.
    pub fn display_as(&self, notation: OddsNotation) -> String {
        match notation {
            OddsNotation::Decimal => format!("{:.2}", self.decimal),
            OddsNotation::American => self.to_american(),
            OddsNotation::Fractional => self.to_fractional(),
        }
    }

    fn to_american(&self) -> String {
        if self.decimal >= dec!(2.0) {
            let plus = ((self.decimal - Decimal::ONE) * dec!(100))
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .normalize();
            format!("+{plus}")
        } else {
            // Degenerate odds near 1.0 would need an infinite line; clamp
            // the edge so the favourite side caps at -10000.
            let edge = (self.decimal - Decimal::ONE).max(dec!(0.01));
            let minus = (dec!(100) / edge)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .normalize();
            format!("-{minus}")
        }
    }

    fn to_fractional(&self) -> String {
        let frac = self.decimal - Decimal::ONE;
        if frac <= Decimal::ZERO {
            return "0/1".to_string();
        }

        // Best rational approximation with denominator <= 100; smallest
        // denominator wins ties so exact inputs round-trip ("10/11").
        let mut best = (1u64, 1u64);
        let mut best_err = Decimal::MAX;
        for denom in 1..=MAX_FRACTION_DENOMINATOR {
            let scaled = frac * Decimal::from(denom);
            let numer = scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
            let err = (scaled - numer).abs();
            if err < best_err {
                best_err = err;
                best = (numer.to_u64().unwrap_or(1), denom);
                if err.is_zero() {
                    break;
                }
            }
        }

        let (numer, denom) = best;
        let divisor = gcd(numer, denom);
        format!("{}/{}", numer / divisor, denom / divisor)
    }
}

impl fmt::Display for CanonicalOdds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a.max(1)
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Strict parse of a raw odds string. Detects the notation and converts:
/// American `+n` → `1 + n/100`, American `-m` → `1 + 100/m`,
/// fractional `a/b` → `1 + a/b`, decimal passes through when `> 1.0`.
pub fn parse_odds(raw: &str) -> Result<CanonicalOdds, OddsParseError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(OddsParseError::Empty);
    }

    let (decimal, notation) = if let Some(rest) = s.strip_prefix('+') {
        let line: u64 = rest
            .parse()
            .map_err(|_| OddsParseError::Unrecognized(s.to_string()))?;
        (
            Decimal::ONE + Decimal::from(line) / dec!(100),
            OddsNotation::American,
        )
    } else if let Some(rest) = s.strip_prefix('-') {
        let line: u64 = rest
            .parse()
            .map_err(|_| OddsParseError::Unrecognized(s.to_string()))?;
        if line == 0 {
            return Err(OddsParseError::Unrecognized(s.to_string()));
        }
        (
            Decimal::ONE + dec!(100) / Decimal::from(line),
            OddsNotation::American,
        )
    } else if let Some((numer, denom)) = s.split_once('/') {
        let numer: u64 = numer
            .trim()
            .parse()
            .map_err(|_| OddsParseError::Unrecognized(s.to_string()))?;
        let denom: u64 = denom
            .trim()
            .parse()
            .map_err(|_| OddsParseError::Unrecognized(s.to_string()))?;
        if denom == 0 {
            return Err(OddsParseError::Unrecognized(s.to_string()));
        }
        (
            Decimal::ONE + Decimal::from(numer) / Decimal::from(denom),
            OddsNotation::Fractional,
        )
    } else {
        let value = s
            .parse::<Decimal>()
            .map_err(|_| OddsParseError::Unrecognized(s.to_string()))?;
        (value, OddsNotation::Decimal)
    };

    if decimal <= Decimal::ONE || decimal > MAX_DECIMAL_ODDS {
        return Err(OddsParseError::OutOfRange(decimal));
    }

    Ok(CanonicalOdds {
        decimal,
        notation,
        fallback: false,
    })
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Total odds normalizer: always returns canonical odds, substituting the
/// configured fallback for anything `parse_odds` rejects.
#[derive(Debug, Clone, Copy)]
pub struct OddsNormalizer {
    fallback: Decimal,
}

impl Default for OddsNormalizer {
    fn default() -> Self {
        Self {
            fallback: dec!(1.91),
        }
    }
}

impl OddsNormalizer {
    pub fn new(fallback: Decimal) -> Self {
        Self {
            fallback: fallback.max(Decimal::ONE),
        }
    }

    /// Normalize a raw odds string. Never fails; malformed input yields the
    /// fallback decimal, logged as a data-quality event.
    pub fn normalize(&self, raw: &str) -> CanonicalOdds {
        match parse_odds(raw) {
            Ok(odds) => odds,
            Err(error) => {
                warn!(
                    raw = %raw,
                    %error,
                    fallback = %self.fallback,
                    "Malformed odds, substituting fallback"
                );
                CanonicalOdds {
                    decimal: self.fallback,
                    notation: OddsNotation::Decimal,
                    fallback: true,
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_american_plus() {
        let odds = parse_odds("+150").unwrap();
        assert_eq!(odds.decimal, dec!(2.50));
        assert_eq!(odds.notation, OddsNotation::American);
        assert!(!odds.fallback);
    }

    #[test]
    fn test_american_minus() {
        let odds = parse_odds("-150").unwrap();
        assert_eq!(odds.decimal.round_dp(4), dec!(1.6667));

        let odds = parse_odds("-110").unwrap();
        assert_eq!(odds.decimal.round_dp(4), dec!(1.9091));
    }

    #[test]
    fn test_decimal_passthrough() {
        let odds = parse_odds("1.91").unwrap();
        assert_eq!(odds.decimal, dec!(1.91));
        assert_eq!(odds.notation, OddsNotation::Decimal);
    }

    #[test]
    fn test_fractional() {
        let odds = parse_odds("10/11").unwrap();
        assert_eq!(odds.decimal.round_dp(4), dec!(1.9091));
        assert_eq!(odds.notation, OddsNotation::Fractional);

        let odds = parse_odds("3/2").unwrap();
        assert_eq!(odds.decimal, dec!(2.5));
    }

    #[test]
    fn test_whitespace_tolerated() {
        assert_eq!(parse_odds("  +150  ").unwrap().decimal, dec!(2.50));
        assert_eq!(parse_odds("10 / 11").unwrap().decimal.round_dp(4), dec!(1.9091));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_odds(""), Err(OddsParseError::Empty));
        assert!(matches!(
            parse_odds("N/A"),
            Err(OddsParseError::Unrecognized(_))
        ));
        assert!(matches!(
            parse_odds("odds soon"),
            Err(OddsParseError::Unrecognized(_))
        ));
        assert!(matches!(
            parse_odds("+abc"),
            Err(OddsParseError::Unrecognized(_))
        ));
        assert!(matches!(
            parse_odds("5/0"),
            Err(OddsParseError::Unrecognized(_))
        ));
    }

    #[test]
    fn test_rejects_out_of_range() {
        // Decimal odds at or below 1.0 pay nothing; above 1000 is dirty data.
        assert!(matches!(
            parse_odds("1.0"),
            Err(OddsParseError::OutOfRange(_))
        ));
        assert!(matches!(
            parse_odds("0.5"),
            Err(OddsParseError::OutOfRange(_))
        ));
        assert!(matches!(
            parse_odds("+0"),
            Err(OddsParseError::OutOfRange(_))
        ));
        assert!(matches!(
            parse_odds("5000.0"),
            Err(OddsParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_normalizer_substitutes_fallback() {
        let normalizer = OddsNormalizer::default();
        let odds = normalizer.normalize("N/A");
        assert_eq!(odds.decimal, dec!(1.91));
        assert!(odds.fallback);
        assert_eq!(odds.notation, OddsNotation::Decimal);
    }

    #[test]
    fn test_normalizer_passes_clean_input() {
        let normalizer = OddsNormalizer::new(dec!(2.00));
        let odds = normalizer.normalize("+150");
        assert_eq!(odds.decimal, dec!(2.50));
        assert!(!odds.fallback);
    }

    #[test]
    fn test_normalizer_custom_fallback() {
        let normalizer = OddsNormalizer::new(dec!(2.00));
        assert_eq!(normalizer.normalize("??").decimal, dec!(2.00));
    }

    #[test]
    fn test_display_decimal() {
        let odds = parse_odds("1.91").unwrap();
        assert_eq!(odds.display_as(OddsNotation::Decimal), "1.91");
        assert_eq!(parse_odds("+150").unwrap().display_as(OddsNotation::Decimal), "2.50");
    }

    #[test]
    fn test_display_american_roundtrip() {
        assert_eq!(parse_odds("+150").unwrap().display_as(OddsNotation::American), "+150");
        assert_eq!(parse_odds("-110").unwrap().display_as(OddsNotation::American), "-110");
        assert_eq!(parse_odds("-150").unwrap().display_as(OddsNotation::American), "-150");
        // Even money boundary: 2.00 is +100.
        assert_eq!(parse_odds("2.0").unwrap().display_as(OddsNotation::American), "+100");
    }

    #[test]
    fn test_display_fractional_roundtrip() {
        assert_eq!(
            parse_odds("10/11").unwrap().display_as(OddsNotation::Fractional),
            "10/11"
        );
        assert_eq!(
            parse_odds("2.5").unwrap().display_as(OddsNotation::Fractional),
            "3/2"
        );
        assert_eq!(
            parse_odds("1.91").unwrap().display_as(OddsNotation::Fractional),
            "91/100"
        );
    }

    #[test]
    fn test_display_uses_detected_notation() {
        assert_eq!(parse_odds("+150").unwrap().display(), "+150");
        assert_eq!(parse_odds("1.91").unwrap().display(), "1.91");
        assert_eq!(parse_odds("10/11").unwrap().display(), "10/11");
        // Fallback values carry no detected notation; they render as decimal.
        let odds = OddsNormalizer::default().normalize("N/A");
        assert_eq!(odds.display(), "1.91");
    }

    #[test]
    fn test_from_decimal_clamps() {
        let odds = CanonicalOdds::from_decimal(dec!(0.80));
        assert_eq!(odds.decimal, Decimal::ONE);
        assert_eq!(odds.payout_multiple(), Decimal::ZERO);
    }

    #[test]
    fn test_payout_multiple() {
        assert_eq!(parse_odds("+150").unwrap().payout_multiple(), dec!(1.50));
        assert_eq!(parse_odds("1.91").unwrap().payout_multiple(), dec!(0.91));
    }

    #[test]
    fn test_notation_serde() {
        let json = serde_json::to_string(&OddsNotation::Fractional).unwrap();
        assert_eq!(json, "\"fractional\"");
        let parsed: OddsNotation = serde_json::from_str("\"american\"").unwrap();
        assert_eq!(parsed, OddsNotation::American);
    }
}
