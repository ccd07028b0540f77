use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, ensure_probability, OddsError, Result};
use crate::odds::american_to_decimal;

/// Quarter Kelly.
pub const DEFAULT_KELLY_FRACTION: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KellyQuote {
    pub decimal_odds: f64,
    /// Full-Kelly fraction of bankroll, floored at zero
    pub kelly_fraction: f64,
    pub kelly_percent: f64,
    pub full_kelly_amount: f64,
    /// Multiplier applied to full Kelly
    pub fraction: f64,
    pub recommended_bet: f64,
}

pub fn calculate_kelly(
    true_probability: f64,
    american_odds: i32,
    bankroll: f64,
    fraction: f64,
) -> Result<KellyQuote> {
    let p = ensure_probability(true_probability)?;
    let bankroll = ensure_positive("bankroll", bankroll)?;
    let fraction = ensure_fraction(fraction)?;
    let decimal_odds = american_to_decimal(american_odds)?;

    // f* = (d*p - 1) / (d - 1); never size a negative edge
    let f_raw = (decimal_odds * p - 1.0) / (decimal_odds - 1.0);
    let kelly_fraction = f_raw.max(0.0);
    let full_kelly_amount = bankroll * kelly_fraction;

    Ok(KellyQuote {
        decimal_odds,
        kelly_fraction,
        kelly_percent: kelly_fraction * 100.0,
        full_kelly_amount,
        fraction,
        recommended_bet: full_kelly_amount * fraction,
    })
}

pub(crate) fn ensure_fraction(fraction: f64) -> Result<f64> {
    if fraction.is_finite() && fraction > 0.0 && fraction <= 1.0 {
        Ok(fraction)
    } else {
        Err(OddsError::InvalidFraction(fraction))
    }
}
