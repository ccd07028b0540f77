//! Conversions between American odds, decimal odds and implied probability.
//!
//! American results are rounded with `f64::round`, so exact half-integer
//! ties move away from zero (e.g. decimal 1.8 gives -125, probability
//! 0.6 gives -150). Prices too long to fit an `i32` are rejected.

use crate::error::{ensure_open_probability, OddsError, Result};

fn ensure_american(american: i32) -> Result<f64> {
    if american == 0 {
        return Err(OddsError::InvalidAmericanOdds(american));
    }
    Ok(american as f64)
}

pub(crate) fn ensure_decimal(decimal: f64) -> Result<f64> {
    if !decimal.is_finite() || decimal <= 1.0 {
        return Err(OddsError::InvalidDecimalOdds(decimal));
    }
    Ok(decimal)
}

/// Rounds to the nearest whole American price, `None` when out of range.
fn round_american(exact: f64) -> Option<i32> {
    let rounded = exact.round();
    if rounded.is_finite() && rounded >= i32::MIN as f64 && rounded <= i32::MAX as f64 {
        Some(rounded as i32)
    } else {
        None
    }
}

pub fn american_to_decimal(american: i32) -> Result<f64> {
    let a = ensure_american(american)?;
    if a > 0.0 {
        Ok(a / 100.0 + 1.0)
    } else {
        Ok(100.0 / a.abs() + 1.0)
    }
}

pub fn decimal_to_american(decimal: f64) -> Result<i32> {
    let d = ensure_decimal(decimal)?;
    let exact = if d >= 2.0 {
        (d - 1.0) * 100.0
    } else {
        -100.0 / (d - 1.0)
    };
    round_american(exact).ok_or(OddsError::InvalidDecimalOdds(decimal))
}

/// Probability baked into a quoted price, margin included.
pub fn implied_probability(american: i32) -> Result<f64> {
    let a = ensure_american(american)?;
    if a > 0.0 {
        Ok(100.0 / (a + 100.0))
    } else {
        Ok(a.abs() / (a.abs() + 100.0))
    }
}

/// Same quantity from decimal odds, `1 / decimal`.
pub fn implied_probability_from_decimal(decimal: f64) -> Result<f64> {
    Ok(1.0 / ensure_decimal(decimal)?)
}

/// Fair American price for a probability. Favourites (p >= 0.5) come out
/// negative, so an even 0.5 maps to -100.
pub fn probability_to_american(probability: f64) -> Result<i32> {
    let p = ensure_open_probability(probability)?;
    let exact = if p >= 0.5 {
        -100.0 * p / (1.0 - p)
    } else {
        100.0 * (1.0 - p) / p
    };
    round_american(exact).ok_or(OddsError::InvalidProbability {
        value: probability,
        expected: "(0, 1) with a price inside i32 range",
    })
}
