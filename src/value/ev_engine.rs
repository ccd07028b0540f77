use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, ensure_probability, Result};
use crate::odds::{american_to_decimal, implied_probability};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvQuote {
    pub true_probability: f64,
    pub decimal_odds: f64,
    pub stake: f64,
    /// Net profit if the bet wins
    pub profit_if_win: f64,
    pub ev: f64,
    pub ev_percent: f64,
    pub is_positive_ev: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeQuote {
    pub true_probability: f64,
    pub implied_probability: f64,
    pub edge: f64,
    pub edge_percent: f64,
    pub has_edge: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClvQuote {
    pub your_odds: i32,
    pub closing_odds: i32,
    pub your_implied: f64,
    pub closing_implied: f64,
    pub clv: f64,
    pub clv_percent: f64,
    pub beat_closing_line: bool,
}

pub fn calculate_ev(true_probability: f64, american_odds: i32, stake: f64) -> Result<EvQuote> {
    let p = ensure_probability(true_probability)?;
    let stake = ensure_positive("stake", stake)?;
    let decimal_odds = american_to_decimal(american_odds)?;

    let profit_if_win = stake * (decimal_odds - 1.0);
    let ev = (p * profit_if_win) - ((1.0 - p) * stake);

    Ok(EvQuote {
        true_probability: p,
        decimal_odds,
        stake,
        profit_if_win,
        ev,
        ev_percent: ev / stake * 100.0,
        is_positive_ev: ev > 0.0,
    })
}

pub fn calculate_edge(true_probability: f64, american_odds: i32) -> Result<EdgeQuote> {
    let p = ensure_probability(true_probability)?;
    let implied = implied_probability(american_odds)?;
    let edge = p - implied;

    Ok(EdgeQuote {
        true_probability: p,
        implied_probability: implied,
        edge,
        edge_percent: edge * 100.0,
        has_edge: edge > 0.0,
    })
}

/// Positive when the price taken was longer than where the market closed.
pub fn calculate_clv(your_odds: i32, closing_odds: i32) -> Result<ClvQuote> {
    let your_implied = implied_probability(your_odds)?;
    let closing_implied = implied_probability(closing_odds)?;
    let clv = closing_implied - your_implied;

    Ok(ClvQuote {
        your_odds,
        closing_odds,
        your_implied,
        closing_implied,
        clv,
        clv_percent: clv * 100.0,
        beat_closing_line: clv > 0.0,
    })
}

/// Minimum long-run win rate needed to break even at this price.
pub fn calculate_break_even(american_odds: i32) -> Result<f64> {
    implied_probability(american_odds)
}
