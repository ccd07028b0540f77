use serde::{Deserialize, Serialize};

use crate::error::{ensure_outcome_count, Result};
use crate::types::PricedOutcome;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageDetection {
    pub is_arbitrage: bool,
    /// Sum of implied probabilities, as a percentage
    pub arbitrage_percent: f64,
    pub implied_probabilities: Vec<f64>,
}

impl ArbitrageDetection {
    /// Guaranteed return per unit staked implied by the book, in percent.
    pub fn margin_percent(&self) -> f64 {
        100.0 - self.arbitrage_percent
    }
}

/// An arbitrage exists iff the combined book is under 100%.
pub fn detect_arbitrage(outcomes: &[PricedOutcome]) -> Result<ArbitrageDetection> {
    ensure_outcome_count(outcomes.len())?;

    let implied_probabilities: Vec<f64> = outcomes
        .iter()
        .map(PricedOutcome::implied_probability)
        .collect();
    let arbitrage_percent = implied_probabilities.iter().sum::<f64>() * 100.0;

    Ok(ArbitrageDetection {
        is_arbitrage: arbitrage_percent < 100.0,
        arbitrage_percent,
        implied_probabilities,
    })
}
