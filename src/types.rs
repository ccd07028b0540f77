//! Core types shared by the arbitrage and detector layers
//!
//! Outcomes enter as caller-supplied quotes and are normalised once into
//! `PricedOutcome`, which always carries decimal odds.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::odds::{american_to_decimal, conversion::ensure_decimal};

/// One leg of a market as quoted by a sportsbook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Outcome label (e.g. "Home", "Over 47.5")
    pub label: String,
    /// Quoting sportsbook
    pub source: String,
    pub american_odds: i32,
    /// Exact decimal price if the feed provides one
    #[serde(default)]
    pub decimal_odds: Option<f64>,
}

impl Outcome {
    pub fn new(label: impl Into<String>, source: impl Into<String>, american_odds: i32) -> Self {
        Self {
            label: label.into(),
            source: source.into(),
            american_odds,
            decimal_odds: None,
        }
    }

    pub fn with_decimal(mut self, decimal_odds: f64) -> Self {
        self.decimal_odds = Some(decimal_odds);
        self
    }

    /// Resolve the decimal price: the supplied one if present, else converted.
    pub fn priced(&self) -> Result<PricedOutcome> {
        let decimal_odds = match self.decimal_odds {
            Some(d) => ensure_decimal(d)?,
            None => american_to_decimal(self.american_odds)?,
        };
        Ok(PricedOutcome {
            label: self.label.clone(),
            source: self.source.clone(),
            american_odds: self.american_odds,
            decimal_odds,
        })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {} ({:+})", self.label, self.source, self.american_odds)
    }
}

/// An outcome after normalisation; `decimal_odds` is always valid (> 1.0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedOutcome {
    pub label: String,
    pub source: String,
    pub american_odds: i32,
    pub decimal_odds: f64,
}

impl PricedOutcome {
    pub fn implied_probability(&self) -> f64 {
        1.0 / self.decimal_odds
    }
}

pub fn normalize_outcomes(outcomes: &[Outcome]) -> Result<Vec<PricedOutcome>> {
    outcomes.iter().map(Outcome::priced).collect()
}

/// Per-outcome share of a total stake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StakeAllocation {
    pub label: String,
    pub source: String,
    pub decimal_odds: f64,
    pub stake: f64,
    /// Share of the total, 0-100
    pub stake_percent: f64,
    pub potential_payout: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OddsError;

    #[test]
    fn priced_prefers_supplied_decimal() {
        let o = Outcome::new("Home", "BookA", -110).with_decimal(1.91);
        assert_eq!(o.priced().unwrap().decimal_odds, 1.91);

        let o = Outcome::new("Home", "BookA", 150);
        assert_eq!(o.priced().unwrap().decimal_odds, 2.5);
    }

    #[test]
    fn priced_rejects_degenerate_prices() {
        let o = Outcome::new("Draw", "BookB", 0);
        assert_eq!(o.priced(), Err(OddsError::InvalidAmericanOdds(0)));

        let o = Outcome::new("Draw", "BookB", 200).with_decimal(1.0);
        assert_eq!(o.priced(), Err(OddsError::InvalidDecimalOdds(1.0)));
    }

    #[test]
    fn display_shows_signed_price() {
        let o = Outcome::new("Away", "BookC", 120);
        assert_eq!(o.to_string(), "Away @ BookC (+120)");
    }
}
