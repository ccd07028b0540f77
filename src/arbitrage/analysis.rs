//! Full arbitrage evaluation: normalise, detect, distribute, price, grade.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::detection::{detect_arbitrage, ArbitrageDetection};
use super::stakes::{calculate_arbitrage_stakes, profit_from_stakes, ArbitrageProfit};
use crate::error::{ensure_outcome_count, ensure_positive, Result};
use crate::types::{normalize_outcomes, Outcome, PricedOutcome, StakeAllocation};

const EXCELLENT_PROFIT_PCT: f64 = 3.0;
const GOOD_PROFIT_PCT: f64 = 2.0;
const FAIR_PROFIT_PCT: f64 = 1.0;

const THIN_MARGIN_PCT: f64 = 1.0;
const MAX_SIMPLE_OUTCOMES: usize = 3;
const MAX_ODDS_RATIO: f64 = 3.0;

pub const WARN_THIN_MARGIN: &str =
    "Profit margin below 1%: consider transaction costs before placing";
pub const WARN_MANY_OUTCOMES: &str =
    "More than 3 outcomes: execution complexity increases the risk of a missed leg";
pub const WARN_ODDS_DISPARITY: &str = "Large odds disparity between outcomes: verify accuracy";
pub const WARN_SAME_SPORTSBOOK: &str =
    "All outcomes come from the same sportsbook: not true arbitrage";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArbitrageQuality {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl ArbitrageQuality {
    pub fn from_profit_percent(profit_percent: f64) -> Self {
        if profit_percent >= EXCELLENT_PROFIT_PCT {
            ArbitrageQuality::Excellent
        } else if profit_percent >= GOOD_PROFIT_PCT {
            ArbitrageQuality::Good
        } else if profit_percent >= FAIR_PROFIT_PCT {
            ArbitrageQuality::Fair
        } else {
            ArbitrageQuality::Poor
        }
    }
}

impl fmt::Display for ArbitrageQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArbitrageQuality::Poor => write!(f, "poor"),
            ArbitrageQuality::Fair => write!(f, "fair"),
            ArbitrageQuality::Good => write!(f, "good"),
            ArbitrageQuality::Excellent => write!(f, "excellent"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageAnalysis {
    pub outcomes: Vec<PricedOutcome>,
    pub total_stake: f64,
    pub detection: ArbitrageDetection,
    pub stakes: Vec<StakeAllocation>,
    pub profit: ArbitrageProfit,
    pub quality: ArbitrageQuality,
    pub warnings: Vec<String>,
}

impl ArbitrageAnalysis {
    pub fn is_arbitrage(&self) -> bool {
        self.detection.is_arbitrage
    }
}

pub fn analyze_arbitrage(outcomes: &[Outcome], total_stake: f64) -> Result<ArbitrageAnalysis> {
    ensure_outcome_count(outcomes.len())?;
    let total_stake = ensure_positive("total stake", total_stake)?;

    let priced = normalize_outcomes(outcomes)?;
    let detection = detect_arbitrage(&priced)?;
    let stakes = calculate_arbitrage_stakes(&priced, total_stake)?;
    let profit = profit_from_stakes(&stakes, total_stake);
    let quality = ArbitrageQuality::from_profit_percent(profit.profit_percent);
    let warnings = collect_warnings(&priced, &profit);

    tracing::debug!(
        outcomes = priced.len(),
        book_pct = detection.arbitrage_percent,
        profit_pct = profit.profit_percent,
        %quality,
        warnings = warnings.len(),
        "arbitrage analysis"
    );

    Ok(ArbitrageAnalysis {
        outcomes: priced,
        total_stake,
        detection,
        stakes,
        profit,
        quality,
        warnings,
    })
}

fn collect_warnings(outcomes: &[PricedOutcome], profit: &ArbitrageProfit) -> Vec<String> {
    let mut warnings = Vec::new();

    if profit.profit_percent < THIN_MARGIN_PCT {
        warnings.push(WARN_THIN_MARGIN.to_string());
    }

    if outcomes.len() > MAX_SIMPLE_OUTCOMES {
        warnings.push(WARN_MANY_OUTCOMES.to_string());
    }

    let (min_odds, max_odds) = outcomes
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), o| {
            (lo.min(o.decimal_odds), hi.max(o.decimal_odds))
        });
    if max_odds / min_odds > MAX_ODDS_RATIO {
        warnings.push(WARN_ODDS_DISPARITY.to_string());
    }

    if let Some(first) = outcomes.first() {
        if outcomes.iter().all(|o| o.source == first.source) {
            warnings.push(WARN_SAME_SPORTSBOOK.to_string());
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OddsError;

    #[test]
    fn quality_thresholds() {
        assert_eq!(ArbitrageQuality::from_profit_percent(3.0), ArbitrageQuality::Excellent);
        assert_eq!(ArbitrageQuality::from_profit_percent(2.5), ArbitrageQuality::Good);
        assert_eq!(ArbitrageQuality::from_profit_percent(1.0), ArbitrageQuality::Fair);
        assert_eq!(ArbitrageQuality::from_profit_percent(0.99), ArbitrageQuality::Poor);
        assert_eq!(ArbitrageQuality::from_profit_percent(-4.0), ArbitrageQuality::Poor);
    }

    #[test]
    fn clean_two_way_arbitrage() {
        let outcomes = vec![
            Outcome::new("Home", "BookA", 120),
            Outcome::new("Away", "BookB", 120),
        ];
        let a = analyze_arbitrage(&outcomes, 1_000.0).unwrap();
        assert!(a.is_arbitrage());
        assert_eq!(a.quality, ArbitrageQuality::Excellent);
        assert!((a.profit.profit - 100.0).abs() < 1e-9);
        assert!(a.warnings.is_empty(), "{:?}", a.warnings);
    }

    #[test]
    fn supplied_decimal_odds_are_used() {
        let outcomes = vec![
            Outcome::new("Home", "BookA", 100).with_decimal(2.05),
            Outcome::new("Away", "BookB", 100).with_decimal(2.05),
        ];
        let a = analyze_arbitrage(&outcomes, 100.0).unwrap();
        assert!(a.is_arbitrage());
        assert!((a.profit.profit_percent - 2.5).abs() < 1e-9);
        assert_eq!(a.quality, ArbitrageQuality::Good);
    }

    #[test]
    fn all_warnings_can_fire_together() {
        let outcomes = vec![
            Outcome::new("A", "BookA", -400),
            Outcome::new("B", "BookA", 900),
            Outcome::new("C", "BookA", 1_200),
            Outcome::new("D", "BookA", 1_500),
        ];
        let a = analyze_arbitrage(&outcomes, 500.0).unwrap();
        assert!(!a.is_arbitrage());
        assert_eq!(a.quality, ArbitrageQuality::Poor);
        assert_eq!(
            a.warnings,
            vec![
                WARN_THIN_MARGIN.to_string(),
                WARN_MANY_OUTCOMES.to_string(),
                WARN_ODDS_DISPARITY.to_string(),
                WARN_SAME_SPORTSBOOK.to_string(),
            ]
        );
    }

    #[test]
    fn rejects_single_outcome_and_zero_stake() {
        let one = vec![Outcome::new("Home", "BookA", 120)];
        assert_eq!(
            analyze_arbitrage(&one, 1_000.0),
            Err(OddsError::InsufficientOutcomes {
                required: 2,
                actual: 1
            })
        );

        let two = vec![
            Outcome::new("Home", "BookA", 120),
            Outcome::new("Away", "BookB", 120),
        ];
        assert!(matches!(
            analyze_arbitrage(&two, 0.0),
            Err(OddsError::InvalidStake { .. })
        ));
    }

    #[test]
    fn quality_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ArbitrageQuality::Excellent).unwrap(),
            "\"excellent\""
        );
    }
}
