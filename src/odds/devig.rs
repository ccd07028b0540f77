//! Vig removal by proportional normalisation.
//!
//! The caller guarantees the prices cover every outcome of one event. A book
//! at or under 100% is still normalised; the result is then a no-op or a
//! slight inflation.

use serde::{Deserialize, Serialize};

use super::conversion::implied_probability;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevigQuote {
    /// Implied probability per outcome, in input order
    pub implied: Vec<f64>,
    /// Vig-free probability per outcome, sums to 1
    pub fair: Vec<f64>,
    pub total_implied: f64,
    /// Overround, `total_implied - 1`
    pub vig: f64,
}

impl DevigQuote {
    pub fn vig_percent(&self) -> f64 {
        self.vig * 100.0
    }
}

/// Normalises any number of prices. Two- and three-way markets go through
/// the named wrappers below.
pub fn remove_vig(american: &[i32]) -> Result<DevigQuote> {
    let implied = american
        .iter()
        .map(|&a| implied_probability(a))
        .collect::<Result<Vec<_>>>()?;
    let total_implied: f64 = implied.iter().sum();
    let fair = implied.iter().map(|p| p / total_implied).collect();

    Ok(DevigQuote {
        implied,
        fair,
        total_implied,
        vig: total_implied - 1.0,
    })
}

pub fn remove_vig_two_way(odds1: i32, odds2: i32) -> Result<DevigQuote> {
    remove_vig(&[odds1, odds2])
}

pub fn remove_vig_three_way(odds1: i32, odds2: i32, odds3: i32) -> Result<DevigQuote> {
    remove_vig(&[odds1, odds2, odds3])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OddsError;

    #[test]
    fn standard_juice_splits_evenly() {
        let q = remove_vig_two_way(-110, -110).unwrap();
        assert!((q.fair[0] - 0.5).abs() < 1e-12);
        assert!((q.fair[1] - 0.5).abs() < 1e-12);
        assert!((q.vig - 0.047_619).abs() < 1e-5);
        assert!((q.vig_percent() - 4.76).abs() < 0.01);
    }

    #[test]
    fn fair_probabilities_sum_to_one() {
        let cases: [&[i32]; 4] = [&[-150, 130], &[-300, 250], &[150, 240, 190], &[-120, 280, 320]];
        for case in cases {
            let q = remove_vig(case).unwrap();
            let sum: f64 = q.fair.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "{case:?} sums to {sum}");
        }
    }

    #[test]
    fn three_way_keeps_order_and_favourite() {
        let q = remove_vig_three_way(-120, 280, 320).unwrap();
        assert_eq!(q.fair.len(), 3);
        assert!(q.fair[0] > q.fair[1] && q.fair[1] > q.fair[2]);
        assert!(q.vig > 0.0);
    }

    #[test]
    fn underround_book_still_normalised() {
        let q = remove_vig_two_way(120, 120).unwrap();
        assert!(q.vig < 0.0);
        assert!((q.fair[0] - 0.5).abs() < 1e-12);
        assert!(q.fair[0] > q.implied[0]);
    }

    #[test]
    fn zero_odds_propagate() {
        assert_eq!(
            remove_vig_two_way(0, -110),
            Err(OddsError::InvalidAmericanOdds(0))
        );
    }
}
