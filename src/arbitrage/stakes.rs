//! Stake distribution for a covered market.
//!
//! Stakes proportional to inverse decimal odds are the unique split that
//! pays the same amount whichever outcome lands.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::analysis::ArbitrageAnalysis;
use crate::error::{ensure_outcome_count, ensure_positive, Result};
use crate::types::{PricedOutcome, StakeAllocation};

/// Ceiling used when no sportsbook limit applies to any leg.
pub const DEFAULT_MAX_STAKE: f64 = 10_000.0;
pub const DEFAULT_LIMIT_LABEL: &str = "default limit";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageProfit {
    pub total_stake: f64,
    pub average_payout: f64,
    pub profit: f64,
    pub profit_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxStakeQuote {
    pub max_total_stake: f64,
    /// Sportsbook whose limit binds, or `DEFAULT_LIMIT_LABEL`
    pub limiting_sportsbook: String,
    pub stakes: Vec<StakeAllocation>,
    pub profit: ArbitrageProfit,
}

pub fn calculate_arbitrage_stakes(
    outcomes: &[PricedOutcome],
    total_stake: f64,
) -> Result<Vec<StakeAllocation>> {
    ensure_outcome_count(outcomes.len())?;
    let total_stake = ensure_positive("total stake", total_stake)?;

    let inverse_sum: f64 = outcomes.iter().map(|o| 1.0 / o.decimal_odds).sum();

    Ok(outcomes
        .iter()
        .map(|o| {
            let stake = total_stake * (1.0 / o.decimal_odds) / inverse_sum;
            StakeAllocation {
                label: o.label.clone(),
                source: o.source.clone(),
                decimal_odds: o.decimal_odds,
                stake,
                stake_percent: stake / total_stake * 100.0,
                potential_payout: stake * o.decimal_odds,
            }
        })
        .collect())
}

pub fn calculate_arbitrage_profit(
    outcomes: &[PricedOutcome],
    total_stake: f64,
) -> Result<ArbitrageProfit> {
    let stakes = calculate_arbitrage_stakes(outcomes, total_stake)?;
    Ok(profit_from_stakes(&stakes, total_stake))
}

pub(crate) fn profit_from_stakes(stakes: &[StakeAllocation], total_stake: f64) -> ArbitrageProfit {
    let average_payout =
        stakes.iter().map(|s| s.potential_payout).sum::<f64>() / stakes.len() as f64;
    let profit = average_payout - total_stake;

    ArbitrageProfit {
        total_stake,
        average_payout,
        profit,
        profit_percent: profit / total_stake * 100.0,
    }
}

/// Largest total stake every leg's sportsbook will accept.
///
/// Each limited leg caps the total at `limit / stake_share`; the smallest
/// cap wins and the allocation is recomputed at that total. Limits must be
/// positive.
pub fn calculate_max_stake(
    opportunity: &ArbitrageAnalysis,
    sportsbook_limits: &HashMap<String, f64>,
) -> Result<MaxStakeQuote> {
    calculate_max_stake_with_ceiling(opportunity, sportsbook_limits, DEFAULT_MAX_STAKE)
}

/// As `calculate_max_stake`, with `ceiling` used when no limit applies.
pub fn calculate_max_stake_with_ceiling(
    opportunity: &ArbitrageAnalysis,
    sportsbook_limits: &HashMap<String, f64>,
    ceiling: f64,
) -> Result<MaxStakeQuote> {
    let ceiling = ensure_positive("stake ceiling", ceiling)?;
    for limit in sportsbook_limits.values() {
        ensure_positive("sportsbook limit", *limit)?;
    }

    let mut binding: Option<(f64, &str)> = None;
    for allocation in &opportunity.stakes {
        let Some(limit) = sportsbook_limits.get(&allocation.source) else {
            continue;
        };
        let cap = limit / (allocation.stake_percent / 100.0);
        if binding.map_or(true, |(best, _)| cap < best) {
            binding = Some((cap, allocation.source.as_str()));
        }
    }

    let (max_total_stake, limiting_sportsbook) = match binding {
        Some((cap, book)) => (cap, book.to_string()),
        None => (ceiling, DEFAULT_LIMIT_LABEL.to_string()),
    };

    let stakes = calculate_arbitrage_stakes(&opportunity.outcomes, max_total_stake)?;
    let profit = profit_from_stakes(&stakes, max_total_stake);

    Ok(MaxStakeQuote {
        max_total_stake,
        limiting_sportsbook,
        stakes,
        profit,
    })
}
