//! Single-bet evaluation against a caller-supplied true probability.
//!
//! Thresholds (percent):
//! - confidence: edge >= 5 high, >= 2 medium, else low
//! - recommendation: strong_bet at ev >= 5 with high confidence, bet at
//!   ev >= 2 unless confidence is low, avoid below zero, otherwise pass

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ev_engine::{calculate_edge, calculate_ev, EdgeQuote, EvQuote};
use super::kelly::{calculate_kelly, ensure_fraction, KellyQuote, DEFAULT_KELLY_FRACTION};
use crate::error::{ensure_probability, Result};

const HIGH_CONFIDENCE_EDGE_PCT: f64 = 5.0;
const MEDIUM_CONFIDENCE_EDGE_PCT: f64 = 2.0;
const STRONG_BET_EV_PCT: f64 = 5.0;
const BET_EV_PCT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn from_edge_percent(edge_percent: f64) -> Self {
        if edge_percent >= HIGH_CONFIDENCE_EDGE_PCT {
            Confidence::High
        } else if edge_percent >= MEDIUM_CONFIDENCE_EDGE_PCT {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::Low => write!(f, "low"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    StrongBet,
    Bet,
    Pass,
    Avoid,
}

impl Recommendation {
    pub fn from_ev(ev_percent: f64, confidence: Confidence) -> Self {
        if ev_percent >= STRONG_BET_EV_PCT && confidence == Confidence::High {
            Recommendation::StrongBet
        } else if ev_percent >= BET_EV_PCT && confidence != Confidence::Low {
            Recommendation::Bet
        } else if ev_percent < 0.0 {
            Recommendation::Avoid
        } else {
            Recommendation::Pass
        }
    }

    pub fn is_actionable(&self) -> bool {
        matches!(self, Recommendation::StrongBet | Recommendation::Bet)
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::StrongBet => write!(f, "strong_bet"),
            Recommendation::Bet => write!(f, "bet"),
            Recommendation::Pass => write!(f, "pass"),
            Recommendation::Avoid => write!(f, "avoid"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvAnalysis {
    pub true_probability: f64,
    pub american_odds: i32,
    pub stake: f64,
    pub ev: EvQuote,
    pub edge: EdgeQuote,
    /// Present only when a bankroll was supplied
    pub kelly: Option<KellyQuote>,
    pub confidence: Confidence,
    pub recommendation: Recommendation,
}

/// A supplied `kelly_fraction` is validated even when no bankroll is given.
pub fn analyze_ev(
    true_probability: f64,
    american_odds: i32,
    stake: f64,
    bankroll: Option<f64>,
    kelly_fraction: Option<f64>,
) -> Result<EvAnalysis> {
    let p = ensure_probability(true_probability)?;
    let fraction = kelly_fraction
        .map(ensure_fraction)
        .transpose()?
        .unwrap_or(DEFAULT_KELLY_FRACTION);

    let ev = calculate_ev(p, american_odds, stake)?;
    let edge = calculate_edge(p, american_odds)?;
    let kelly = bankroll
        .map(|bankroll| calculate_kelly(p, american_odds, bankroll, fraction))
        .transpose()?;

    let confidence = Confidence::from_edge_percent(edge.edge_percent);
    let recommendation = Recommendation::from_ev(ev.ev_percent, confidence);

    tracing::debug!(
        odds = american_odds,
        p,
        ev_pct = ev.ev_percent,
        edge_pct = edge.edge_percent,
        %recommendation,
        "ev analysis"
    );

    Ok(EvAnalysis {
        true_probability: p,
        american_odds,
        stake,
        ev,
        edge,
        kelly,
        confidence,
        recommendation,
    })
}
