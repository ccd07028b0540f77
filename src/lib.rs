//! Sharpline Library
//!
//! Odds conversion, vig removal, expected value, Kelly sizing and
//! cross-book arbitrage math for sportsbook prices.
//!
//! All math functions are pure and return `error::Result`; the detector,
//! config and persistence layers wrap them for applications.

pub mod arbitrage;
pub mod config;
pub mod detector;
pub mod error;
pub mod odds;
pub mod persistence;
pub mod types;
pub mod value;

pub use error::{OddsError, Result};
pub use types::{normalize_outcomes, Outcome, PricedOutcome, StakeAllocation};
