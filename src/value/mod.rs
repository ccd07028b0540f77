//! Expected value, edge, Kelly sizing and closing-line value for single bets.

pub mod analysis;
pub mod ev_engine;
pub mod kelly;

pub use analysis::{analyze_ev, Confidence, EvAnalysis, Recommendation};
pub use ev_engine::{
    calculate_break_even, calculate_clv, calculate_edge, calculate_ev, ClvQuote, EdgeQuote,
    EvQuote,
};
pub use kelly::{calculate_kelly, KellyQuote, DEFAULT_KELLY_FRACTION};
