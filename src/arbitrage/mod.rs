//! Cross-book arbitrage detection, stake distribution and grading.

pub mod analysis;
pub mod board;
pub mod detection;
pub mod stakes;

pub use analysis::{analyze_arbitrage, ArbitrageAnalysis, ArbitrageQuality};
pub use board::{find_best_arbitrage, OddsBoard, DEFAULT_ANALYSIS_STAKE};
pub use detection::{detect_arbitrage, ArbitrageDetection};
pub use stakes::{
    calculate_arbitrage_profit, calculate_arbitrage_stakes, calculate_max_stake,
    calculate_max_stake_with_ceiling, ArbitrageProfit, MaxStakeQuote, DEFAULT_LIMIT_LABEL,
    DEFAULT_MAX_STAKE,
};
