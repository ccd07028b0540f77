//! Odds formats and vig removal.

pub mod conversion;
pub mod devig;

pub use conversion::{
    american_to_decimal, decimal_to_american, implied_probability,
    implied_probability_from_decimal, probability_to_american,
};
pub use devig::{remove_vig, remove_vig_three_way, remove_vig_two_way, DevigQuote};
