//! Pure metric functions: Poisson win probabilities, American-odds EV,
//! and the standard sabermetric rate stats.
//!
//! Every function here is side-effect free and explicitly partial: outside
//! its valid input domain it returns a typed [`MetricError`], never a
//! sentinel number.

pub mod odds;
pub mod poisson;
pub mod sabermetrics;

pub use crate::error::MetricError;
pub use odds::{expected_value, implied_probability, payout_for_stake};
pub use poisson::win_probability;
pub use sabermetrics::{babip, fip, iso, woba, BattingLine, PitchingLine};

/// Stake used for EV quoting, in betting units. EV answers "what do I make
/// on a 100-unit bet on average".
pub const DEFAULT_STAKE: f64 = 100.0;

/// League FIP constant for the 2024 season.
pub const DEFAULT_FIP_CONSTANT: f64 = 3.10;
