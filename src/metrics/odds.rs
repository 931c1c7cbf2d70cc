//! American-odds conversions and expected value.

use crate::error::MetricError;

/// Implied win probability from American odds.
///
/// Positive odds (underdog): 100 / (odds + 100).
/// Negative odds (favorite): |odds| / (|odds| + 100).
///
/// American odds always have magnitude >= 100; anything smaller is a
/// malformed line.
pub fn implied_probability(american: i32) -> Result<f64, MetricError> {
    if american.abs() < 100 {
        return Err(MetricError::Inconsistent {
            metric: "implied_probability",
            reason: format!("American odds magnitude below 100: {american}"),
        });
    }
    let magnitude = f64::from(american.abs());
    if american > 0 {
        Ok(100.0 / (magnitude + 100.0))
    } else {
        Ok(magnitude / (magnitude + 100.0))
    }
}

/// Profit on a winning bet of `stake` units at the given American odds.
pub fn payout_for_stake(american: i32, stake: f64) -> Result<f64, MetricError> {
    if american.abs() < 100 {
        return Err(MetricError::Inconsistent {
            metric: "payout",
            reason: format!("American odds magnitude below 100: {american}"),
        });
    }
    let magnitude = f64::from(american.abs());
    if american > 0 {
        Ok(stake * magnitude / 100.0)
    } else {
        Ok(stake * 100.0 / magnitude)
    }
}

/// Expected value of a `stake`-unit bet:
/// EV = p_win × payout − (1 − p_win) × stake.
pub fn expected_value(p_win: f64, american: i32, stake: f64) -> Result<f64, MetricError> {
    if !(0.0..=1.0).contains(&p_win) {
        return Err(MetricError::Inconsistent {
            metric: "expected_value",
            reason: format!("win probability out of [0, 1]: {p_win}"),
        });
    }
    let payout = payout_for_stake(american, stake)?;
    Ok(p_win * payout - (1.0 - p_win) * stake)
}
