use crate::error::MetricError;

/// Poisson probability mass function P(k; λ) = e^(-λ) λ^k / k!.
///
/// λ is a team's park-adjusted expected runs, k the target run count.
/// Evaluated in log space so large k underflows gracefully to 0 instead of
/// overflowing the factorial.
pub fn win_probability(lambda: f64, k: u32) -> Result<f64, MetricError> {
    if !lambda.is_finite() {
        return Err(MetricError::undefined("poisson", "lambda is not finite"));
    }
    if lambda < 0.0 {
        return Err(MetricError::undefined("poisson", "lambda is negative"));
    }
    if lambda == 0.0 {
        // Degenerate distribution: all mass at zero runs.
        return Ok(if k == 0 { 1.0 } else { 0.0 });
    }

    let k_f = f64::from(k);
    let log_p = k_f * lambda.ln() - lambda - ln_factorial(k);
    Ok(log_p.exp().clamp(0.0, 1.0))
}

/// ln(k!) as a running sum; exact enough for run counts and avoids pulling
/// in a gamma-function dependency.
fn ln_factorial(k: u32) -> f64 {
    (2..=u64::from(k)).map(|i| (i as f64).ln()).sum()
}
