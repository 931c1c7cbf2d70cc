use serde::{Deserialize, Serialize};

/// Derived metrics for one game, recomputed from scratch each run.
///
/// Owned by the metric evaluator; nothing else writes these fields.
/// `None` in the odds-dependent fields means the input odds were missing
/// and the metric is undefined for this run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetricRow {
    pub game_id: String,
    pub lambda_home: f64,
    pub lambda_away: f64,
    pub poisson_home: f64,
    pub poisson_away: f64,
    pub implied_prob_home: Option<f64>,
    pub implied_prob_away: Option<f64>,
    pub ev_home: Option<f64>,
    pub ev_away: Option<f64>,
}

impl DerivedMetricRow {
    pub fn key(&self) -> String {
        self.game_id.clone()
    }

    /// Count of odds-dependent fields left undefined on this row.
    pub fn undefined_count(&self) -> usize {
        [
            self.implied_prob_home.is_none(),
            self.implied_prob_away.is_none(),
            self.ev_home.is_none(),
            self.ev_away.is_none(),
        ]
        .iter()
        .filter(|missing| **missing)
        .count()
    }
}
