//! Matchup advantage classification.
//!
//! Compares a batter's OPS-like production against what the pitcher
//! allows, with confidence scaled by at-bat sample size. The curve is a
//! linear ramp saturating at `confidence_at_bats`; below
//! `min_sample_size` the call is forced neutral regardless of the split.

use serde::{Deserialize, Serialize};

use crate::config::ClassifierConfig;
use crate::domain::MatchupRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Advantage {
    Pitcher,
    Batter,
    Neutral,
}

impl Advantage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Advantage::Pitcher => "pitcher",
            Advantage::Batter => "batter",
            Advantage::Neutral => "neutral",
        }
    }
}

/// The classifier's verdict for one matchup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchupCall {
    pub advantage: Advantage,
    /// 0..1, monotonically increasing in sample size.
    pub confidence: f64,
}

/// What the pitcher typically allows, as an OPS-like rate. Used as the
/// baseline the batter's head-to-head production is compared against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitcherBaseline {
    pub allowed_ops: f64,
}

/// League-average-ish OPS allowed, used when no pitcher baseline is
/// supplied with the matchup data.
pub const DEFAULT_ALLOWED_OPS: f64 = 0.715;

impl Default for PitcherBaseline {
    fn default() -> Self {
        Self {
            allowed_ops: DEFAULT_ALLOWED_OPS,
        }
    }
}

pub struct MatchupClassifier {
    config: ClassifierConfig,
}

impl MatchupClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classify one head-to-head record against the pitcher's baseline.
    pub fn classify(&self, record: &MatchupRecord, pitcher: &PitcherBaseline) -> MatchupCall {
        let confidence = self.confidence(record.at_bats);

        if record.at_bats < self.config.min_sample_size {
            // Not enough evidence to call either way.
            return MatchupCall {
                advantage: Advantage::Neutral,
                confidence,
            };
        }

        // OPS-like rate from the fields we carry: OBP plus the power the
        // batter has actually shown in this matchup.
        let batter_ops = record.obp + slugging_proxy(record);
        let baseline = pitcher.allowed_ops.max(f64::EPSILON);
        let relative_edge = (batter_ops - baseline) / baseline;

        let advantage = if relative_edge.abs() <= self.config.neutral_band {
            Advantage::Neutral
        } else if relative_edge > 0.0 {
            Advantage::Batter
        } else {
            Advantage::Pitcher
        };

        MatchupCall {
            advantage,
            confidence,
        }
    }

    /// Linear ramp: min(1, at_bats / confidence_at_bats).
    pub fn confidence(&self, at_bats: u32) -> f64 {
        (f64::from(at_bats) / f64::from(self.config.confidence_at_bats)).min(1.0)
    }
}

/// Slugging estimated from the counts available on a matchup record:
/// home runs count 4 bases, other hits 1 (no double/triple breakdown in
/// head-to-head data).
fn slugging_proxy(record: &MatchupRecord) -> f64 {
    if record.at_bats == 0 {
        return 0.0;
    }
    let singles_ish = record.hits.saturating_sub(record.home_runs);
    f64::from(singles_ish + 4 * record.home_runs) / f64::from(record.at_bats)
}
