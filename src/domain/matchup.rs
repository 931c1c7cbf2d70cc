use serde::{Deserialize, Serialize};

use crate::error::{DugoutError, Result};

/// Career head-to-head line for one pitcher/batter pair.
///
/// Upserted by accumulation: counts add across historical at-bats, AVG is
/// re-derived, OBP is carried as a plate-appearance-weighted mean.
///
/// Invariant: at_bats >= hits >= home_runs >= 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupRecord {
    pub pitcher_id: String,
    pub batter_id: String,
    pub at_bats: u32,
    pub hits: u32,
    pub home_runs: u32,
    pub strikeouts: u32,
    pub avg: f64,
    pub obp: f64,
}

impl MatchupRecord {
    /// Stable upsert key for the tabular sink.
    pub fn key(&self) -> String {
        format!("{}|{}", self.pitcher_id, self.batter_id)
    }

    /// Check the count invariant; violations are data-quality errors and
    /// the record is excluded from metric computation.
    pub fn validate(&self) -> Result<()> {
        if self.hits > self.at_bats {
            return Err(DugoutError::DataQuality(format!(
                "matchup {}: hits {} exceed at-bats {}",
                self.key(),
                self.hits,
                self.at_bats
            )));
        }
        if self.home_runs > self.hits {
            return Err(DugoutError::DataQuality(format!(
                "matchup {}: home runs {} exceed hits {}",
                self.key(),
                self.home_runs,
                self.hits
            )));
        }
        if self.strikeouts > self.at_bats {
            return Err(DugoutError::DataQuality(format!(
                "matchup {}: strikeouts {} exceed at-bats {}",
                self.key(),
                self.strikeouts,
                self.at_bats
            )));
        }
        if !(0.0..=1.0).contains(&self.avg) || !(0.0..=1.0).contains(&self.obp) {
            return Err(DugoutError::DataQuality(format!(
                "matchup {}: rate stats out of range (avg={}, obp={})",
                self.key(),
                self.avg,
                self.obp
            )));
        }
        Ok(())
    }

    /// Fold another sample for the same pair into this record.
    ///
    /// Counts add; AVG is recomputed from the merged counts; OBP, which
    /// cannot be recomputed from the fields we carry, is weighted by
    /// at-bats as an approximation of plate appearances.
    pub fn accumulate(&mut self, other: &MatchupRecord) {
        debug_assert_eq!(self.key(), other.key());

        let total_ab = self.at_bats + other.at_bats;
        if total_ab > 0 {
            self.obp = (self.obp * f64::from(self.at_bats)
                + other.obp * f64::from(other.at_bats))
                / f64::from(total_ab);
        }

        self.at_bats = total_ab;
        self.hits += other.hits;
        self.home_runs += other.home_runs;
        self.strikeouts += other.strikeouts;
        self.avg = if self.at_bats > 0 {
            f64::from(self.hits) / f64::from(self.at_bats)
        } else {
            0.0
        };
    }
}
