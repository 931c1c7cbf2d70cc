//! Sabermetric rate stats: wOBA, BABIP, ISO, FIP.
//!
//! Linear weights and the FIP constant are the 2024 season values.

use crate::error::MetricError;

// 2024 wOBA linear weights.
const W_BB: f64 = 0.692;
const W_HBP: f64 = 0.723;
const W_1B: f64 = 0.888;
const W_2B: f64 = 1.271;
const W_3B: f64 = 1.616;
const W_HR: f64 = 2.101;

/// Counting stats for a batter over some span.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BattingLine {
    pub at_bats: u32,
    pub hits: u32,
    pub doubles: u32,
    pub triples: u32,
    pub home_runs: u32,
    pub walks: u32,
    pub hit_by_pitch: u32,
    pub strikeouts: u32,
    pub sac_flies: u32,
}

impl BattingLine {
    /// Singles derived from the hit breakdown.
    pub fn singles(&self) -> Result<u32, MetricError> {
        let extra_base = self.doubles + self.triples + self.home_runs;
        self.hits.checked_sub(extra_base).ok_or_else(|| MetricError::Inconsistent {
            metric: "singles",
            reason: format!(
                "extra-base hits ({extra_base}) exceed total hits ({})",
                self.hits
            ),
        })
    }

    /// Plate appearances as counted by the wOBA denominator.
    pub fn woba_plate_appearances(&self) -> u32 {
        self.at_bats + self.walks + self.sac_flies + self.hit_by_pitch
    }
}

/// Counting stats for a pitcher over some span.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PitchingLine {
    pub home_runs_allowed: u32,
    pub walks: u32,
    pub hit_by_pitch: u32,
    pub strikeouts: u32,
    pub innings_pitched: f64,
}

/// Weighted On-Base Average.
///
/// Undefined when the plate-appearance denominator is zero.
pub fn woba(line: &BattingLine) -> Result<f64, MetricError> {
    let pa = line.woba_plate_appearances();
    if pa == 0 {
        return Err(MetricError::undefined("wOBA", "zero plate appearances"));
    }
    let singles = line.singles()?;
    let numerator = W_BB * f64::from(line.walks)
        + W_HBP * f64::from(line.hit_by_pitch)
        + W_1B * f64::from(singles)
        + W_2B * f64::from(line.doubles)
        + W_3B * f64::from(line.triples)
        + W_HR * f64::from(line.home_runs);
    Ok(numerator / f64::from(pa))
}

/// Batting Average on Balls In Play: (H − HR) / (AB − K − HR + SF).
///
/// Undefined when no balls were put in play.
pub fn babip(line: &BattingLine) -> Result<f64, MetricError> {
    let balls_in_play = i64::from(line.at_bats) - i64::from(line.strikeouts)
        - i64::from(line.home_runs)
        + i64::from(line.sac_flies);
    if balls_in_play <= 0 {
        return Err(MetricError::undefined("BABIP", "no balls in play"));
    }
    let hits_in_play = i64::from(line.hits) - i64::from(line.home_runs);
    if hits_in_play < 0 {
        return Err(MetricError::Inconsistent {
            metric: "BABIP",
            reason: format!(
                "home runs ({}) exceed hits ({})",
                line.home_runs, line.hits
            ),
        });
    }
    Ok(hits_in_play as f64 / balls_in_play as f64)
}

/// Isolated Power: SLG − AVG.
///
/// A negative result means the inputs disagree (SLG can never be below
/// AVG), which is a data error rather than a valid metric.
pub fn iso(slg: f64, avg: f64) -> Result<f64, MetricError> {
    if !slg.is_finite() || !avg.is_finite() {
        return Err(MetricError::undefined("ISO", "non-finite input"));
    }
    let value = slg - avg;
    if value < 0.0 {
        return Err(MetricError::Inconsistent {
            metric: "ISO",
            reason: format!("SLG {slg} below AVG {avg}"),
        });
    }
    Ok(value)
}

/// Fielding Independent Pitching:
/// (13·HR + 3·(BB + HBP) − 2·K) / IP + constant.
///
/// Undefined when innings pitched is zero.
pub fn fip(line: &PitchingLine, constant: f64) -> Result<f64, MetricError> {
    if line.innings_pitched <= 0.0 {
        return Err(MetricError::undefined("FIP", "zero innings pitched"));
    }
    let numerator = 13.0 * f64::from(line.home_runs_allowed)
        + 3.0 * f64::from(line.walks + line.hit_by_pitch)
        - 2.0 * f64::from(line.strikeouts);
    Ok(numerator / line.innings_pitched + constant)
}
