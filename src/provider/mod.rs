//! Capability traits for the external data providers, plus the raw payload
//! shapes they return. The pipeline talks to these traits only; the HTTP
//! clients live alongside and tests substitute in-memory fakes.

pub mod oddsapi;
pub mod sportradar;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::GameOdds;
use crate::error::Result;

pub use oddsapi::OddsApiClient;
pub use sportradar::SportradarClient;

/// One day's schedule as returned by the stats provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSchedule {
    #[serde(default)]
    pub games: Vec<RawGame>,
}

/// A single game in provider vocabulary. Everything beyond the team blocks
/// is optional; in-progress games routinely omit scoring.
#[derive(Debug, Clone, Deserialize)]
pub struct RawGame {
    pub home: RawTeam,
    pub away: RawTeam,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub scoring: Option<RawScoring>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTeam {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawScoring {
    #[serde(default)]
    pub home_runs: Option<u32>,
    #[serde(default)]
    pub away_runs: Option<u32>,
}

/// "Fetch the schedule for one date."
#[async_trait]
pub trait StatsProvider: Send + Sync {
    async fn fetch_schedule(&self, date: NaiveDate) -> Result<RawSchedule>;
}

/// "Fetch moneyline odds for the current slate."
#[async_trait]
pub trait OddsProvider: Send + Sync {
    async fn fetch_odds(&self) -> Result<Vec<GameOdds>>;
}
