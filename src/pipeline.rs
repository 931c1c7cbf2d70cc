//! End-to-end batch run: fetch → normalize → store → evaluate → store.
//!
//! Each run is an idempotent overwrite-by-key pass; partial data loss
//! shows up in the run summary, not as a failed run. Only configuration
//! problems (a missing required key) abort.

use std::fmt;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::classifier::{MatchupClassifier, PitcherBaseline};
use crate::config::AppConfig;
use crate::domain::park::load_park_factors_or_sample;
use crate::domain::{park, GameOdds, GameRecord, MatchupRecord};
use crate::error::Result;
use crate::evaluator::MetricEvaluator;
use crate::fetcher::Fetcher;
use crate::provider::{OddsApiClient, OddsProvider, SportradarClient, StatsProvider};
use crate::secrets::KeyChain;
use crate::sink::{rows, CsvDirSink, TabularSink, DERIVED_METRICS, GAMES, MATCHUPS, PARK_FACTORS};

/// Key names consulted in the secret chain.
pub const SPORTRADAR_KEY: &str = "SPORTRADAR_KEY";
pub const ODDSAPI_KEY: &str = "ODDSAPI_KEY";

/// What one run did, reported instead of failing wholesale on partial
/// data loss.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub dates_requested: u32,
    pub dates_failed: usize,
    pub games_fetched: usize,
    pub games_skipped: usize,
    pub derived_rows: usize,
    pub metrics_undefined: usize,
    pub matchups_classified: usize,
    pub data_quality_rejects: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dates {}/{} ok, {} games ({} skipped), {} derived rows ({} metrics undefined), {} matchups, {} data-quality rejects",
            self.dates_requested as usize - self.dates_failed,
            self.dates_requested,
            self.games_fetched,
            self.games_skipped,
            self.derived_rows,
            self.metrics_undefined,
            self.matchups_classified,
            self.data_quality_rejects,
        )
    }
}

pub struct Pipeline {
    config: AppConfig,
    stats: Arc<dyn StatsProvider>,
    odds: Option<Arc<dyn OddsProvider>>,
    sink: Arc<dyn TabularSink>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("odds", &self.odds.is_some())
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Assemble a pipeline from explicit components; tests inject fakes
    /// here.
    pub fn new(
        config: AppConfig,
        stats: Arc<dyn StatsProvider>,
        odds: Option<Arc<dyn OddsProvider>>,
        sink: Arc<dyn TabularSink>,
    ) -> Self {
        Self {
            config,
            stats,
            odds,
            sink,
        }
    }

    /// Assemble the production pipeline. The stats key is required — a
    /// run without it is a configuration error. The odds key is optional:
    /// without it the EV columns stay undefined.
    pub fn from_config(config: AppConfig, keys: &KeyChain) -> Result<Self> {
        let stats_key = keys.require(SPORTRADAR_KEY)?;
        let stats: Arc<dyn StatsProvider> =
            Arc::new(SportradarClient::new(&config.provider, stats_key)?);

        let odds: Option<Arc<dyn OddsProvider>> = if config.odds.enabled {
            match keys.lookup(ODDSAPI_KEY) {
                Some(key) => Some(Arc::new(OddsApiClient::new(&config.odds, key)?)),
                None => {
                    warn!("no {ODDSAPI_KEY} configured, EV columns will be undefined");
                    None
                }
            }
        } else {
            None
        };

        let sink: Arc<dyn TabularSink> = Arc::new(CsvDirSink::new(&config.sink.dir)?);
        Ok(Self::new(config, stats, odds, sink))
    }

    /// One full batch run over the last `days` days.
    pub async fn run(&self, days: u32) -> Result<RunSummary> {
        let days = days.max(1);
        let end = Utc::now().date_naive();
        let start = end - Duration::days(i64::from(days) - 1);
        info!(%start, %end, "starting pipeline run");

        let mut summary = RunSummary {
            dates_requested: days,
            ..Default::default()
        };

        // Stage 1+2: fetch and normalize the window.
        let fetcher = Fetcher::new(self.stats.clone(), self.config.provider.clone());
        let outcome = fetcher.fetch_range(start, end).await;
        summary.dates_failed = outcome.failed_dates.len();
        summary.games_fetched = outcome.games.len();
        summary.games_skipped = outcome.skipped_games;
        summary.data_quality_rejects += outcome.skipped_games;

        let game_rows = outcome.games.iter().map(rows::game_row).collect();
        self.sink.upsert(&GAMES, game_rows)?;

        // Reference data.
        let parks = match &self.config.sink.park_factors_csv {
            Some(path) => load_park_factors_or_sample(path),
            None => park::sample_park_factors(),
        };
        let park_rows = parks.iter().map(rows::park_factor_row).collect();
        self.sink.upsert(&PARK_FACTORS, park_rows)?;

        // Stage 3: evaluator reads the store back, so prior runs' games
        // count toward team averages too.
        let stored_games = self.read_games(&mut summary)?;
        let odds = self.fetch_odds().await;

        let evaluator = MetricEvaluator::new(self.config.evaluator.clone());
        let eval = evaluator.evaluate(&stored_games, &odds, &parks);
        summary.derived_rows = eval.rows.len();
        summary.metrics_undefined = eval.undefined;

        let derived_rows = eval.rows.iter().map(rows::derived_row).collect();
        self.sink.upsert(&DERIVED_METRICS, derived_rows)?;

        // Matchup classification from the optional input CSV.
        if let Some(path) = self.config.sink.matchups_csv.clone() {
            summary.matchups_classified = self.classify_matchups(&path, &mut summary)?;
        }

        info!(%summary, "pipeline run complete");
        Ok(summary)
    }

    fn read_games(&self, summary: &mut RunSummary) -> Result<Vec<GameRecord>> {
        let mut games = Vec::new();
        for row in self.sink.read_rows(&GAMES)? {
            match rows::parse_game_row(&row) {
                Ok(game) => games.push(game),
                Err(e) => {
                    warn!(error = %e, "unreadable stored game row");
                    summary.data_quality_rejects += 1;
                }
            }
        }
        Ok(games)
    }

    /// Odds are advisory: a failed fetch degrades to an odds-less run.
    async fn fetch_odds(&self) -> Vec<GameOdds> {
        let Some(provider) = &self.odds else {
            return Vec::new();
        };
        match provider.fetch_odds().await {
            Ok(odds) => odds,
            Err(e) => {
                warn!(error = %e, "odds fetch failed, continuing without lines");
                Vec::new()
            }
        }
    }

    fn classify_matchups(&self, path: &str, summary: &mut RunSummary) -> Result<usize> {
        let mut reader = match csv::Reader::from_path(path) {
            Ok(reader) => reader,
            Err(e) => {
                warn!(path, error = %e, "matchup CSV unreadable, skipping classification");
                return Ok(0);
            }
        };

        // Accumulate duplicate pitcher/batter pairs before classifying.
        let mut merged: Vec<MatchupRecord> = Vec::new();
        for record in reader.deserialize::<MatchupRecord>() {
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    warn!(error = %e, "unparseable matchup row");
                    summary.data_quality_rejects += 1;
                    continue;
                }
            };
            if let Err(e) = record.validate() {
                warn!(error = %e, "matchup row failed validation");
                summary.data_quality_rejects += 1;
                continue;
            }
            match merged.iter_mut().find(|m| m.key() == record.key()) {
                Some(existing) => existing.accumulate(&record),
                None => merged.push(record),
            }
        }

        let classifier = MatchupClassifier::new(self.config.classifier.clone());
        let baseline = PitcherBaseline::default();
        let matchup_rows: Vec<Vec<String>> = merged
            .iter()
            .map(|record| {
                let call = classifier.classify(record, &baseline);
                rows::matchup_row(record, &call)
            })
            .collect();

        let count = matchup_rows.len();
        self.sink.upsert(&MATCHUPS, matchup_rows)?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_display_reads_naturally() {
        let summary = RunSummary {
            dates_requested: 14,
            dates_failed: 1,
            games_fetched: 120,
            games_skipped: 2,
            derived_rows: 118,
            metrics_undefined: 8,
            matchups_classified: 30,
            data_quality_rejects: 3,
        };
        let text = summary.to_string();
        assert!(text.contains("dates 13/14 ok"));
        assert!(text.contains("120 games"));
        assert!(text.contains("8 metrics undefined"));
    }
}
