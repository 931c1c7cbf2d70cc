//! Date-window fetch with per-date failure isolation.
//!
//! Each date in the window is one provider request. A date that keeps
//! failing is logged and recorded, never fatal to the batch; the output
//! excludes only that date. Dates are walked most-recent-first to match
//! the "last N days" lookback.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::config::ProviderConfig;
use crate::domain::GameRecord;
use crate::error::{DugoutError, Result};
use crate::normalizer;
use crate::provider::StatsProvider;

/// Result of one window fetch.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    /// Normalized games, descending by date.
    pub games: Vec<GameRecord>,
    /// Dates whose request ultimately failed.
    pub failed_dates: Vec<NaiveDate>,
    /// Games dropped by the normalizer for data-quality reasons.
    pub skipped_games: usize,
}

pub struct Fetcher {
    provider: Arc<dyn StatsProvider>,
    config: ProviderConfig,
}

impl Fetcher {
    pub fn new(provider: Arc<dyn StatsProvider>, config: ProviderConfig) -> Self {
        Self { provider, config }
    }

    /// Fetch and normalize every date in `[start, end]`, newest first.
    pub async fn fetch_range(&self, start: NaiveDate, end: NaiveDate) -> FetchOutcome {
        let mut outcome = FetchOutcome::default();
        if start > end {
            warn!(%start, %end, "empty fetch window");
            return outcome;
        }

        let mut date = end;
        loop {
            match self.fetch_date_with_retry(date).await {
                Ok(schedule_games) => {
                    let mut day_count = 0usize;
                    for raw in &schedule_games {
                        match normalizer::normalize(date, raw) {
                            Ok(game) => {
                                outcome.games.push(game);
                                day_count += 1;
                            }
                            Err(e) => {
                                warn!(%date, error = %e, "skipping malformed game");
                                outcome.skipped_games += 1;
                            }
                        }
                    }
                    debug!(%date, games = day_count, "date fetched");
                }
                Err(e) => {
                    warn!(%date, error = %e, "date fetch failed, skipping");
                    outcome.failed_dates.push(date);
                }
            }

            if date == start {
                break;
            }
            date = date.pred_opt().expect("date underflow");

            // Deliberate throttle between provider calls.
            if self.config.rate_limit_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.rate_limit_ms)).await;
            }
        }

        info!(
            games = outcome.games.len(),
            failed_dates = outcome.failed_dates.len(),
            skipped = outcome.skipped_games,
            "fetch window complete"
        );
        outcome
    }

    /// One date, retried with bounded exponential backoff on transient
    /// failures. Permanent rejections (plain 4xx, malformed payloads)
    /// fail immediately.
    async fn fetch_date_with_retry(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<crate::provider::RawGame>> {
        let mut attempt: u8 = 0;
        loop {
            match self.provider.fetch_schedule(date).await {
                Ok(schedule) => return Ok(schedule.games),
                Err(e) => {
                    let transient = matches!(
                        &e,
                        DugoutError::Provider { source, .. } if source.is_transient()
                    );
                    if !transient || attempt >= self.config.max_retries {
                        return Err(e);
                    }
                    let delay = self.config.retry_base_ms.saturating_mul(1 << attempt);
                    warn!(
                        %date,
                        attempt = attempt + 1,
                        delay_ms = delay,
                        error = %e,
                        "transient provider failure, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    attempt += 1;
                }
            }
        }
    }
}
