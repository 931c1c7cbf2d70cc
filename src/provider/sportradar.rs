//! SportRadar MLB schedule client.
//!
//! One request per date: `GET {base}/games/{yyyy/MM/dd}/schedule.json`.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::error::{DugoutError, ProviderError, Result};
use crate::provider::{RawSchedule, StatsProvider};

pub struct SportradarClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SportradarClient {
    pub fn new(config: &ProviderConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn schedule_url(&self, date: NaiveDate) -> String {
        format!(
            "{}/games/{}/schedule.json?api_key={}",
            self.base_url,
            date.format("%Y/%m/%d"),
            self.api_key
        )
    }
}

#[async_trait]
impl StatsProvider for SportradarClient {
    async fn fetch_schedule(&self, date: NaiveDate) -> Result<RawSchedule> {
        let url = self.schedule_url(date);
        debug!(%date, "fetching schedule");

        let provider_err = |source: ProviderError| DugoutError::Provider { date, source };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| provider_err(ProviderError::Transport(e)))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(provider_err(ProviderError::RateLimited));
        }
        if status.is_server_error() {
            return Err(provider_err(ProviderError::Server {
                status: status.as_u16(),
            }));
        }
        if !status.is_success() {
            return Err(provider_err(ProviderError::Rejected {
                status: status.as_u16(),
            }));
        }

        let schedule: RawSchedule = response
            .json()
            .await
            .map_err(|e| provider_err(ProviderError::Parse(e.to_string())))?;

        debug!(%date, games = schedule.games.len(), "schedule fetched");
        Ok(schedule)
    }
}
