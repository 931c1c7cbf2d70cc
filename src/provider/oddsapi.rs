//! The Odds API moneyline client.
//!
//! Fetches the current MLB slate in American format. Odds are an optional
//! input: when this provider is disabled or its key is absent, derived EV
//! columns simply stay undefined.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::OddsConfig;
use crate::domain::GameOdds;
use crate::error::{DugoutError, Result};
use crate::provider::OddsProvider;

pub struct OddsApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    home_team: String,
    away_team: String,
    #[serde(default)]
    bookmakers: Vec<RawBookmaker>,
}

#[derive(Debug, Deserialize)]
struct RawBookmaker {
    #[serde(default)]
    markets: Vec<RawMarket>,
}

#[derive(Debug, Deserialize)]
struct RawMarket {
    key: String,
    #[serde(default)]
    outcomes: Vec<RawOutcome>,
}

#[derive(Debug, Deserialize)]
struct RawOutcome {
    name: String,
    price: f64,
}

impl OddsApiClient {
    pub fn new(config: &OddsConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn odds_url(&self) -> String {
        format!(
            "{}/sports/baseball_mlb/odds?apiKey={}&regions=us&markets=h2h&oddsFormat=american",
            self.base_url, self.api_key
        )
    }

    /// First bookmaker's head-to-head prices for one event.
    fn event_to_odds(event: &RawEvent) -> GameOdds {
        let mut odds = GameOdds {
            home_team: event.home_team.clone(),
            away_team: event.away_team.clone(),
            home_odds: None,
            away_odds: None,
        };
        let h2h = event
            .bookmakers
            .iter()
            .flat_map(|b| b.markets.iter())
            .find(|m| m.key == "h2h");
        if let Some(market) = h2h {
            for outcome in &market.outcomes {
                let price = outcome.price.round() as i32;
                if outcome.name == event.home_team {
                    odds.home_odds = Some(price);
                } else if outcome.name == event.away_team {
                    odds.away_odds = Some(price);
                }
            }
        }
        odds
    }
}

#[async_trait]
impl OddsProvider for OddsApiClient {
    async fn fetch_odds(&self) -> Result<Vec<GameOdds>> {
        let response = self
            .client
            .get(self.odds_url())
            .send()
            .await
            .map_err(|e| DugoutError::OddsProvider(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DugoutError::OddsProvider(format!(
                "odds API returned {status}"
            )));
        }

        let events: Vec<RawEvent> = response
            .json()
            .await
            .map_err(|e| DugoutError::OddsProvider(format!("malformed payload: {e}")))?;

        let odds: Vec<GameOdds> = events.iter().map(Self::event_to_odds).collect();
        debug!(events = odds.len(), "odds fetched");
        Ok(odds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_to_odds_maps_sides() {
        let raw = r#"{
            "home_team": "New York Yankees",
            "away_team": "Boston Red Sox",
            "bookmakers": [
                {
                    "markets": [
                        {
                            "key": "h2h",
                            "outcomes": [
                                {"name": "New York Yankees", "price": -150},
                                {"name": "Boston Red Sox", "price": 130}
                            ]
                        }
                    ]
                }
            ]
        }"#;
        let event: RawEvent = serde_json::from_str(raw).unwrap();
        let odds = OddsApiClient::event_to_odds(&event);
        assert_eq!(odds.home_odds, Some(-150));
        assert_eq!(odds.away_odds, Some(130));
    }

    #[test]
    fn test_event_without_h2h_market_has_no_lines() {
        let raw = r#"{"home_team": "A", "away_team": "B", "bookmakers": []}"#;
        let event: RawEvent = serde_json::from_str(raw).unwrap();
        let odds = OddsApiClient::event_to_odds(&event);
        assert_eq!(odds.home_odds, None);
        assert_eq!(odds.away_odds, None);
    }
}
