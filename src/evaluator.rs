//! Derived-metric computation over normalized rows.
//!
//! Reads games from the store, accumulates per-team run averages from
//! completed games, derives park-adjusted expected runs (λ) per side, and
//! emits one `DerivedMetricRow` per game on the slate. Odds-dependent
//! columns are computed only when a line exists; a missing line leaves
//! them undefined rather than zero.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::config::EvaluatorConfig;
use crate::domain::park::runs_factor_for;
use crate::domain::{DerivedMetricRow, GameOdds, GameRecord, ParkFactor};
use crate::metrics;

/// Accumulated scoring profile for one team.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamAverages {
    pub runs_scored_avg: f64,
    pub runs_allowed_avg: f64,
    pub games: u32,
}

/// Per-team run averages from completed games with full scoring.
pub fn team_averages(games: &[GameRecord]) -> HashMap<String, TeamAverages> {
    #[derive(Default)]
    struct Totals {
        scored: u32,
        allowed: u32,
        games: u32,
    }

    let mut totals: HashMap<String, Totals> = HashMap::new();
    for game in games {
        if !game.status.is_completed() {
            continue;
        }
        let (Some(home_runs), Some(away_runs)) = (game.home_runs, game.away_runs) else {
            continue;
        };
        let home = totals.entry(game.home_team.clone()).or_default();
        home.scored += home_runs;
        home.allowed += away_runs;
        home.games += 1;

        let away = totals.entry(game.away_team.clone()).or_default();
        away.scored += away_runs;
        away.allowed += home_runs;
        away.games += 1;
    }

    totals
        .into_iter()
        .map(|(team, t)| {
            let games = t.games;
            (
                team,
                TeamAverages {
                    runs_scored_avg: f64::from(t.scored) / f64::from(games),
                    runs_allowed_avg: f64::from(t.allowed) / f64::from(games),
                    games,
                },
            )
        })
        .collect()
}

/// Result of one evaluation pass.
#[derive(Debug, Default)]
pub struct EvalOutcome {
    pub rows: Vec<DerivedMetricRow>,
    /// Games skipped for lack of team history.
    pub skipped: usize,
    /// Odds-dependent fields left undefined across all rows.
    pub undefined: usize,
}

pub struct MetricEvaluator {
    config: EvaluatorConfig,
}

impl MetricEvaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    /// Expected runs for a side: the mean of what the team scores and
    /// what its opponent allows, scaled by the home park's runs factor.
    fn lambda(
        team: &TeamAverages,
        opponent: &TeamAverages,
        park_runs_factor: f64,
    ) -> f64 {
        (team.runs_scored_avg + opponent.runs_allowed_avg) / 2.0 * park_runs_factor
    }

    /// Evaluate every game against the accumulated averages.
    pub fn evaluate(
        &self,
        games: &[GameRecord],
        odds: &[GameOdds],
        parks: &[ParkFactor],
    ) -> EvalOutcome {
        let averages = team_averages(games);
        let odds_by_key: HashMap<String, &GameOdds> =
            odds.iter().map(|o| (o.key(), o)).collect();

        let mut outcome = EvalOutcome::default();
        for game in games {
            let (Some(home_avg), Some(away_avg)) = (
                averages.get(&game.home_team),
                averages.get(&game.away_team),
            ) else {
                debug!(game = %game.key(), "no team history, skipping derived row");
                outcome.skipped += 1;
                continue;
            };

            // Both sides play in the home park.
            let park_factor = runs_factor_for(parks, &game.home_team);
            let lambda_home = Self::lambda(home_avg, away_avg, park_factor);
            let lambda_away = Self::lambda(away_avg, home_avg, park_factor);

            let k = self.config.target_runs;
            let (poisson_home, poisson_away) = match (
                metrics::win_probability(lambda_home, k),
                metrics::win_probability(lambda_away, k),
            ) {
                (Ok(h), Ok(a)) => (h, a),
                (h, a) => {
                    warn!(
                        game = %game.key(),
                        home = ?h.err(),
                        away = ?a.err(),
                        "poisson undefined, skipping derived row"
                    );
                    outcome.skipped += 1;
                    continue;
                }
            };

            let line = odds_by_key.get(&format!("{}|{}", game.home_team, game.away_team));
            let home_odds = line.and_then(|o| o.home_odds);
            let away_odds = line.and_then(|o| o.away_odds);

            let row = DerivedMetricRow {
                game_id: game.key(),
                lambda_home,
                lambda_away,
                poisson_home,
                poisson_away,
                implied_prob_home: home_odds
                    .and_then(|o| metrics::implied_probability(o).ok()),
                implied_prob_away: away_odds
                    .and_then(|o| metrics::implied_probability(o).ok()),
                ev_home: home_odds.and_then(|o| {
                    metrics::expected_value(poisson_home, o, self.config.stake).ok()
                }),
                ev_away: away_odds.and_then(|o| {
                    metrics::expected_value(poisson_away, o, self.config.stake).ok()
                }),
            };
            outcome.undefined += row.undefined_count();
            outcome.rows.push(row);
        }
        outcome
    }
}
