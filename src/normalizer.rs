//! Maps provider-vocabulary payloads into the canonical row schema.

use chrono::NaiveDate;

use crate::domain::{GameRecord, GameStatus};
use crate::error::{DugoutError, Result};
use crate::provider::RawGame;

/// Normalize one provider game into a `GameRecord`.
///
/// Missing numeric fields become `None` — partial data is common for
/// in-progress games and must not error. Missing team names, by contrast,
/// destroy the row key and are data-quality rejects.
pub fn normalize(date: NaiveDate, raw: &RawGame) -> Result<GameRecord> {
    let home_team = team_name(&raw.home.name, date, "home")?;
    let away_team = team_name(&raw.away.name, date, "away")?;

    let status = raw
        .status
        .as_deref()
        .map(GameStatus::parse)
        .unwrap_or(GameStatus::Other("unknown".to_string()));

    let (home_runs, away_runs) = match &raw.scoring {
        Some(scoring) => (scoring.home_runs, scoring.away_runs),
        None => (None, None),
    };

    Ok(GameRecord {
        date,
        home_team,
        away_team,
        home_runs,
        away_runs,
        status,
    })
}

fn team_name(name: &Option<String>, date: NaiveDate, side: &str) -> Result<String> {
    match name.as_deref().map(str::trim) {
        Some(n) if !n.is_empty() => Ok(n.to_string()),
        _ => Err(DugoutError::DataQuality(format!(
            "game on {date} has no {side} team name"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{RawScoring, RawTeam};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 27).unwrap()
    }

    fn raw(status: Option<&str>, scoring: Option<RawScoring>) -> RawGame {
        RawGame {
            home: RawTeam {
                name: Some("Yankees".to_string()),
            },
            away: RawTeam {
                name: Some("Red Sox".to_string()),
            },
            status: status.map(str::to_string),
            scoring,
        }
    }

    #[test]
    fn test_completed_game_normalizes_fully() {
        let game = normalize(
            date(),
            &raw(
                Some("closed"),
                Some(RawScoring {
                    home_runs: Some(5),
                    away_runs: Some(2),
                }),
            ),
        )
        .unwrap();

        assert_eq!(game.status, GameStatus::Completed);
        assert_eq!(game.home_runs, Some(5));
        assert_eq!(game.winner_name(), "Yankees");
    }

    #[test]
    fn test_missing_scoring_becomes_empty_not_error() {
        let game = normalize(date(), &raw(Some("inprogress"), None)).unwrap();
        assert_eq!(game.home_runs, None);
        assert_eq!(game.away_runs, None);
        assert_eq!(game.winner_name(), "");
    }

    #[test]
    fn test_partial_scoring_is_kept() {
        let game = normalize(
            date(),
            &raw(
                Some("inprogress"),
                Some(RawScoring {
                    home_runs: Some(3),
                    away_runs: None,
                }),
            ),
        )
        .unwrap();
        assert_eq!(game.home_runs, Some(3));
        assert_eq!(game.away_runs, None);
    }

    #[test]
    fn test_missing_team_name_is_rejected() {
        let mut bad = raw(Some("closed"), None);
        bad.away.name = None;
        let err = normalize(date(), &bad).unwrap_err();
        assert!(matches!(err, DugoutError::DataQuality(_)));
    }
}
