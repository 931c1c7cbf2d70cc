//! Conversions between domain records and sink rows.
//!
//! Undefined numeric values render as empty cells, never as zero.

use chrono::NaiveDate;

use crate::classifier::MatchupCall;
use crate::domain::{DerivedMetricRow, GameRecord, GameStatus, MatchupRecord, ParkFactor};
use crate::error::{DugoutError, Result};

pub fn game_row(game: &GameRecord) -> Vec<String> {
    vec![
        game.date.to_string(),
        game.home_team.clone(),
        game.away_team.clone(),
        game.home_runs.map(|r| r.to_string()).unwrap_or_default(),
        game.away_runs.map(|r| r.to_string()).unwrap_or_default(),
        game.status.as_str().to_string(),
        game.winner_name(),
    ]
}

/// Parse a games-table row back into a `GameRecord`.
pub fn parse_game_row(row: &[String]) -> Result<GameRecord> {
    if row.len() < 6 {
        return Err(DugoutError::DataQuality(format!(
            "games row has {} columns, expected at least 6",
            row.len()
        )));
    }
    let date: NaiveDate = row[0]
        .parse()
        .map_err(|_| DugoutError::DataQuality(format!("unparseable game date: {}", row[0])))?;
    Ok(GameRecord {
        date,
        home_team: row[1].clone(),
        away_team: row[2].clone(),
        home_runs: parse_optional_count(&row[3])?,
        away_runs: parse_optional_count(&row[4])?,
        status: GameStatus::parse(&row[5]),
    })
}

fn parse_optional_count(cell: &str) -> Result<Option<u32>> {
    if cell.trim().is_empty() {
        return Ok(None);
    }
    cell.trim()
        .parse::<u32>()
        .map(Some)
        .map_err(|_| DugoutError::DataQuality(format!("unparseable run count: {cell}")))
}

pub fn park_factor_row(factor: &ParkFactor) -> Vec<String> {
    vec![
        factor.park_name.clone(),
        format!("{:.2}", factor.runs_factor),
        format!("{:.2}", factor.hr_factor),
        format!("{:.2}", factor.double_factor),
        format!("{:.2}", factor.triple_factor),
    ]
}

pub fn matchup_row(record: &MatchupRecord, call: &MatchupCall) -> Vec<String> {
    vec![
        record.pitcher_id.clone(),
        record.batter_id.clone(),
        record.at_bats.to_string(),
        record.hits.to_string(),
        record.home_runs.to_string(),
        record.strikeouts.to_string(),
        format!("{:.3}", record.avg),
        format!("{:.3}", record.obp),
        call.advantage.as_str().to_string(),
        format!("{:.2}", call.confidence),
    ]
}

pub fn derived_row(row: &DerivedMetricRow) -> Vec<String> {
    vec![
        row.game_id.clone(),
        format!("{:.3}", row.lambda_home),
        format!("{:.3}", row.lambda_away),
        format!("{:.4}", row.poisson_home),
        format!("{:.4}", row.poisson_away),
        optional_cell(row.implied_prob_home, 4),
        optional_cell(row.implied_prob_away, 4),
        optional_cell(row.ev_home, 2),
        optional_cell(row.ev_away, 2),
    ]
}

fn optional_cell(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{v:.precision$}"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::game::GameStatus;

    #[test]
    fn test_game_row_round_trip() {
        let game = GameRecord {
            date: NaiveDate::from_ymd_opt(2025, 7, 27).unwrap(),
            home_team: "Yankees".to_string(),
            away_team: "Red Sox".to_string(),
            home_runs: Some(5),
            away_runs: None,
            status: GameStatus::InProgress,
        };
        let row = game_row(&game);
        assert_eq!(row[3], "5");
        assert_eq!(row[4], "");

        let parsed = parse_game_row(&row).unwrap();
        assert_eq!(parsed, game);
    }

    #[test]
    fn test_bad_cells_are_data_quality_errors() {
        let mut row = vec![
            "2025-07-27".to_string(),
            "A".to_string(),
            "B".to_string(),
            "five".to_string(),
            "".to_string(),
            "completed".to_string(),
        ];
        assert!(matches!(
            parse_game_row(&row),
            Err(DugoutError::DataQuality(_))
        ));

        row[0] = "not-a-date".to_string();
        row[3] = "5".to_string();
        assert!(matches!(
            parse_game_row(&row),
            Err(DugoutError::DataQuality(_))
        ));
    }

    #[test]
    fn test_undefined_metrics_render_as_empty_cells() {
        let derived = DerivedMetricRow {
            game_id: "g".to_string(),
            lambda_home: 4.2,
            lambda_away: 3.8,
            poisson_home: 0.1944,
            poisson_away: 0.2,
            implied_prob_home: None,
            implied_prob_away: None,
            ev_home: None,
            ev_away: None,
        };
        let row = derived_row(&derived);
        assert_eq!(&row[5..9], &["", "", "", ""]);
    }
}
