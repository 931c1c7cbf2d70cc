use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a game as reported by the stats provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Scheduled,
    InProgress,
    Completed,
    /// Anything the provider reports that we do not model (postponed,
    /// suspended, ...). Kept verbatim for the sink.
    Other(String),
}

impl GameStatus {
    /// Lenient parse of provider status strings.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "scheduled" | "created" => GameStatus::Scheduled,
            "inprogress" | "in_progress" | "in-progress" | "live" => GameStatus::InProgress,
            "completed" | "complete" | "closed" | "final" => GameStatus::Completed,
            other => GameStatus::Other(other.to_string()),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, GameStatus::Completed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            GameStatus::Scheduled => "scheduled",
            GameStatus::InProgress => "inprogress",
            GameStatus::Completed => "completed",
            GameStatus::Other(s) => s,
        }
    }
}

/// Outcome of a completed game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameWinner {
    Home,
    Away,
    Tie,
}

/// One game row in the canonical schema.
///
/// Keyed by (date, home_team, away_team); immutable once completed. Run
/// counts are optional because in-progress and scheduled games routinely
/// come back without scoring data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub home_runs: Option<u32>,
    pub away_runs: Option<u32>,
    pub status: GameStatus,
}

impl GameRecord {
    /// Stable upsert key for the tabular sink.
    pub fn key(&self) -> String {
        format!("{}|{}|{}", self.date, self.home_team, self.away_team)
    }

    /// Winner, derivable only for completed games with both run counts.
    pub fn winner(&self) -> Option<GameWinner> {
        if !self.status.is_completed() {
            return None;
        }
        match (self.home_runs, self.away_runs) {
            (Some(h), Some(a)) if h > a => Some(GameWinner::Home),
            (Some(h), Some(a)) if a > h => Some(GameWinner::Away),
            (Some(_), Some(_)) => Some(GameWinner::Tie),
            _ => None,
        }
    }

    /// Winner column value for the sink: a team name, "Tie", or empty.
    pub fn winner_name(&self) -> String {
        match self.winner() {
            Some(GameWinner::Home) => self.home_team.clone(),
            Some(GameWinner::Away) => self.away_team.clone(),
            Some(GameWinner::Tie) => "Tie".to_string(),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(status: GameStatus, home: Option<u32>, away: Option<u32>) -> GameRecord {
        GameRecord {
            date: NaiveDate::from_ymd_opt(2025, 7, 27).unwrap(),
            home_team: "Yankees".to_string(),
            away_team: "Red Sox".to_string(),
            home_runs: home,
            away_runs: away,
            status,
        }
    }

    #[test]
    fn test_status_parse_lenient() {
        assert_eq!(GameStatus::parse("Closed"), GameStatus::Completed);
        assert_eq!(GameStatus::parse("complete"), GameStatus::Completed);
        assert_eq!(GameStatus::parse("inprogress"), GameStatus::InProgress);
        assert_eq!(
            GameStatus::parse("postponed"),
            GameStatus::Other("postponed".to_string())
        );
    }

    #[test]
    fn test_winner_only_when_completed() {
        let g = game(GameStatus::InProgress, Some(5), Some(2));
        assert_eq!(g.winner(), None);
        assert_eq!(g.winner_name(), "");

        let g = game(GameStatus::Completed, Some(5), Some(2));
        assert_eq!(g.winner(), Some(GameWinner::Home));
        assert_eq!(g.winner_name(), "Yankees");
    }

    #[test]
    fn test_winner_requires_both_run_counts() {
        let g = game(GameStatus::Completed, Some(5), None);
        assert_eq!(g.winner(), None);
    }

    #[test]
    fn test_key_is_stable() {
        let g = game(GameStatus::Scheduled, None, None);
        assert_eq!(g.key(), "2025-07-27|Yankees|Red Sox");
    }
}
