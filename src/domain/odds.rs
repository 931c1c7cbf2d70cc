use serde::{Deserialize, Serialize};

/// Moneyline odds for one game, in American format.
///
/// Sides are optional because odds feeds routinely omit lines for games
/// that are live or too far out. A missing line means the derived EV for
/// that side is undefined, never zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOdds {
    pub home_team: String,
    pub away_team: String,
    pub home_odds: Option<i32>,
    pub away_odds: Option<i32>,
}

impl GameOdds {
    /// Lookup key matching `GameRecord` team naming (date-independent;
    /// odds feeds carry only the current slate).
    pub fn key(&self) -> String {
        format!("{}|{}", self.home_team, self.away_team)
    }
}
