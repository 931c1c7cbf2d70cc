pub mod derived;
pub mod game;
pub mod matchup;
pub mod odds;
pub mod park;

pub use derived::DerivedMetricRow;
pub use game::{GameRecord, GameStatus, GameWinner};
pub use matchup::MatchupRecord;
pub use odds::GameOdds;
pub use park::ParkFactor;
