//! Tabular sink: named tables with fixed header schemas.
//!
//! The sink is the only data channel between pipeline stages — the fetcher
//! writes games, the evaluator reads them back and writes derived rows.
//! Semantics per table: create-if-absent, overwrite-by-key, never append
//! a duplicate key. Last writer wins per key.

pub mod csv_dir;
pub mod rows;

use crate::error::Result;

pub use csv_dir::CsvDirSink;

/// Fixed schema of one table.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub name: &'static str,
    pub headers: &'static [&'static str],
    /// Number of leading columns forming the upsert key.
    pub key_columns: usize,
}

impl TableSpec {
    /// Upsert key of a row under this spec.
    pub fn key_of(&self, row: &[String]) -> String {
        row.iter()
            .take(self.key_columns)
            .cloned()
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// Game rows in the canonical schema (the "Historical Data" tab).
pub const GAMES: TableSpec = TableSpec {
    name: "games",
    headers: &[
        "date",
        "home_team",
        "away_team",
        "home_runs",
        "away_runs",
        "status",
        "winner",
    ],
    key_columns: 3,
};

/// Static park adjustment reference data.
pub const PARK_FACTORS: TableSpec = TableSpec {
    name: "park_factors",
    headers: &[
        "park_name",
        "runs_factor",
        "hr_factor",
        "double_factor",
        "triple_factor",
    ],
    key_columns: 1,
};

/// Pitcher/batter head-to-head lines with the classifier's verdict.
pub const MATCHUPS: TableSpec = TableSpec {
    name: "matchups",
    headers: &[
        "pitcher_id",
        "batter_id",
        "at_bats",
        "hits",
        "home_runs",
        "strikeouts",
        "avg",
        "obp",
        "advantage",
        "confidence",
    ],
    key_columns: 2,
};

/// Derived metric rows, recomputed each run.
pub const DERIVED_METRICS: TableSpec = TableSpec {
    name: "derived_metrics",
    headers: &[
        "game_id",
        "lambda_home",
        "lambda_away",
        "poisson_home",
        "poisson_away",
        "implied_prob_home",
        "implied_prob_away",
        "ev_home",
        "ev_away",
    ],
    key_columns: 1,
};

/// A named, keyed tabular store.
pub trait TabularSink: Send + Sync {
    /// Create the table if absent, replace rows whose key already exists,
    /// append the rest. Returns the number of rows written.
    fn upsert(&self, spec: &TableSpec, rows: Vec<Vec<String>>) -> Result<usize>;

    /// All data rows of a table; empty when the table does not exist yet.
    fn read_rows(&self, spec: &TableSpec) -> Result<Vec<Vec<String>>>;
}
