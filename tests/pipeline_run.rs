//! End-to-end pipeline runs against in-memory providers and a temp-dir
//! CSV sink.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};

use dugout::config::AppConfig;
use dugout::domain::GameOdds;
use dugout::error::{DugoutError, ProviderError, Result};
use dugout::provider::{OddsProvider, RawGame, RawSchedule, RawScoring, RawTeam, StatsProvider};
use dugout::secrets::KeyChain;
use dugout::sink::{CsvDirSink, TabularSink, DERIVED_METRICS, GAMES, MATCHUPS};
use dugout::{Pipeline, RunSummary};

fn raw_game(home: &str, away: &str, home_runs: u32, away_runs: u32) -> RawGame {
    RawGame {
        home: RawTeam {
            name: Some(home.to_string()),
        },
        away: RawTeam {
            name: Some(away.to_string()),
        },
        status: Some("closed".to_string()),
        scoring: Some(RawScoring {
            home_runs: Some(home_runs),
            away_runs: Some(away_runs),
        }),
    }
}

struct FakeStats {
    schedules: HashMap<NaiveDate, Vec<RawGame>>,
    failing: Vec<NaiveDate>,
}

#[async_trait]
impl StatsProvider for FakeStats {
    async fn fetch_schedule(&self, date: NaiveDate) -> Result<RawSchedule> {
        if self.failing.contains(&date) {
            return Err(DugoutError::Provider {
                date,
                source: ProviderError::Rejected { status: 403 },
            });
        }
        Ok(RawSchedule {
            games: self.schedules.get(&date).cloned().unwrap_or_default(),
        })
    }
}

struct FakeOdds {
    lines: Vec<GameOdds>,
}

#[async_trait]
impl OddsProvider for FakeOdds {
    async fn fetch_odds(&self) -> Result<Vec<GameOdds>> {
        Ok(self.lines.clone())
    }
}

fn test_config(sink_dir: &std::path::Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.provider.rate_limit_ms = 0;
    config.provider.retry_base_ms = 1;
    config.sink.dir = sink_dir.to_string_lossy().into_owned();
    config
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn today_schedule() -> HashMap<NaiveDate, Vec<RawGame>> {
    let mut schedules = HashMap::new();
    schedules.insert(
        today(),
        vec![
            raw_game("Yankees", "Red Sox", 6, 2),
            raw_game("Red Sox", "Yankees", 4, 4),
        ],
    );
    schedules
}

async fn run_pipeline(
    config: AppConfig,
    stats: FakeStats,
    odds: Option<FakeOdds>,
    days: u32,
) -> (RunSummary, CsvDirSink) {
    let sink_dir = config.sink.dir.clone();
    let pipeline = Pipeline::new(
        config,
        Arc::new(stats),
        odds.map(|o| Arc::new(o) as Arc<dyn OddsProvider>),
        Arc::new(CsvDirSink::new(&sink_dir).unwrap()),
    );
    let summary = pipeline.run(days).await.unwrap();
    (summary, CsvDirSink::new(&sink_dir).unwrap())
}

#[tokio::test]
async fn test_full_run_writes_all_tables() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let odds = FakeOdds {
        lines: vec![GameOdds {
            home_team: "Yankees".to_string(),
            away_team: "Red Sox".to_string(),
            home_odds: Some(-150),
            away_odds: Some(130),
        }],
    };

    let (summary, sink) = run_pipeline(
        config,
        FakeStats {
            schedules: today_schedule(),
            failing: vec![],
        },
        Some(odds),
        1,
    )
    .await;

    assert_eq!(summary.games_fetched, 2);
    assert_eq!(summary.dates_failed, 0);
    assert_eq!(summary.derived_rows, 2);

    let games = sink.read_rows(&GAMES).unwrap();
    assert_eq!(games.len(), 2);
    assert_eq!(games[0][6], "Yankees"); // winner column

    let derived = sink.read_rows(&DERIVED_METRICS).unwrap();
    assert_eq!(derived.len(), 2);
    let keyed = derived
        .iter()
        .find(|r| r[0].ends_with("|Yankees|Red Sox"))
        .unwrap();
    // implied_prob_home for -150 is 0.60
    assert_eq!(keyed[5], "0.6000");
    assert!(!keyed[7].is_empty(), "ev_home should be defined");
}

#[tokio::test]
async fn test_run_without_odds_leaves_ev_empty() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let (summary, sink) = run_pipeline(
        config,
        FakeStats {
            schedules: today_schedule(),
            failing: vec![],
        },
        None,
        1,
    )
    .await;

    // 2 rows x 4 odds-dependent fields
    assert_eq!(summary.metrics_undefined, 8);
    for row in sink.read_rows(&DERIVED_METRICS).unwrap() {
        assert_eq!(row[5], "");
        assert_eq!(row[7], "");
    }
}

#[tokio::test]
async fn test_failed_date_is_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let yesterday = today() - Duration::days(1);

    let (summary, sink) = run_pipeline(
        config,
        FakeStats {
            schedules: today_schedule(),
            failing: vec![yesterday],
        },
        None,
        2,
    )
    .await;

    assert_eq!(summary.dates_requested, 2);
    assert_eq!(summary.dates_failed, 1);
    assert_eq!(summary.games_fetched, 2);

    // Only today's rows made it; the failed date is simply absent.
    let games = sink.read_rows(&GAMES).unwrap();
    assert!(games.iter().all(|r| r[0] == today().to_string()));
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let stats = || FakeStats {
        schedules: today_schedule(),
        failing: vec![],
    };

    let (_, _) = run_pipeline(config.clone(), stats(), None, 1).await;
    let (_, sink) = run_pipeline(config, stats(), None, 1).await;

    // Overwrite-by-key: same slate twice yields no duplicates.
    assert_eq!(sink.read_rows(&GAMES).unwrap().len(), 2);
    assert_eq!(sink.read_rows(&DERIVED_METRICS).unwrap().len(), 2);
}

#[tokio::test]
async fn test_matchup_csv_is_validated_merged_and_classified() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());

    let matchup_path = dir.path().join("matchup_input.csv");
    let mut file = std::fs::File::create(&matchup_path).unwrap();
    writeln!(
        file,
        "pitcher_id,batter_id,at_bats,hits,home_runs,strikeouts,avg,obp"
    )
    .unwrap();
    // Two samples for the same pair, plus one invalid row (hits > at-bats).
    writeln!(file, "deGrom,Trout,15,3,1,8,0.200,0.294").unwrap();
    writeln!(file, "deGrom,Trout,10,4,1,2,0.400,0.450").unwrap();
    writeln!(file, "Cole,Judge,3,5,0,0,0.900,0.500").unwrap();
    drop(file);
    config.sink.matchups_csv = Some(matchup_path.to_string_lossy().into_owned());

    let (summary, sink) = run_pipeline(
        config,
        FakeStats {
            schedules: today_schedule(),
            failing: vec![],
        },
        None,
        1,
    )
    .await;

    assert_eq!(summary.matchups_classified, 1);
    assert_eq!(summary.data_quality_rejects, 1);

    let matchups = sink.read_rows(&MATCHUPS).unwrap();
    assert_eq!(matchups.len(), 1);
    // Merged counts: 25 AB, 7 hits.
    assert_eq!(matchups[0][2], "25");
    assert_eq!(matchups[0][3], "7");
    // Advantage and confidence columns populated.
    assert!(["pitcher", "batter", "neutral"].contains(&matchups[0][8].as_str()));
    assert_eq!(matchups[0][9], "1.00");
}

#[tokio::test]
async fn test_missing_required_key_aborts_run() {
    let config = AppConfig::default();
    let keys = KeyChain::new(vec![]);
    let err = Pipeline::from_config(config, &keys).unwrap_err();
    assert!(matches!(err, DugoutError::MissingKey(name) if name == "SPORTRADAR_KEY"));
}
