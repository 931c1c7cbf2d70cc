pub mod classifier;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod evaluator;
pub mod fetcher;
pub mod metrics;
pub mod normalizer;
pub mod pipeline;
pub mod provider;
pub mod secrets;
pub mod sink;

pub use classifier::{Advantage, MatchupCall, MatchupClassifier};
pub use config::AppConfig;
pub use domain::{DerivedMetricRow, GameOdds, GameRecord, GameStatus, MatchupRecord, ParkFactor};
pub use error::{DugoutError, MetricError, ProviderError, Result};
pub use evaluator::MetricEvaluator;
pub use fetcher::{FetchOutcome, Fetcher};
pub use pipeline::{Pipeline, RunSummary};
pub use secrets::KeyChain;
pub use sink::{CsvDirSink, TabularSink};
