use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub odds: OddsConfig,
    #[serde(default)]
    pub sink: SinkConfig,
    #[serde(default)]
    pub evaluator: EvaluatorConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub secrets: SecretsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// REST base URL for the stats provider
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Fixed delay between date requests in milliseconds (observed provider
    /// budget is roughly one call per 1.1s)
    #[serde(default = "default_rate_limit_ms")]
    pub rate_limit_ms: u64,
    /// Size of the "last N days" lookback window
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
    /// Maximum retry attempts for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u8,
    /// Base backoff delay in milliseconds, doubled per attempt
    #[serde(default = "default_retry_base_ms")]
    pub retry_base_ms: u64,
}

fn default_provider_base_url() -> String {
    "https://api.sportradar.com/mlb/trial/v7/en".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_rate_limit_ms() -> u64 {
    1100
}

fn default_lookback_days() -> u32 {
    14
}

fn default_max_retries() -> u8 {
    3
}

fn default_retry_base_ms() -> u64 {
    500
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_provider_base_url(),
            timeout_secs: default_timeout_secs(),
            rate_limit_ms: default_rate_limit_ms(),
            lookback_days: default_lookback_days(),
            max_retries: default_max_retries(),
            retry_base_ms: default_retry_base_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OddsConfig {
    /// REST base URL for the odds provider
    #[serde(default = "default_odds_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Whether to fetch odds at all; without odds the EV columns stay
    /// undefined
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_odds_base_url() -> String {
    "https://api.the-odds-api.com/v4".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for OddsConfig {
    fn default() -> Self {
        Self {
            base_url: default_odds_base_url(),
            timeout_secs: default_timeout_secs(),
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SinkConfig {
    /// Directory holding one CSV file per table
    #[serde(default = "default_sink_dir")]
    pub dir: String,
    /// Park factor reference CSV; built-in sample data when absent
    #[serde(default)]
    pub park_factors_csv: Option<String>,
    /// Matchup input CSV with historical pitcher/batter lines
    #[serde(default)]
    pub matchups_csv: Option<String>,
}

fn default_sink_dir() -> String {
    "data".to_string()
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            dir: default_sink_dir(),
            park_factors_csv: None,
            matchups_csv: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluatorConfig {
    /// Run threshold k for the Poisson columns
    #[serde(default = "default_target_runs")]
    pub target_runs: u32,
    /// League FIP constant
    #[serde(default = "default_fip_constant")]
    pub fip_constant: f64,
    /// Stake in units used for EV quoting
    #[serde(default = "default_stake")]
    pub stake: f64,
}

fn default_target_runs() -> u32 {
    5
}

fn default_fip_constant() -> f64 {
    crate::metrics::DEFAULT_FIP_CONSTANT
}

fn default_stake() -> f64 {
    crate::metrics::DEFAULT_STAKE
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            target_runs: default_target_runs(),
            fip_constant: default_fip_constant(),
            stake: default_stake(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// At-bat count at which confidence reaches 1.0
    #[serde(default = "default_confidence_at_bats")]
    pub confidence_at_bats: u32,
    /// Relative OPS band treated as no advantage (0.05 = 5%)
    #[serde(default = "default_neutral_band")]
    pub neutral_band: f64,
    /// Below this sample the call is forced neutral
    #[serde(default = "default_min_sample_size")]
    pub min_sample_size: u32,
}

fn default_confidence_at_bats() -> u32 {
    20
}

fn default_neutral_band() -> f64 {
    0.05
}

fn default_min_sample_size() -> u32 {
    5
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            confidence_at_bats: default_confidence_at_bats(),
            neutral_band: default_neutral_band(),
            min_sample_size: default_min_sample_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SecretsConfig {
    /// Optional JSON key file consulted after the environment
    #[serde(default)]
    pub key_file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("DUGOUT_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (DUGOUT_PROVIDER__BASE_URL, etc.)
            .add_source(
                Environment::with_prefix("DUGOUT")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.provider.lookback_days == 0 {
            errors.push("provider.lookback_days must be at least 1".to_string());
        }

        if self.provider.timeout_secs == 0 {
            errors.push("provider.timeout_secs must be positive".to_string());
        }

        if self.evaluator.stake <= 0.0 {
            errors.push("evaluator.stake must be positive".to_string());
        }

        if self.classifier.confidence_at_bats == 0 {
            errors.push("classifier.confidence_at_bats must be at least 1".to_string());
        }

        if !(0.0..1.0).contains(&self.classifier.neutral_band) {
            errors.push("classifier.neutral_band must be in [0, 1)".to_string());
        }

        if self.classifier.min_sample_size > self.classifier.confidence_at_bats {
            errors.push(
                "classifier.min_sample_size should not exceed classifier.confidence_at_bats"
                    .to_string(),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            odds: OddsConfig::default(),
            sink: SinkConfig::default(),
            evaluator: EvaluatorConfig::default(),
            classifier: ClassifierConfig::default(),
            secrets: SecretsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.provider.lookback_days, 14);
        assert_eq!(config.provider.rate_limit_ms, 1100);
        assert_eq!(config.evaluator.target_runs, 5);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.provider.lookback_days = 0;
        config.classifier.neutral_band = 1.5;
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_validate_rejects_sample_floor_above_saturation() {
        let mut config = AppConfig::default();
        config.classifier.min_sample_size = 50;
        assert!(config.validate().is_err());
    }
}
