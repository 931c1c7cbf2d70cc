use thiserror::Error;

/// Main error type for the pipeline
#[derive(Error, Debug)]
pub enum DugoutError {
    // Configuration errors (fatal, abort the run)
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Missing required API key: {0}")]
    MissingKey(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Provider errors (per-request, logged and skipped)
    #[error("Provider error for {date}: {source}")]
    Provider {
        date: chrono::NaiveDate,
        source: ProviderError,
    },

    #[error("Odds provider error: {0}")]
    OddsProvider(String),

    // Network errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // Data errors
    #[error("Data quality error: {0}")]
    DataQuality(String),

    #[error("Metric error: {0}")]
    Metric(#[from] MetricError),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for DugoutError
pub type Result<T> = std::result::Result<T, DugoutError>;

/// Per-request failures from the stats provider.
///
/// The transient/permanent split drives retry: timeouts, 5xx and 429
/// responses are retried with backoff, other 4xx responses are not.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("rate limited (429)")]
    RateLimited,

    #[error("server error: {status}")]
    Server { status: u16 },

    #[error("request rejected: {status}")]
    Rejected { status: u16 },

    #[error("malformed payload: {0}")]
    Parse(String),
}

impl ProviderError {
    /// Whether a retry with backoff is worthwhile.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Transport(_) => true,
            ProviderError::RateLimited => true,
            ProviderError::Server { .. } => true,
            ProviderError::Rejected { .. } => false,
            ProviderError::Parse(_) => false,
        }
    }
}

/// Specific error types for metric evaluation.
///
/// A metric outside its valid input domain is undefined, which is distinct
/// from a numeric zero: downstream consumers must not mistake "unknown"
/// for "no effect".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetricError {
    #[error("{metric} undefined: {reason}")]
    Undefined {
        metric: &'static str,
        reason: &'static str,
    },

    #[error("inconsistent inputs for {metric}: {reason}")]
    Inconsistent { metric: &'static str, reason: String },
}

impl MetricError {
    pub fn undefined(metric: &'static str, reason: &'static str) -> Self {
        MetricError::Undefined { metric, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_transience() {
        assert!(ProviderError::RateLimited.is_transient());
        assert!(ProviderError::Server { status: 503 }.is_transient());
        assert!(!ProviderError::Rejected { status: 403 }.is_transient());
        assert!(!ProviderError::Parse("bad json".to_string()).is_transient());
    }
}
