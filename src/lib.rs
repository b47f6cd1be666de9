//! mal-harvest: a MyAnimeList catalog scraper
//!
//! This crate scrapes the ranked top-anime list, per-anime metadata, user
//! reviews and recommendation graphs from MyAnimeList, persisting each stage
//! as CSV tables.

pub mod config;
pub mod output;
pub mod record;
pub mod scrape;

use thiserror::Error;

/// Main error type for mal-harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scrape error: {0}")]
    Scrape(#[from] ScrapeError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Per-page scrape failures
///
/// `Network` and `Timeout` come from the page fetcher and are never retried;
/// `Shape` and `Empty` come from extraction and are recovered once by the
/// batch collector's one-shot retry policy.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("{template} page shape mismatch: expected at least {expected} {unit}, found {found}")]
    Shape {
        template: &'static str,
        unit: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("No {template} records extracted where content was expected")]
    Empty { template: &'static str },
}

impl ScrapeError {
    /// Returns true if the batch collector should retry the task once
    ///
    /// Transient page-render variance is the expected cause of shape and
    /// empty-result failures; fetch failures are reported upward as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Shape { .. } | Self::Empty { .. })
    }
}

/// Result type alias for mal-harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for per-page scrape operations
pub type ScrapeResult<T> = std::result::Result<T, ScrapeError>;

// Re-export commonly used types
pub use config::Config;
pub use record::{Record, Schema};
pub use scrape::{collect_batch, BatchOptions, BatchOutcome, Coordinator, PageTask};
