use serde::Deserialize;

/// Main configuration structure for mal-harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub scrape: ScrapeConfig,
    pub site: SiteConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub resume: ResumeConfig,
}

/// Scrape behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeConfig {
    /// How many top-ranked anime to harvest
    #[serde(rename = "item-count")]
    pub item_count: usize,

    /// Items per ranked list page
    #[serde(rename = "page-size", default = "default_page_size")]
    pub page_size: usize,

    /// Fixed capacity of the page-fetching worker pool
    #[serde(rename = "worker-pool-size", default = "default_worker_pool_size")]
    pub worker_pool_size: usize,

    /// Pause between sequential anime-detail requests (milliseconds)
    #[serde(rename = "courtesy-delay-ms", default = "default_courtesy_delay_ms")]
    pub courtesy_delay_ms: u64,

    /// Delay before the single retry of a page that extracted nothing (seconds)
    #[serde(rename = "retry-delay-secs", default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

/// Target site endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Paginated ranked-list endpoint; the page offset is appended verbatim
    #[serde(rename = "top-list-url")]
    pub top_list_url: String,

    /// Suffix appended to an anime URL to reach its reviews page
    #[serde(rename = "review-suffix", default = "default_review_suffix")]
    pub review_suffix: String,

    /// Suffix appended to an anime URL to reach its recommendations page
    #[serde(rename = "recommendation-suffix", default = "default_recommendation_suffix")]
    pub recommendation_suffix: String,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User agent string sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the CSV tables are written into
    pub directory: String,

    /// Also write one CSV per anime for reviews and recommendations
    #[serde(rename = "save-individual", default)]
    pub save_individual: bool,
}

/// Resumability for interrupted runs
///
/// Stages after the ranked list skip the first `start_offset` anime plus any
/// whose URL appears in `completed`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResumeConfig {
    #[serde(rename = "start-offset", default)]
    pub start_offset: usize,

    #[serde(default)]
    pub completed: Vec<String>,
}

fn default_page_size() -> usize {
    50
}

fn default_worker_pool_size() -> usize {
    20
}

fn default_courtesy_delay_ms() -> u64 {
    1000
}

fn default_retry_delay_secs() -> u64 {
    30
}

fn default_review_suffix() -> String {
    "/reviews".to_string()
}

fn default_recommendation_suffix() -> String {
    "/userrecs".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}
