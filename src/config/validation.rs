use crate::config::types::{Config, HttpConfig, OutputConfig, ScrapeConfig, SiteConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scrape_config(&config.scrape)?;
    validate_site_config(&config.site)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates scrape configuration
fn validate_scrape_config(config: &ScrapeConfig) -> Result<(), ConfigError> {
    if config.item_count < 1 {
        return Err(ConfigError::Validation(format!(
            "item_count must be >= 1, got {}",
            config.item_count
        )));
    }

    if config.page_size < 1 {
        return Err(ConfigError::Validation(format!(
            "page_size must be >= 1, got {}",
            config.page_size
        )));
    }

    if config.worker_pool_size < 1 || config.worker_pool_size > 100 {
        return Err(ConfigError::Validation(format!(
            "worker_pool_size must be between 1 and 100, got {}",
            config.worker_pool_size
        )));
    }

    Ok(())
}

/// Validates site endpoints
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.top_list_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid top_list_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "top_list_url must use an HTTP(S) scheme, got '{}'",
            url.scheme()
        )));
    }

    if config.review_suffix.is_empty() || !config.review_suffix.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "review_suffix must start with '/', got '{}'",
            config.review_suffix
        )));
    }

    if config.recommendation_suffix.is_empty() || !config.recommendation_suffix.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "recommendation_suffix must start with '/', got '{}'",
            config.recommendation_suffix
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::ResumeConfig;

    fn valid_config() -> Config {
        Config {
            scrape: ScrapeConfig {
                item_count: 200,
                page_size: 50,
                worker_pool_size: 20,
                courtesy_delay_ms: 1000,
                retry_delay_secs: 30,
            },
            site: SiteConfig {
                top_list_url: "https://myanimelist.net/topanime.php?limit=".to_string(),
                review_suffix: "/reviews".to_string(),
                recommendation_suffix: "/userrecs".to_string(),
            },
            http: HttpConfig {
                user_agent: "mal-harvest/1.0".to_string(),
                request_timeout_secs: 10,
            },
            output: OutputConfig {
                directory: "Data".to_string(),
                save_individual: false,
            },
            resume: ResumeConfig::default(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_zero_item_count_rejected() {
        let mut config = valid_config();
        config.scrape.item_count = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_oversized_worker_pool_rejected() {
        let mut config = valid_config();
        config.scrape.worker_pool_size = 101;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_malformed_list_url_rejected() {
        let mut config = valid_config();
        config.site.top_list_url = "not a url".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_non_http_list_url_rejected() {
        let mut config = valid_config();
        config.site.top_list_url = "ftp://myanimelist.net/topanime.php?limit=".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_suffix_without_slash_rejected() {
        let mut config = valid_config();
        config.site.review_suffix = "reviews".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_user_agent_rejected() {
        let mut config = valid_config();
        config.http.user_agent = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_output_directory_rejected() {
        let mut config = valid_config();
        config.output.directory = String::new();
        assert!(validate(&config).is_err());
    }
}
