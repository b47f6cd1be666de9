use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// This is used to tell apart output produced by different configurations.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[scrape]
item-count = 1000
page-size = 50
worker-pool-size = 20
courtesy-delay-ms = 1000
retry-delay-secs = 30

[site]
top-list-url = "https://myanimelist.net/topanime.php?limit="

[http]
user-agent = "mal-harvest/1.0"
request-timeout-secs = 10

[output]
directory = "Data"
save-individual = true
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.scrape.item_count, 1000);
        assert_eq!(config.scrape.worker_pool_size, 20);
        assert_eq!(config.http.user_agent, "mal-harvest/1.0");
        assert!(config.output.save_individual);
        // Defaulted sections and fields
        assert_eq!(config.site.review_suffix, "/reviews");
        assert_eq!(config.site.recommendation_suffix, "/userrecs");
        assert_eq!(config.resume.start_offset, 0);
        assert!(config.resume.completed.is_empty());
    }

    #[test]
    fn test_optional_knobs_default() {
        let config_content = r#"
[scrape]
item-count = 100

[site]
top-list-url = "https://myanimelist.net/topanime.php?limit="

[http]
user-agent = "mal-harvest/1.0"

[output]
directory = "Data"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.scrape.page_size, 50);
        assert_eq!(config.scrape.worker_pool_size, 20);
        assert_eq!(config.scrape.courtesy_delay_ms, 1000);
        assert_eq!(config.scrape.retry_delay_secs, 30);
        assert_eq!(config.http.request_timeout_secs, 10);
        assert!(!config.output.save_individual);
    }

    #[test]
    fn test_resume_section() {
        let config_content = r#"
[scrape]
item-count = 100

[site]
top-list-url = "https://myanimelist.net/topanime.php?limit="

[http]
user-agent = "mal-harvest/1.0"

[output]
directory = "Data"

[resume]
start-offset = 40
completed = ["https://myanimelist.net/anime/1/Cowboy_Bebop"]
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.resume.start_offset, 40);
        assert_eq!(config.resume.completed.len(), 1);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[scrape]
item-count = 100
worker-pool-size = 0

[site]
top-list-url = "https://myanimelist.net/topanime.php?limit="

[http]
user-agent = "mal-harvest/1.0"

[output]
directory = "Data"
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let config_content = "test content";
        let file = create_temp_config(config_content);

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        // Same content should produce same hash
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64); // SHA-256 produces 64 hex characters
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
