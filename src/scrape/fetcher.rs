//! HTTP page fetcher
//!
//! This module handles all HTTP requests for the scraper:
//! - Building the HTTP client with the configured user agent
//! - GET requests with a per-request timeout
//! - Error classification into typed failures
//!
//! There is no retry at this level; the retry policy lives one layer up in
//! the batch collector.

use crate::config::HttpConfig;
use crate::{ScrapeError, ScrapeResult};
use reqwest::Client;
use std::time::Duration;

/// Builds the HTTP client shared by all workers in a run
///
/// # Arguments
///
/// * `config` - The HTTP client configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one page and returns its body
///
/// Issues a single GET with the given timeout. Connection failures and
/// timeouts are always converted into a typed [`ScrapeError`], never left as
/// an uncaught fault; the caller decides what a failed page means for the
/// batch.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - A well-formed absolute URL
/// * `timeout` - Per-request timeout
pub async fn fetch_page(client: &Client, url: &str, timeout: Duration) -> ScrapeResult<String> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    response.text().await.map_err(|e| classify_error(url, e))
}

/// Classifies a reqwest error into the scrape error taxonomy
fn classify_error(url: &str, error: reqwest::Error) -> ScrapeError {
    if error.is_timeout() {
        ScrapeError::Timeout {
            url: url.to_string(),
        }
    } else {
        ScrapeError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_http_config() -> HttpConfig {
        HttpConfig {
            user_agent: "mal-harvest-test/1.0".to_string(),
            request_timeout_secs: 1,
        }
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&test_http_config());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_page_returns_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>hi</html>"))
            .mount(&mock_server)
            .await;

        let client = build_http_client(&test_http_config()).unwrap();
        let url = format!("{}/page", mock_server.uri());
        let body = fetch_page(&client, &url, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(body, "<html>hi</html>");
    }

    #[tokio::test]
    async fn test_fetch_page_timeout_is_typed() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&mock_server)
            .await;

        let client = build_http_client(&test_http_config()).unwrap();
        let url = format!("{}/slow", mock_server.uri());
        let err = fetch_page(&client, &url, Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Timeout { .. }));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_fetch_page_connection_failure_is_typed() {
        let client = build_http_client(&test_http_config()).unwrap();
        // Nothing listens on this port
        let err = fetch_page(&client, "http://127.0.0.1:9/", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::Network { .. } | ScrapeError::Timeout { .. }
        ));
    }
}
