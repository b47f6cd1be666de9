//! Scrape module for page fetching and extraction
//!
//! This module contains the core harvest logic, including:
//! - HTTP fetching with typed error classification
//! - Page templates that extract records from HTML
//! - The bounded worker pool for concurrent page batches
//! - Overall run coordination across the four stages

mod batch;
pub mod clean;
mod coordinator;
mod fetcher;
pub mod templates;

pub use batch::{
    collect_batch, BatchOptions, BatchOutcome, ExtractionResult, PageTask, TaskState,
};
pub use coordinator::{Coordinator, RunOptions, RunSummary};
pub use fetcher::{build_http_client, fetch_page};

use crate::config::Config;
use crate::Result;

/// Runs a complete harvest
///
/// This is the main entry point for a run. It will:
/// 1. Build the HTTP client
/// 2. Fetch the ranked list pages through the worker pool
/// 3. Fetch per-anime details, reviews, and recommendations
/// 4. Write one CSV table per stage
///
/// # Arguments
///
/// * `config` - The harvest configuration
/// * `options` - Per-run switches
///
/// # Returns
///
/// * `Ok(RunSummary)` - Run completed, with per-stage row counts
/// * `Err(HarvestError)` - Run could not start or an output write failed
pub async fn harvest(config: Config, options: RunOptions) -> Result<RunSummary> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run(options).await
}
