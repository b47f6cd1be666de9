//! Harvest coordinator - main run orchestration
//!
//! Drives the four stages in order: the ranked top list (concurrent page
//! batch), then per-anime details (serial, courtesy-delayed), reviews and
//! recommendations (concurrent batches over per-anime URLs). Each stage
//! writes its CSV table before the next starts; failed pages are logged and
//! skipped, never abort the run.

use crate::config::{Config, ResumeConfig};
use crate::output;
use crate::record::Record;
use crate::scrape::batch::{collect_batch, BatchOptions, BatchOutcome, PageTask};
use crate::scrape::clean;
use crate::scrape::fetcher::{build_http_client, fetch_page};
use crate::scrape::templates::{detail, list, recommendations, reviews};
use crate::{Result, ScrapeResult};
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Per-run switches, set from the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Stop after the ranked list stage
    pub list_only: bool,
}

/// What one run produced
#[derive(Debug)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub list_rows: usize,
    pub detail_rows: usize,
    pub review_rows: usize,
    pub recommendation_rows: usize,
    pub failed_pages: usize,
}

/// One anime as carried between stages: identity columns for the later
/// tables
#[derive(Debug, Clone)]
struct AnimeRef {
    title: String,
    url: String,
}

/// Main harvest coordinator structure
pub struct Coordinator {
    config: Config,
    client: Client,
    output_dir: PathBuf,
}

impl Coordinator {
    /// Creates a new coordinator from a validated configuration
    pub fn new(config: Config) -> Result<Self> {
        let client = build_http_client(&config.http)?;
        let output_dir = PathBuf::from(&config.output.directory);
        Ok(Self {
            config,
            client,
            output_dir,
        })
    }

    /// Runs the harvest stages and writes their tables
    ///
    /// A run always completes and always writes the rows that succeeded;
    /// failed pages are counted, logged with their URL, and excluded.
    pub async fn run(&self, options: RunOptions) -> Result<RunSummary> {
        let started_at = Utc::now();
        std::fs::create_dir_all(&self.output_dir)?;

        let item_count = self.config.scrape.item_count;
        tracing::info!(item_count, "harvest starting");

        // Stage 1: ranked top list
        let list_outcome = self.harvest_top_list().await;
        let mut failed_pages = list_outcome.failure_count();
        let mut list_records = list_outcome.into_records();
        list_records.truncate(item_count);
        output::write_table(
            &output::top_list_path(&self.output_dir, item_count),
            &list::SCHEMA,
            &list_records,
        )?;

        let mut summary = RunSummary {
            started_at,
            finished_at: Utc::now(),
            list_rows: list_records.len(),
            detail_rows: 0,
            review_rows: 0,
            recommendation_rows: 0,
            failed_pages,
        };

        if options.list_only {
            tracing::info!("list-only run, skipping detail stages");
            return Ok(summary);
        }

        let items = pending_items(&list_records, &self.config.resume);
        tracing::info!(
            listed = list_records.len(),
            pending = items.len(),
            "per-anime stages starting"
        );

        // Stage 2: details, serial with a courtesy delay between requests
        let (detail_records, detail_failures) = self.harvest_details(&items).await;
        failed_pages += detail_failures;
        output::write_table(
            &output::details_path(&self.output_dir, items.len()),
            &detail::SCHEMA,
            &detail_records,
        )?;

        // Stage 3: reviews
        let review_outcome = self
            .harvest_per_anime(&items, &self.config.site.review_suffix, reviews::extract)
            .await;
        failed_pages += review_outcome.failure_count();
        if self.config.output.save_individual {
            self.write_individual(&items, &review_outcome, Table::Reviews)?;
        }
        let review_records = review_outcome.into_records();
        output::write_table(
            &output::reviews_path(&self.output_dir),
            &reviews::SCHEMA,
            &review_records,
        )?;

        // Stage 4: recommendations
        let rec_outcome = self
            .harvest_per_anime(
                &items,
                &self.config.site.recommendation_suffix,
                recommendations::extract,
            )
            .await;
        failed_pages += rec_outcome.failure_count();
        if self.config.output.save_individual {
            self.write_individual(&items, &rec_outcome, Table::Recommendations)?;
        }
        let rec_records = rec_outcome.into_records();
        output::write_table(
            &output::recommendations_path(&self.output_dir),
            &recommendations::SCHEMA,
            &rec_records,
        )?;

        summary.detail_rows = detail_records.len();
        summary.review_rows = review_records.len();
        summary.recommendation_rows = rec_records.len();
        summary.failed_pages = failed_pages;
        summary.finished_at = Utc::now();

        tracing::info!(
            list = summary.list_rows,
            details = summary.detail_rows,
            reviews = summary.review_rows,
            recommendations = summary.recommendation_rows,
            failed = summary.failed_pages,
            "harvest complete"
        );
        Ok(summary)
    }

    /// Stage 1: splits the target item count into page windows and fetches
    /// them through the bounded worker pool
    async fn harvest_top_list(&self) -> BatchOutcome {
        let page_size = self.config.scrape.page_size;
        let tasks: Vec<PageTask> = (0..self.config.scrape.item_count)
            .step_by(page_size)
            .enumerate()
            .map(|(page_index, offset)| PageTask {
                url: format!("{}{}", self.config.site.top_list_url, offset),
                page_index,
            })
            .collect();

        let client = self.client.clone();
        let timeout = self.timeout();
        collect_batch(tasks, &self.batch_options(), move |task: PageTask| {
            let client = client.clone();
            async move {
                let body = fetch_page(&client, &task.url, timeout).await?;
                list::extract(&body)
            }
        })
        .await
    }

    /// Stage 2: one detail record per anime, fetched serially
    ///
    /// The courtesy delay between requests bounds the outbound rate to the
    /// detail endpoint; it is independent of the list batch's pool size.
    async fn harvest_details(&self, items: &[AnimeRef]) -> (Vec<Record>, usize) {
        let courtesy_delay = Duration::from_millis(self.config.scrape.courtesy_delay_ms);
        let mut records = Vec::with_capacity(items.len());
        let mut failures = 0;

        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(courtesy_delay).await;
            }
            match self.fetch_detail(item).await {
                Ok(record) => records.push(record),
                Err(error) => {
                    tracing::warn!(url = %item.url, %error, "detail page failed, skipping");
                    failures += 1;
                }
            }
        }

        (records, failures)
    }

    /// Fetches and extracts one detail page, with the one-shot retry on
    /// extraction failures
    async fn fetch_detail(&self, item: &AnimeRef) -> ScrapeResult<Record> {
        match self.fetch_detail_once(item).await {
            Ok(record) => Ok(record),
            Err(error) if error.is_retryable() => {
                tracing::warn!(url = %item.url, %error, "detail extraction failed, retrying once");
                tokio::time::sleep(self.retry_delay()).await;
                self.fetch_detail_once(item).await
            }
            Err(error) => Err(error),
        }
    }

    async fn fetch_detail_once(&self, item: &AnimeRef) -> ScrapeResult<Record> {
        let body = fetch_page(&self.client, &item.url, self.timeout()).await?;
        let mut record = detail::extract(&body, &item.title, &item.url)?;
        clean::normalize_detail(&mut record);
        Ok(record)
    }

    /// Stages 3 and 4: one task per anime, URL derived by appending the
    /// template's fixed suffix, dispatched through the worker pool
    async fn harvest_per_anime(
        &self,
        items: &[AnimeRef],
        suffix: &str,
        extract: fn(&str, &str, &str) -> ScrapeResult<Vec<Record>>,
    ) -> BatchOutcome {
        let targets: Arc<Vec<AnimeRef>> = Arc::new(
            items
                .iter()
                .map(|item| AnimeRef {
                    title: item.title.clone(),
                    url: format!("{}{}", item.url, suffix),
                })
                .collect(),
        );
        let tasks: Vec<PageTask> = targets
            .iter()
            .enumerate()
            .map(|(page_index, target)| PageTask {
                url: target.url.clone(),
                page_index,
            })
            .collect();

        let client = self.client.clone();
        let timeout = self.timeout();
        let targets_for_workers = targets.clone();
        collect_batch(tasks, &self.batch_options(), move |task: PageTask| {
            let client = client.clone();
            let targets = targets_for_workers.clone();
            async move {
                let body = fetch_page(&client, &task.url, timeout).await?;
                let target = &targets[task.page_index];
                extract(&body, &target.title, &target.url)
            }
        })
        .await
    }

    /// Writes one CSV per anime that produced records
    fn write_individual(
        &self,
        items: &[AnimeRef],
        outcome: &BatchOutcome,
        table: Table,
    ) -> Result<()> {
        for result in outcome.results.iter().filter(|r| r.ok() && !r.records.is_empty()) {
            let title = &items[result.page_index].title;
            let (path, schema) = match table {
                Table::Reviews => (
                    output::individual_reviews_path(&self.output_dir, title),
                    &reviews::SCHEMA,
                ),
                Table::Recommendations => (
                    output::individual_recommendations_path(&self.output_dir, title),
                    &recommendations::SCHEMA,
                ),
            };
            output::write_table(&path, schema, &result.records)?;
        }
        Ok(())
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.http.request_timeout_secs)
    }

    fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.config.scrape.retry_delay_secs)
    }

    fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            worker_pool_size: self.config.scrape.worker_pool_size,
            retry_delay: self.retry_delay(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Table {
    Reviews,
    Recommendations,
}

/// Applies the resume parameters: skips the leading `start_offset` anime
/// plus any whose URL is in the completed set
fn pending_items(list_records: &[Record], resume: &ResumeConfig) -> Vec<AnimeRef> {
    let completed: HashSet<&str> = resume.completed.iter().map(String::as_str).collect();
    list_records
        .iter()
        .skip(resume.start_offset)
        .filter(|record| !completed.contains(record.get("MAL Link")))
        .map(|record| AnimeRef {
            title: record.get("Anime Title").to_string(),
            url: record.get("MAL Link").to_string(),
        })
        .collect()
}
