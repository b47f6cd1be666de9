//! Batch collector: bounded-concurrency page fetching with one-shot retry
//!
//! Given a list of page tasks, the collector dispatches fetch-and-extract
//! work across a fixed-capacity worker pool, buffers each worker's result,
//! and concatenates extracted records in ascending page-index order no
//! matter which worker finishes first. A page whose extraction yields
//! nothing gets exactly one retry after a fixed delay; a persistent failure
//! is logged and excluded from the aggregate instead of aborting the batch.

use crate::record::Record;
use crate::{ScrapeError, ScrapeResult};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// One page's worth of work, created when a total item count is split into
/// fixed-size page windows
#[derive(Debug, Clone)]
pub struct PageTask {
    /// Absolute URL of the page
    pub url: String,

    /// Position of this page in the batch; determines output order
    pub page_index: usize,
}

/// State of one task inside the collector
///
/// Transitions: `Pending -> Fetching -> {Succeeded, FailedOnce, FailedFinal}`,
/// where `FailedOnce` re-enters `Fetching` for the single retry. Terminal
/// states are never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Waiting for a worker slot
    Pending,

    /// A worker is fetching and extracting the page
    Fetching,

    /// Extraction produced a usable result
    Succeeded,

    /// First extraction yielded nothing; one retry is scheduled
    FailedOnce,

    /// Retry also failed, or the fetch itself failed
    FailedFinal,
}

impl TaskState {
    /// Returns true if no further processing will happen for this task
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::FailedFinal)
    }
}

/// What one worker produced for one page task
#[derive(Debug)]
pub struct ExtractionResult {
    /// Index of the originating task
    pub page_index: usize,

    /// URL of the originating task, kept for operator visibility
    pub url: String,

    /// Extracted records; empty when the task failed
    pub records: Vec<Record>,

    /// Terminal state of the task
    pub state: TaskState,

    /// The final error for a `FailedFinal` task
    pub error: Option<ScrapeError>,
}

impl ExtractionResult {
    /// Returns true if the task reached `Succeeded`
    pub fn ok(&self) -> bool {
        self.state == TaskState::Succeeded
    }

    fn succeeded(task: PageTask, records: Vec<Record>) -> Self {
        Self {
            page_index: task.page_index,
            url: task.url,
            records,
            state: TaskState::Succeeded,
            error: None,
        }
    }

    fn failed(task: PageTask, error: ScrapeError) -> Self {
        Self {
            page_index: task.page_index,
            url: task.url,
            records: Vec::new(),
            state: TaskState::FailedFinal,
            error: Some(error),
        }
    }
}

/// Collector knobs
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Fixed capacity of the worker pool
    pub worker_pool_size: usize,

    /// Delay before the single retry of a task that extracted nothing
    pub retry_delay: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            worker_pool_size: 20,
            retry_delay: Duration::from_secs(30),
        }
    }
}

/// The assembled outcome of one batch
///
/// `results` holds one [`ExtractionResult`] per submitted task, in ascending
/// page-index order regardless of fetch completion order.
#[derive(Debug)]
pub struct BatchOutcome {
    pub results: Vec<ExtractionResult>,
}

impl BatchOutcome {
    /// Concatenates the records of all succeeded tasks, in page-index order
    pub fn into_records(self) -> Vec<Record> {
        self.results
            .into_iter()
            .filter(|r| r.ok())
            .flat_map(|r| r.records)
            .collect()
    }

    /// Iterates over the tasks that ended in `FailedFinal`
    pub fn failures(&self) -> impl Iterator<Item = &ExtractionResult> {
        self.results.iter().filter(|r| !r.ok())
    }

    /// Number of tasks that ended in `FailedFinal`
    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }
}

/// Dispatches a batch of page tasks across a bounded worker pool
///
/// `fetch_extract` is called once per attempt and owns the whole
/// fetch-then-extract step for one page; it reports zero usable records by
/// returning a retryable [`ScrapeError`] (`Empty` or `Shape`). Fetch-level
/// failures (`Network`, `Timeout`) are terminal immediately.
///
/// The aggregate record order is deterministic for a given task list: the
/// collector buffers per-task results and concatenates by page index, never
/// by completion order.
pub async fn collect_batch<F, Fut>(
    tasks: Vec<PageTask>,
    options: &BatchOptions,
    fetch_extract: F,
) -> BatchOutcome
where
    F: Fn(PageTask) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = ScrapeResult<Vec<Record>>> + Send + 'static,
{
    let task_count = tasks.len();
    let semaphore = Arc::new(Semaphore::new(options.worker_pool_size));
    let retry_delay = options.retry_delay;

    let mut join_set = JoinSet::new();
    for task in tasks {
        let semaphore = semaphore.clone();
        let fetch_extract = fetch_extract.clone();
        tracing::trace!(page = task.page_index, state = ?TaskState::Pending, "task submitted");
        join_set.spawn(async move {
            // The semaphore lives for the whole batch and is never closed.
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("worker pool semaphore closed");
            run_task(task, retry_delay, fetch_extract).await
        });
    }

    let mut results: Vec<ExtractionResult> = Vec::with_capacity(task_count);
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok(result) => results.push(result),
            Err(e) => tracing::error!("batch worker panicked: {}", e),
        }
    }

    // Completion order is arbitrary; output order is not.
    results.sort_by_key(|r| r.page_index);

    let failed = results.iter().filter(|r| !r.ok()).count();
    tracing::info!(
        tasks = task_count,
        succeeded = task_count - failed,
        failed,
        "batch complete"
    );

    BatchOutcome { results }
}

/// Runs one task through the retry state machine
async fn run_task<F, Fut>(task: PageTask, retry_delay: Duration, fetch_extract: F) -> ExtractionResult
where
    F: Fn(PageTask) -> Fut,
    Fut: Future<Output = ScrapeResult<Vec<Record>>>,
{
    tracing::debug!(page = task.page_index, url = %task.url, state = ?TaskState::Fetching, "fetching page");

    match fetch_extract(task.clone()).await {
        Ok(records) => ExtractionResult::succeeded(task, records),
        Err(error) if error.is_retryable() => {
            tracing::warn!(
                page = task.page_index,
                url = %task.url,
                state = ?TaskState::FailedOnce,
                %error,
                "extraction yielded nothing, retrying once in {:?}",
                retry_delay
            );
            tokio::time::sleep(retry_delay).await;

            match fetch_extract(task.clone()).await {
                Ok(records) => ExtractionResult::succeeded(task, records),
                Err(error) => {
                    tracing::warn!(
                        page = task.page_index,
                        url = %task.url,
                        state = ?TaskState::FailedFinal,
                        %error,
                        "retry failed, excluding page from batch"
                    );
                    ExtractionResult::failed(task, error)
                }
            }
        }
        Err(error) => {
            tracing::warn!(
                page = task.page_index,
                url = %task.url,
                state = ?TaskState::FailedFinal,
                %error,
                "fetch failed, excluding page from batch"
            );
            ExtractionResult::failed(task, error)
        }
    }
}
