//! Batch orchestrator
//!
//! Pages through the catalog listing and fans each page out to a bounded
//! pool of workers:
//!
//! ```text
//! FETCHING_PAGE -> DISPATCHING -> PAGE_DONE -> FETCHING_PAGE ...
//!       |               |
//!       |               +--> AUTH_FAILED / INTERRUPTED / FATAL_ERROR
//!       +--> EXHAUSTED / AUTH_FAILED / LIST_ERROR / INTERRUPTED
//! ```
//!
//! Pages are strictly sequential: page `p + 1` is only requested once every
//! unit of page `p` has finished, and only then is `last_page` advanced and
//! saved.

use super::summary::{RunOutcome, RunSummary};
use crate::adapters::catalog::CatalogApi;
use crate::config::RunConfig;
use crate::core::process::{UnitOutcome, UnitProcessor};
use crate::core::state::CheckpointStore;
use crate::domain::ids::SkuId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;

/// How one page ended
#[derive(Debug, Clone, PartialEq, Eq)]
enum PageResult {
    Completed,
    AuthFailed,
    Interrupted,
    Fault(String),
}

/// Drives a whole run over the catalog listing
pub struct BatchOrchestrator {
    catalog: Arc<dyn CatalogApi>,
    checkpoint: Arc<CheckpointStore>,
    processor: UnitProcessor,
    run: RunConfig,
    shutdown: watch::Receiver<bool>,
    watching: bool,
}

impl BatchOrchestrator {
    pub fn new(
        catalog: Arc<dyn CatalogApi>,
        checkpoint: Arc<CheckpointStore>,
        run: RunConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let processor = UnitProcessor::new(Arc::clone(&catalog), Arc::clone(&checkpoint));
        Self {
            catalog,
            checkpoint,
            processor,
            run,
            shutdown,
            watching: true,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.processor = self.processor.with_dry_run(dry_run);
        self
    }

    fn shutdown_requested(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Run until the listing is exhausted or a terminal condition is hit
    ///
    /// With `resume == false` the checkpoint is cleared first. The
    /// checkpoint is saved before returning, whatever the outcome.
    pub async fn run(&mut self, resume: bool) -> RunSummary {
        let started = Instant::now();

        if !resume {
            self.checkpoint.clear().await;
            tracing::info!("Starting fresh (checkpoint cleared)");
        }

        let start_page = self.checkpoint.last_page();
        let mut summary = RunSummary::new(start_page, self.processor.is_dry_run());

        tracing::info!(
            dry_run = self.processor.is_dry_run(),
            "Max workers: {} | Page size: {} | Starting from page: {}",
            self.run.workers,
            self.run.page_size,
            start_page
        );

        let mut page = start_page;
        let outcome = loop {
            if self.shutdown_requested() {
                tracing::warn!("Process interrupted. Saving checkpoint...");
                break RunOutcome::Interrupted;
            }

            let listing = tokio::select! {
                listing = self.catalog.list_sku_ids(page, self.run.page_size) => listing,
                _ = wait_for_shutdown(&mut self.shutdown, &mut self.watching) => {
                    tracing::warn!("Process interrupted while listing page {}. Saving checkpoint...", page);
                    break RunOutcome::Interrupted;
                }
            };

            let ids = match listing {
                Ok(ids) => ids,
                Err(e) if e.is_unauthorized() => {
                    tracing::error!("CRITICAL: Credential rejected while listing page {}: {}", page, e);
                    break RunOutcome::AuthFailed;
                }
                Err(e) => {
                    tracing::error!("Failed to fetch page {}: {}", page, e);
                    break RunOutcome::ListError;
                }
            };

            if ids.is_empty() {
                tracing::info!("End of catalog reached.");
                break RunOutcome::Exhausted;
            }

            tracing::info!("--- Processing Page {} ({} SKUs) ---", page, ids.len());

            match self.run_page(ids, &mut summary).await {
                PageResult::Completed => {
                    page += 1;
                    self.checkpoint.update_page(page);
                    self.checkpoint.save().await;
                    summary.pages_completed += 1;
                }
                PageResult::AuthFailed => {
                    tracing::error!("CRITICAL: Credential expired. Stopping before page {} completes", page);
                    break RunOutcome::AuthFailed;
                }
                PageResult::Interrupted => break RunOutcome::Interrupted,
                PageResult::Fault(reason) => {
                    tracing::error!("CRITICAL: Fatal error on page {}: {}", page, reason);
                    break RunOutcome::FatalError;
                }
            }
        };

        self.checkpoint.save().await;

        summary.outcome = outcome;
        summary.next_page = self.checkpoint.last_page();
        summary.duration = started.elapsed();
        summary.log_summary();
        summary
    }

    /// Dispatch one page to the worker pool and wait for every unit
    async fn run_page(&mut self, ids: Vec<SkuId>, summary: &mut RunSummary) -> PageResult {
        let permits = Arc::new(Semaphore::new(self.run.workers.max(1)));
        let halt = Arc::new(AtomicBool::new(false));
        let mut tasks = JoinSet::new();

        for id in ids {
            let permits = Arc::clone(&permits);
            let halt = Arc::clone(&halt);
            let processor = self.processor.clone();
            tasks.spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return None;
                };
                if halt.load(Ordering::SeqCst) {
                    return None;
                }
                Some(processor.process(id).await)
            });
        }

        let mut result = PageResult::Completed;
        let mut interrupted = false;

        loop {
            tokio::select! {
                joined = tasks.join_next() => {
                    let Some(joined) = joined else { break };
                    match joined {
                        Ok(Some(outcome)) => {
                            self.record(&outcome, summary).await;
                            if outcome == UnitOutcome::AuthFailed && result == PageResult::Completed {
                                halt.store(true, Ordering::SeqCst);
                                result = PageResult::AuthFailed;
                            }
                        }
                        Ok(None) => summary.units_not_started += 1,
                        Err(e) => {
                            tracing::error!("Worker task failed: {}", e);
                            halt.store(true, Ordering::SeqCst);
                            if !matches!(result, PageResult::Fault(_)) {
                                result = PageResult::Fault(e.to_string());
                            }
                        }
                    }
                }
                requested = wait_for_shutdown(&mut self.shutdown, &mut self.watching), if !interrupted => {
                    if requested {
                        tracing::warn!("Process interrupted by user. Saving checkpoint...");
                        halt.store(true, Ordering::SeqCst);
                        interrupted = true;
                        self.checkpoint.save().await;
                    }
                }
            }
        }

        if interrupted {
            PageResult::Interrupted
        } else {
            result
        }
    }

    async fn record(&self, outcome: &UnitOutcome, summary: &mut RunSummary) {
        summary.record(outcome);

        let interval = self.run.checkpoint_interval;
        if interval > 0 && summary.units_completed % interval == 0 {
            self.checkpoint.save().await;
            tracing::info!(
                "Checkpoint saved ({} SKUs processed)",
                summary.units_completed
            );
        }
    }
}

/// Resolves to `true` once shutdown is requested
///
/// When the sender is gone no signal can arrive; `watching` is cleared and
/// the future never resolves.
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>, watching: &mut bool) -> bool {
    while *watching {
        if *shutdown.borrow_and_update() {
            return true;
        }
        if shutdown.changed().await.is_err() {
            *watching = false;
        }
    }
    std::future::pending::<bool>().await
}
