//! Run outcome and summary reporting

use crate::core::process::UnitOutcome;
use std::fmt;
use std::time::Duration;

/// Terminal state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The listing returned an empty page
    Exhausted,
    /// The catalog rejected the credential
    AuthFailed,
    /// A page of SKU ids could not be fetched
    ListError,
    /// Stopped by a shutdown signal
    Interrupted,
    /// An unexpected run-level fault
    FatalError,
}

impl RunOutcome {
    /// Process exit code for this outcome
    pub fn exit_code(self) -> i32 {
        match self {
            RunOutcome::Exhausted => 0,
            RunOutcome::AuthFailed => 3,
            RunOutcome::ListError => 4,
            RunOutcome::FatalError => 5,
            RunOutcome::Interrupted => 130,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunOutcome::Exhausted => "exhausted",
            RunOutcome::AuthFailed => "auth_failed",
            RunOutcome::ListError => "list_error",
            RunOutcome::Interrupted => "interrupted",
            RunOutcome::FatalError => "fatal_error",
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters collected over a run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub outcome: RunOutcome,

    /// Page the run started from
    pub start_page: u32,

    /// Page the next run will start from
    pub next_page: u32,

    pub pages_completed: u32,

    /// Units whose processing finished, whatever the result
    pub units_completed: usize,

    pub units_succeeded: usize,

    pub units_failed: usize,

    /// Successful units that needed no update
    pub units_skipped: usize,

    /// Queued units never started because the run was stopping
    pub units_not_started: usize,

    /// Confirmed updates (planned updates in a dry run)
    pub images_updated: usize,

    pub dry_run: bool,

    pub duration: Duration,
}

impl RunSummary {
    pub fn new(start_page: u32, dry_run: bool) -> Self {
        Self {
            outcome: RunOutcome::Exhausted,
            start_page,
            next_page: start_page,
            pages_completed: 0,
            units_completed: 0,
            units_succeeded: 0,
            units_failed: 0,
            units_skipped: 0,
            units_not_started: 0,
            images_updated: 0,
            dry_run,
            duration: Duration::ZERO,
        }
    }

    /// Count one finished unit
    pub fn record(&mut self, outcome: &UnitOutcome) {
        self.units_completed += 1;
        if outcome.is_success() {
            self.units_succeeded += 1;
        } else {
            self.units_failed += 1;
        }
        if outcome.is_skip() {
            self.units_skipped += 1;
        }
        self.images_updated += outcome.images_updated();
    }

    pub fn exit_code(&self) -> i32 {
        self.outcome.exit_code()
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.units_completed == 0 {
            return 100.0;
        }
        (self.units_succeeded as f64 / self.units_completed as f64) * 100.0
    }

    pub fn log_summary(&self) {
        tracing::info!(
            outcome = %self.outcome,
            start_page = self.start_page,
            next_page = self.next_page,
            pages_completed = self.pages_completed,
            succeeded = self.units_succeeded,
            failed = self.units_failed,
            skipped = self.units_skipped,
            images_updated = self.images_updated,
            dry_run = self.dry_run,
            duration_secs = self.duration.as_secs(),
            success_rate = format!("{:.2}%", self.success_rate()),
            "--- PROCESS COMPLETED ({} SKUs processed) ---",
            self.units_completed
        );
    }
}
