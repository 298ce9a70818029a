//! Run orchestration

pub mod orchestrator;
pub mod summary;

pub use orchestrator::BatchOrchestrator;
pub use summary::{RunOutcome, RunSummary};
