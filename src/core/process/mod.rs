//! Per-SKU processing

pub mod slug;
pub mod unit;

pub use slug::{slugify, target_labels};
pub use unit::{UnitOutcome, UnitProcessor};
