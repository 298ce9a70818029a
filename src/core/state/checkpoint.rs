//! Checkpoint model for resumable runs
//!
//! A checkpoint records which SKUs have been fully processed and the page the
//! next run should start from. On disk it is a small JSON document:
//!
//! ```json
//! {"processed_ids": [101, 102, 250], "last_page": 3}
//! ```

use crate::domain::ids::SkuId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Progress of a run
///
/// # Examples
///
/// ```
/// use skulabel::core::state::Checkpoint;
/// use skulabel::domain::ids::SkuId;
///
/// let mut checkpoint = Checkpoint::new();
/// assert_eq!(checkpoint.last_page, 1);
///
/// assert!(checkpoint.mark_processed(SkuId::new(42)));
/// assert!(!checkpoint.mark_processed(SkuId::new(42)));
/// assert!(checkpoint.is_processed(SkuId::new(42)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// SKUs whose images are all confirmed
    #[serde(default, alias = "processed_skus")]
    pub processed_ids: BTreeSet<SkuId>,

    /// Page the next run starts from (1-based)
    #[serde(default = "first_page")]
    pub last_page: u32,
}

impl Checkpoint {
    /// Fresh state: page 1, nothing processed
    pub fn new() -> Self {
        Self {
            processed_ids: BTreeSet::new(),
            last_page: first_page(),
        }
    }

    /// Record a SKU as processed; returns false if it already was
    pub fn mark_processed(&mut self, id: SkuId) -> bool {
        self.processed_ids.insert(id)
    }

    pub fn is_processed(&self, id: SkuId) -> bool {
        self.processed_ids.contains(&id)
    }

    pub fn processed_count(&self) -> usize {
        self.processed_ids.len()
    }

    /// Clamp values a hand-edited file could carry
    pub(crate) fn normalized(mut self) -> Self {
        if self.last_page == 0 {
            self.last_page = first_page();
        }
        self
    }
}

impl Default for Checkpoint {
    fn default() -> Self {
        Self::new()
    }
}

fn first_page() -> u32 {
    1
}
