//! Domain identifier types
//!
//! This module provides newtype wrappers for catalog identifiers. The remote
//! catalog uses plain integers for both SKUs and image files, so the newtypes
//! exist to keep them from being mixed up.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// SKU (stock-keeping unit) identifier
///
/// # Examples
///
/// ```
/// use skulabel::domain::ids::SkuId;
/// use std::str::FromStr;
///
/// let sku_id = SkuId::from_str("42").unwrap();
/// assert_eq!(sku_id.value(), 42);
/// assert_eq!(sku_id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkuId(u64);

impl SkuId {
    /// Creates a new SkuId
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw numeric identifier
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for SkuId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for SkuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SkuId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|e| format!("Invalid SKU ID '{s}': {e}"))
    }
}

/// Image file identifier, unique within the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(u64);

impl FileId {
    /// Creates a new FileId
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw numeric identifier
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
