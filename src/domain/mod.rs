//! Domain models and types for skulabel.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`SkuId`], [`FileId`])
//! - **Catalog models** ([`SkuDetail`], [`SkuImage`])
//! - **Error types** ([`SkuLabelError`], [`CatalogError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, SkuLabelError>`]:
//!
//! ```rust,no_run
//! use skulabel::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = skulabel::config::load_config("skulabel.toml")?;
//!     println!("{}", config.catalog.base_url());
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod result;
pub mod sku;

// Re-export commonly used types for convenience
pub use errors::{CatalogError, SkuLabelError};
pub use ids::{FileId, SkuId};
pub use result::Result;
pub use sku::{SkuDetail, SkuImage};
