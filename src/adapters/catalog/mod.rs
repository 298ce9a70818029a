//! Remote catalog integration
//!
//! - [`traits`] - the [`CatalogApi`] seam used by the batch engine
//! - [`vtex`] - [`VtexCatalog`], the HTTP implementation

pub mod traits;
pub mod vtex;

pub use traits::CatalogApi;
pub use vtex::VtexCatalog;
