//! Catalog API trait
//!
//! [`CatalogApi`] is the boundary between the batch engine and the remote
//! catalog. The engine only ever talks to this trait, which keeps the unit
//! processor and orchestrator testable with an in-memory catalog.

use crate::domain::ids::SkuId;
use crate::domain::{Result, SkuDetail, SkuImage};
use async_trait::async_trait;

/// Operations the label updater needs from a remote catalog
///
/// Implementations must map an authentication rejection to
/// [`CatalogError::Unauthorized`](crate::domain::CatalogError::Unauthorized)
/// so callers can treat it as session-fatal.
///
/// # Example
///
/// ```no_run
/// use skulabel::adapters::catalog::{CatalogApi, VtexCatalog};
/// use skulabel::config::load_config;
///
/// # async fn example() -> skulabel::domain::Result<()> {
/// let config = load_config("skulabel.toml")?;
/// let catalog = VtexCatalog::from_config(&config)?;
///
/// for id in catalog.list_sku_ids(1, 50).await? {
///     let images = catalog.get_images(id).await?;
///     println!("{id}: {} images", images.len());
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// List one page of SKU identifiers (1-based page number)
    ///
    /// An empty list means the listing is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if no response was obtained, the credential was
    /// rejected or the server answered with a non-success status.
    async fn list_sku_ids(&self, page: u32, page_size: u32) -> Result<Vec<SkuId>>;

    /// Fetch a SKU's detail fields
    ///
    /// Returns `Ok(None)` when the SKU does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error for rejected credentials, missing responses and
    /// unexpected statuses.
    async fn get_sku(&self, id: SkuId) -> Result<Option<SkuDetail>>;

    /// Fetch a SKU's images in catalog order
    ///
    /// A SKU without an image collection yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error for rejected credentials, missing responses and
    /// unexpected statuses.
    async fn get_images(&self, id: SkuId) -> Result<Vec<SkuImage>>;

    /// Replace an image with its original payload relabelled to `label`
    ///
    /// # Errors
    ///
    /// Returns an error unless the server confirms the update.
    async fn update_image(&self, id: SkuId, image: &SkuImage, label: &str) -> Result<()>;
}
