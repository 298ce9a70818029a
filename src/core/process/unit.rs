//! Per-SKU label transaction

use super::slug::{slugify, target_labels};
use crate::adapters::catalog::CatalogApi;
use crate::core::state::CheckpointStore;
use crate::domain::ids::SkuId;
use crate::domain::SkuDetail;
use crate::{log_image_updated, log_unit_start};
use std::sync::Arc;

/// How a single SKU ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    /// Already in the checkpoint; nothing was requested
    AlreadyProcessed,
    /// No usable name, so no label can be derived; skipped as success
    NoDetails,
    /// The SKU has no images
    NoImages,
    /// Every image already carries a non-blank label
    AllLabelled,
    /// All needed updates were confirmed (or planned, in a dry run)
    Updated { updated: usize, unchanged: usize },
    /// At least one fetch or update failed; the SKU stays unprocessed
    Failed { reason: String, updated: usize },
    /// The credential was rejected; the run must stop
    AuthFailed,
}

impl UnitOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, UnitOutcome::Failed { .. } | UnitOutcome::AuthFailed)
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self, UnitOutcome::AuthFailed)
    }

    /// Skips that did not touch any image
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            UnitOutcome::AlreadyProcessed
                | UnitOutcome::NoDetails
                | UnitOutcome::NoImages
                | UnitOutcome::AllLabelled
        )
    }

    pub fn images_updated(&self) -> usize {
        match self {
            UnitOutcome::Updated { updated, .. } | UnitOutcome::Failed { updated, .. } => *updated,
            _ => 0,
        }
    }
}

/// Runs the label transaction for one SKU
///
/// Holds no state of its own beyond shared handles, so one processor is
/// cloned into every worker.
#[derive(Clone)]
pub struct UnitProcessor {
    catalog: Arc<dyn CatalogApi>,
    checkpoint: Arc<CheckpointStore>,
    dry_run: bool,
}

impl UnitProcessor {
    pub fn new(catalog: Arc<dyn CatalogApi>, checkpoint: Arc<CheckpointStore>) -> Self {
        Self {
            catalog,
            checkpoint,
            dry_run: false,
        }
    }

    /// Read everything, send no updates and mark nothing processed
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Process one SKU end to end
    pub async fn process(&self, id: SkuId) -> UnitOutcome {
        if self.checkpoint.is_processed(id) {
            tracing::info!("SKU {} already processed (checkpoint)", id);
            return UnitOutcome::AlreadyProcessed;
        }

        let detail = match self.catalog.get_sku(id).await {
            Ok(detail) => detail,
            Err(e) if e.is_unauthorized() => return auth_failed(id, &e),
            Err(e) => {
                tracing::warn!(sku_id = %id, "Could not fetch SKU details: {}", e);
                None
            }
        };

        let Some((detail, slug)) = detail.and_then(usable_name) else {
            tracing::warn!("SKU ID: {} | Ignored (no details)", id);
            return UnitOutcome::NoDetails;
        };
        let name = detail.name.as_deref().unwrap_or_default();
        log_unit_start!(id, detail.ref_id.as_deref().unwrap_or("-"), name);

        let images = match self.catalog.get_images(id).await {
            Ok(images) => images,
            Err(e) if e.is_unauthorized() => return auth_failed(id, &e),
            Err(e) => {
                tracing::error!("[GET ERROR] SKU {}: {}", id, e);
                return UnitOutcome::Failed {
                    reason: e.to_string(),
                    updated: 0,
                };
            }
        };

        if images.is_empty() {
            self.complete(id);
            return UnitOutcome::NoImages;
        }

        if images.iter().all(|image| image.has_label()) {
            tracing::info!("[SKIP SKU] All images already have alt text - SKU {}", id);
            self.complete(id);
            return UnitOutcome::AllLabelled;
        }

        let labels = target_labels(&slug, images.len());
        let mut updated = 0;
        let mut unchanged = 0;
        let mut failures = Vec::new();

        for (image, label) in images.iter().zip(&labels) {
            if image.label() == Some(label.as_str()) {
                tracing::debug!("[SKIP] Already correct: {}", label);
                unchanged += 1;
                continue;
            }

            if self.dry_run {
                tracing::info!(
                    "[DRY RUN] Would update image {} of SKU {}: '{}' -> '{}'",
                    image.file_id().map(|f| f.to_string()).unwrap_or_else(|| "?".to_string()),
                    id,
                    image.label().unwrap_or_default(),
                    label
                );
                updated += 1;
                continue;
            }

            match self.catalog.update_image(id, image, label).await {
                Ok(()) => {
                    log_image_updated!(label);
                    updated += 1;
                }
                Err(e) if e.is_unauthorized() => return auth_failed(id, &e),
                Err(e) => {
                    tracing::error!("[UPDATE ERROR] SKU {}: {}", id, e);
                    failures.push(e.to_string());
                }
            }
        }

        if failures.is_empty() {
            self.complete(id);
            UnitOutcome::Updated { updated, unchanged }
        } else {
            UnitOutcome::Failed {
                reason: failures.join("; "),
                updated,
            }
        }
    }

    fn complete(&self, id: SkuId) {
        if !self.dry_run {
            self.checkpoint.mark_processed(id);
        }
    }
}

/// Keep the detail only when its name yields a non-empty slug
fn usable_name(detail: SkuDetail) -> Option<(SkuDetail, String)> {
    let slug = slugify(detail.name.as_deref()?);
    if slug.is_empty() {
        None
    } else {
        Some((detail, slug))
    }
}

fn auth_failed(id: SkuId, error: &crate::domain::SkuLabelError) -> UnitOutcome {
    tracing::error!("CRITICAL: Credential rejected while processing SKU {}: {}", id, error);
    UnitOutcome::AuthFailed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CatalogError, Result, SkuImage, SkuLabelError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeCatalog {
        details: HashMap<u64, SkuDetail>,
        images: HashMap<u64, Vec<SkuImage>>,
        reject_updates: bool,
        fail_updates_for: Vec<u64>,
        calls: Mutex<usize>,
        updates: Mutex<Vec<(u64, String)>>,
    }

    impl FakeCatalog {
        fn with_sku(mut self, id: u64, name: &str, labels: &[&str]) -> Self {
            self.details.insert(
                id,
                SkuDetail {
                    id: SkuId::new(id),
                    name: Some(name.to_string()),
                    ref_id: Some(format!("REF-{id}")),
                },
            );
            let images = labels
                .iter()
                .enumerate()
                .map(|(i, label)| {
                    SkuImage::from_value(json!({"Id": i as u64 + 1, "Label": label})).unwrap()
                })
                .collect();
            self.images.insert(id, images);
            self
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }

        fn updates(&self) -> Vec<(u64, String)> {
            self.updates.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CatalogApi for FakeCatalog {
        async fn list_sku_ids(&self, _page: u32, _page_size: u32) -> Result<Vec<SkuId>> {
            *self.calls.lock().unwrap() += 1;
            Ok(Vec::new())
        }

        async fn get_sku(&self, id: SkuId) -> Result<Option<SkuDetail>> {
            *self.calls.lock().unwrap() += 1;
            Ok(self.details.get(&id.value()).cloned())
        }

        async fn get_images(&self, id: SkuId) -> Result<Vec<SkuImage>> {
            *self.calls.lock().unwrap() += 1;
            Ok(self.images.get(&id.value()).cloned().unwrap_or_default())
        }

        async fn update_image(&self, id: SkuId, _image: &SkuImage, label: &str) -> Result<()> {
            *self.calls.lock().unwrap() += 1;
            if self.reject_updates {
                return Err(CatalogError::Unauthorized("expired".into()).into());
            }
            if self.fail_updates_for.contains(&id.value()) {
                return Err(SkuLabelError::from(CatalogError::UnexpectedStatus {
                    status: 500,
                    body: "boom".into(),
                }));
            }
            self.updates
                .lock()
                .unwrap()
                .push((id.value(), label.to_string()));
            Ok(())
        }
    }

    fn processor(catalog: Arc<FakeCatalog>, dir: &TempDir) -> (UnitProcessor, Arc<CheckpointStore>) {
        let store = Arc::new(CheckpointStore::load(dir.path().join("checkpoint.json")));
        (UnitProcessor::new(catalog, Arc::clone(&store)), store)
    }

    #[tokio::test]
    async fn test_processed_unit_makes_no_calls() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(FakeCatalog::default().with_sku(42, "Paracetamol", &[""]));
        let (processor, store) = processor(Arc::clone(&catalog), &dir);
        store.mark_processed(SkuId::new(42));

        let outcome = processor.process(SkuId::new(42)).await;
        assert_eq!(outcome, UnitOutcome::AlreadyProcessed);
        assert!(outcome.is_success());
        assert_eq!(catalog.calls(), 0);
    }

    #[tokio::test]
    async fn test_labels_follow_image_order() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(FakeCatalog::default().with_sku(
            7,
            "Óleo Essencial",
            &["", "oleo-essencial_2", "wrong"],
        ));
        let (processor, store) = processor(Arc::clone(&catalog), &dir);

        let outcome = processor.process(SkuId::new(7)).await;
        assert_eq!(outcome, UnitOutcome::Updated { updated: 2, unchanged: 1 });
        assert_eq!(
            catalog.updates(),
            vec![
                (7, "oleo-essencial_1".to_string()),
                (7, "oleo-essencial_3".to_string())
            ]
        );
        assert!(store.is_processed(SkuId::new(7)));
    }

    #[tokio::test]
    async fn test_fully_labelled_unit_is_skipped() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(FakeCatalog::default().with_sku(3, "Shampoo", &["a", "b"]));
        let (processor, store) = processor(Arc::clone(&catalog), &dir);

        assert_eq!(processor.process(SkuId::new(3)).await, UnitOutcome::AllLabelled);
        assert!(catalog.updates().is_empty());
        assert!(store.is_processed(SkuId::new(3)));
    }

    #[tokio::test]
    async fn test_no_images_is_success() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(FakeCatalog::default().with_sku(3, "Shampoo", &[]));
        let (processor, store) = processor(catalog, &dir);

        assert_eq!(processor.process(SkuId::new(3)).await, UnitOutcome::NoImages);
        assert!(store.is_processed(SkuId::new(3)));
    }

    #[tokio::test]
    async fn test_nameless_unit_is_skipped_unmarked() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(FakeCatalog::default().with_sku(8, "¿¿??", &[""]));
        let (processor, store) = processor(Arc::clone(&catalog), &dir);

        let outcome = processor.process(SkuId::new(8)).await;
        assert_eq!(outcome, UnitOutcome::NoDetails);
        assert!(outcome.is_success());
        assert!(!store.is_processed(SkuId::new(8)));
        assert_eq!(catalog.calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_unit_is_skipped() {
        let dir = TempDir::new().unwrap();
        let (processor, _store) = processor(Arc::new(FakeCatalog::default()), &dir);
        assert_eq!(processor.process(SkuId::new(99)).await, UnitOutcome::NoDetails);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_unit_unmarked() {
        let dir = TempDir::new().unwrap();
        let mut fake = FakeCatalog::default().with_sku(5, "Gel", &["", ""]);
        fake.fail_updates_for = vec![5];
        let (processor, store) = processor(Arc::new(fake), &dir);

        let outcome = processor.process(SkuId::new(5)).await;
        assert!(matches!(outcome, UnitOutcome::Failed { updated: 0, .. }));
        assert!(!store.is_processed(SkuId::new(5)));
    }

    #[tokio::test]
    async fn test_unauthorized_update_stops_unit() {
        let dir = TempDir::new().unwrap();
        let mut fake = FakeCatalog::default().with_sku(5, "Gel", &["", "", ""]);
        fake.reject_updates = true;
        let catalog = Arc::new(fake);
        let (processor, store) = processor(Arc::clone(&catalog), &dir);

        let outcome = processor.process(SkuId::new(5)).await;
        assert!(outcome.is_auth_failure());
        // detail + images + the first rejected update only
        assert_eq!(catalog.calls(), 3);
        assert!(!store.is_processed(SkuId::new(5)));
    }

    #[tokio::test]
    async fn test_dry_run_sends_nothing() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(FakeCatalog::default().with_sku(9, "Creme", &["", ""]));
        let (processor, store) = processor(Arc::clone(&catalog), &dir);
        let processor = processor.with_dry_run(true);

        let outcome = processor.process(SkuId::new(9)).await;
        assert_eq!(outcome, UnitOutcome::Updated { updated: 2, unchanged: 0 });
        assert!(catalog.updates().is_empty());
        assert!(!store.is_processed(SkuId::new(9)));
    }
}
