//! End-to-end runs of the batch orchestrator against an in-memory catalog

mod common;

use common::{run_config, Call, InMemoryCatalog};
use skulabel::adapters::catalog::CatalogApi;
use skulabel::core::run::{BatchOrchestrator, RunOutcome};
use skulabel::core::state::{Checkpoint, CheckpointStore};
use skulabel::domain::ids::SkuId;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::watch;

fn orchestrator(
    catalog: &Arc<InMemoryCatalog>,
    checkpoint_path: &Path,
    workers: usize,
    checkpoint_interval: usize,
) -> (BatchOrchestrator, watch::Sender<bool>) {
    let (tx, rx) = watch::channel(false);
    let store = Arc::new(CheckpointStore::load(checkpoint_path));
    let api: Arc<dyn CatalogApi> = Arc::clone(catalog) as Arc<dyn CatalogApi>;
    let orchestrator = BatchOrchestrator::new(
        api,
        store,
        run_config(workers, 50, checkpoint_interval),
        rx,
    );
    (orchestrator, tx)
}

fn read_checkpoint(path: &Path) -> Checkpoint {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_full_run_labels_every_image() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("checkpoint.json");
    let catalog = Arc::new(
        InMemoryCatalog::new()
            .page(&[1, 2])
            .page(&[3])
            .sku(1, "Paracetamol 500mg", &["", "", ""])
            .sku(2, "Óleo Essencial", &["old"])
            .sku(3, "Dipirona", &[]),
    );

    let (mut orchestrator, _tx) = orchestrator(&catalog, &path, 2, 10);
    let summary = orchestrator.run(true).await;

    assert_eq!(summary.outcome, RunOutcome::Exhausted);
    assert_eq!(summary.exit_code(), 0);
    assert_eq!(summary.pages_completed, 2);
    assert_eq!(summary.next_page, 3);
    assert_eq!(summary.images_updated, 3);
    assert_eq!(summary.units_failed, 0);

    assert_eq!(
        catalog.labels(1),
        vec![
            "paracetamol-500mg_1",
            "paracetamol-500mg_2",
            "paracetamol-500mg_3"
        ]
    );
    // Already carries a label, so it is left alone
    assert_eq!(catalog.labels(2), vec!["old"]);

    let saved = read_checkpoint(&path);
    assert_eq!(saved.last_page, 3);
    for id in [1, 2, 3] {
        assert!(saved.is_processed(SkuId::new(id)), "SKU {id} not recorded");
    }
}

#[tokio::test]
async fn test_second_run_sends_no_updates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("checkpoint.json");
    let catalog = Arc::new(
        InMemoryCatalog::new()
            .page(&[10, 11, 12])
            .unlabelled_skus(2),
    );

    let (mut first, _tx) = orchestrator(&catalog, &path, 3, 10);
    assert_eq!(first.run(true).await.outcome, RunOutcome::Exhausted);
    assert_eq!(catalog.update_calls().len(), 6);

    // Starting over re-reads every SKU but finds nothing left to change
    let (mut second, _tx) = orchestrator(&catalog, &path, 3, 10);
    let summary = second.run(false).await;
    assert_eq!(summary.outcome, RunOutcome::Exhausted);
    assert_eq!(summary.images_updated, 0);
    assert_eq!(catalog.update_calls().len(), 6);
}

#[tokio::test]
async fn test_resume_skips_processed_skus_without_requests() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("checkpoint.json");
    std::fs::write(&path, r#"{"processed_ids": [42], "last_page": 1}"#).unwrap();

    let catalog = Arc::new(
        InMemoryCatalog::new()
            .page(&[41, 42, 43])
            .unlabelled_skus(1),
    );

    let (mut orchestrator, _tx) = orchestrator(&catalog, &path, 2, 10);
    let summary = orchestrator.run(true).await;

    assert_eq!(summary.outcome, RunOutcome::Exhausted);
    assert!(catalog.calls().iter().all(|call| call.sku() != Some(42)));
    assert_eq!(summary.units_skipped, 1);
    assert_eq!(catalog.labels(42), vec![""]);
}

#[tokio::test]
async fn test_resume_starts_from_saved_page() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("checkpoint.json");
    std::fs::write(&path, r#"{"processed_skus": [], "last_page": 2}"#).unwrap();

    let catalog = Arc::new(
        InMemoryCatalog::new()
            .page(&[1])
            .page(&[2])
            .unlabelled_skus(1),
    );

    let (mut orchestrator, _tx) = orchestrator(&catalog, &path, 1, 10);
    let summary = orchestrator.run(true).await;

    assert_eq!(summary.start_page, 2);
    assert!(!catalog.calls().contains(&Call::List(1)));
    assert_eq!(catalog.labels(1), vec![""]);
    assert_eq!(catalog.labels(2), vec!["produto-2_1"]);
}

#[tokio::test]
async fn test_fresh_run_ignores_saved_progress() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("checkpoint.json");
    std::fs::write(&path, r#"{"processed_ids": [1], "last_page": 5}"#).unwrap();

    let catalog = Arc::new(InMemoryCatalog::new().page(&[1]).unlabelled_skus(1));

    let (mut orchestrator, _tx) = orchestrator(&catalog, &path, 1, 10);
    let summary = orchestrator.run(false).await;

    assert_eq!(summary.start_page, 1);
    assert_eq!(catalog.labels(1), vec!["produto-1_1"]);
}

#[tokio::test]
async fn test_page_advances_only_after_page_completes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("checkpoint.json");
    let catalog = Arc::new(
        InMemoryCatalog::new()
            .page(&[1, 2, 3, 4])
            .page(&[5, 6, 7, 8])
            .page(&[9, 10])
            .unlabelled_skus(1)
            .with_latency(std::time::Duration::from_millis(2))
            .watch_checkpoint(path.clone()),
    );

    // Save after every unit so mid-page writes are visible to the catalog
    let (mut orchestrator, _tx) = orchestrator(&catalog, &path, 3, 1);
    let summary = orchestrator.run(true).await;
    assert_eq!(summary.outcome, RunOutcome::Exhausted);

    let views = catalog.disk_views();
    assert_eq!(views.len(), 10);
    for view in &views {
        assert!(
            view.persisted_page <= view.page,
            "page {} persisted while SKU {} of page {} was in flight",
            view.persisted_page,
            view.sku,
            view.page
        );
    }

    // Every call for a page precedes the listing of the next one
    let calls = catalog.calls();
    for page in 1..=2u32 {
        let next_listing = calls
            .iter()
            .position(|call| *call == Call::List(page + 1))
            .unwrap();
        let last_unit_call = calls
            .iter()
            .rposition(|call| {
                call.sku()
                    .map(|id| catalog.page_of(id) == Some(page))
                    .unwrap_or(false)
            })
            .unwrap();
        assert!(last_unit_call < next_listing);
    }

    assert_eq!(read_checkpoint(&path).last_page, 4);
}

#[tokio::test]
async fn test_processed_ids_saved_every_interval_within_a_page() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("checkpoint.json");
    let catalog = Arc::new(
        InMemoryCatalog::new()
            .page(&[1, 2, 3, 4, 5])
            .page(&[6])
            .unlabelled_skus(1)
            .with_latency(std::time::Duration::from_millis(20))
            .watch_checkpoint(path.clone()),
    );

    let (mut orchestrator, _tx) = orchestrator(&catalog, &path, 1, 2);
    let summary = orchestrator.run(true).await;
    assert_eq!(summary.outcome, RunOutcome::Exhausted);

    let views = catalog.disk_views();
    assert_eq!(views.len(), 6);

    let first_page: Vec<usize> = views
        .iter()
        .filter(|view| view.page == 1)
        .inspect(|view| assert_eq!(view.persisted_page, 1, "SKU {}", view.sku))
        .map(|view| view.persisted_ids)
        .collect();
    // One worker: SKU n starts after n - 1 finished, and saves land on 2 and 4
    assert_eq!(first_page, vec![0, 0, 2, 2, 4]);

    let last = views.last().unwrap();
    assert_eq!((last.sku, last.persisted_page, last.persisted_ids), (6, 2, 5));
    assert_eq!(read_checkpoint(&path).processed_count(), 6);
}

#[tokio::test]
async fn test_auth_failure_stops_the_run() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("checkpoint.json");
    let catalog = Arc::new(
        InMemoryCatalog::new()
            .page(&[1, 2, 3, 4, 5, 6])
            .page(&[7, 8])
            .unlabelled_skus(1)
            .reject_updates_for(3)
            .with_latency(std::time::Duration::from_millis(5)),
    );

    let (mut orchestrator, _tx) = orchestrator(&catalog, &path, 1, 10);
    let summary = orchestrator.run(true).await;

    assert_eq!(summary.outcome, RunOutcome::AuthFailed);
    assert_eq!(summary.exit_code(), 3);
    assert!(!catalog.calls().contains(&Call::List(2)));
    assert_eq!(summary.units_completed + summary.units_not_started, 6);
    assert!(summary.units_not_started > 0);

    let saved = read_checkpoint(&path);
    assert_eq!(saved.last_page, 1);
    assert!(!saved.is_processed(SkuId::new(3)));
}

#[tokio::test]
async fn test_auth_failure_while_listing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("checkpoint.json");
    let catalog = Arc::new(
        InMemoryCatalog::new()
            .page(&[1])
            .page(&[2])
            .unlabelled_skus(1)
            .reject_listing_at(2),
    );

    let (mut orchestrator, _tx) = orchestrator(&catalog, &path, 1, 10);
    let summary = orchestrator.run(true).await;

    assert_eq!(summary.outcome, RunOutcome::AuthFailed);
    assert_eq!(read_checkpoint(&path).last_page, 2);
}

#[tokio::test]
async fn test_listing_failure_keeps_page_for_retry() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("checkpoint.json");
    let catalog = Arc::new(
        InMemoryCatalog::new()
            .page(&[1, 2])
            .page(&[3])
            .unlabelled_skus(1)
            .fail_listing_at(2),
    );

    let (mut orchestrator, _tx) = orchestrator(&catalog, &path, 2, 10);
    let summary = orchestrator.run(true).await;

    assert_eq!(summary.outcome, RunOutcome::ListError);
    assert_eq!(summary.exit_code(), 4);
    assert_eq!(summary.pages_completed, 1);

    let saved = read_checkpoint(&path);
    assert_eq!(saved.last_page, 2);
    assert!(saved.is_processed(SkuId::new(1)));
    assert!(saved.is_processed(SkuId::new(2)));
}

#[tokio::test]
async fn test_failed_unit_is_retried_on_next_run() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("checkpoint.json");
    let catalog = Arc::new(
        InMemoryCatalog::new()
            .page(&[1, 2])
            .unlabelled_skus(1)
            .fail_updates_for(2),
    );

    let (mut orchestrator, _tx) = orchestrator(&catalog, &path, 2, 10);
    let summary = orchestrator.run(true).await;

    // A failed unit does not stop the page
    assert_eq!(summary.outcome, RunOutcome::Exhausted);
    assert_eq!(summary.units_failed, 1);
    assert_eq!(summary.units_succeeded, 1);

    let saved = read_checkpoint(&path);
    assert!(saved.is_processed(SkuId::new(1)));
    assert!(!saved.is_processed(SkuId::new(2)));
}

#[tokio::test]
async fn test_nameless_sku_is_skipped_and_not_recorded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("checkpoint.json");
    let catalog = Arc::new(
        InMemoryCatalog::new()
            .page(&[1, 2])
            .sku(1, "Paracetamol", &[""])
            .sku(2, "日本語", &[""]),
    );

    let (mut orchestrator, _tx) = orchestrator(&catalog, &path, 1, 10);
    let summary = orchestrator.run(true).await;

    assert_eq!(summary.outcome, RunOutcome::Exhausted);
    assert!(!catalog.calls().contains(&Call::Images(2)));
    assert!(!read_checkpoint(&path).is_processed(SkuId::new(2)));
}

#[tokio::test]
async fn test_empty_catalog_is_exhausted_immediately() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("checkpoint.json");
    let catalog = Arc::new(InMemoryCatalog::new());

    let (mut orchestrator, _tx) = orchestrator(&catalog, &path, 1, 10);
    let summary = orchestrator.run(true).await;

    assert_eq!(summary.outcome, RunOutcome::Exhausted);
    assert_eq!(summary.units_completed, 0);
    assert_eq!(catalog.calls(), vec![Call::List(1)]);
    assert_eq!(read_checkpoint(&path).last_page, 1);
}

#[tokio::test]
async fn test_dry_run_sends_nothing_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("checkpoint.json");
    let catalog = Arc::new(
        InMemoryCatalog::new()
            .page(&[1, 2])
            .unlabelled_skus(2),
    );

    let (tx, rx) = watch::channel(false);
    let store = Arc::new(CheckpointStore::load(&path).without_persistence());
    let api: Arc<dyn CatalogApi> = Arc::clone(&catalog) as Arc<dyn CatalogApi>;
    let mut orchestrator = BatchOrchestrator::new(api, store, run_config(2, 50, 1), rx)
        .with_dry_run(true);
    let summary = orchestrator.run(true).await;
    drop(tx);

    assert_eq!(summary.outcome, RunOutcome::Exhausted);
    assert!(summary.dry_run);
    assert_eq!(summary.images_updated, 4);
    assert!(catalog.update_calls().is_empty());
    assert_eq!(catalog.labels(1), vec!["", ""]);
    assert!(!path.exists());
}
