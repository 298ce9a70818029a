//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use skulabel::adapters::catalog::CatalogApi;
use skulabel::config::RunConfig;
use skulabel::core::state::Checkpoint;
use skulabel::domain::ids::SkuId;
use skulabel::domain::{CatalogError, Result, SkuDetail, SkuImage};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

/// One observed catalog call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(u32),
    Detail(u64),
    Images(u64),
    Update(u64, String),
}

impl Call {
    pub fn sku(&self) -> Option<u64> {
        match self {
            Call::List(_) => None,
            Call::Detail(id) | Call::Images(id) | Call::Update(id, _) => Some(*id),
        }
    }
}

/// Checkpoint contents seen on disk while a SKU was being processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskView {
    pub sku: u64,
    pub page: u32,
    pub persisted_page: u32,
    pub persisted_ids: usize,
}

/// Catalog kept in memory; updates change the stored labels
#[derive(Default)]
pub struct InMemoryCatalog {
    pages: Vec<Vec<u64>>,
    names: HashMap<u64, String>,
    images: Mutex<HashMap<u64, Vec<Value>>>,
    reject_updates_for: Vec<u64>,
    fail_updates_for: Vec<u64>,
    fail_listing_at: Option<u32>,
    reject_listing_at: Option<u32>,
    latency: Option<Duration>,
    watched_checkpoint: Option<PathBuf>,
    calls: Mutex<Vec<Call>>,
    disk_views: Mutex<Vec<DiskView>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listing page
    pub fn page(mut self, ids: &[u64]) -> Self {
        self.pages.push(ids.to_vec());
        self
    }

    /// Register a SKU with a name and its current image labels
    pub fn sku(mut self, id: u64, name: &str, labels: &[&str]) -> Self {
        self.names.insert(id, name.to_string());
        let images = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                json!({
                    "Id": id * 100 + i as u64,
                    "Label": label,
                    "Text": label,
                    "Url": format!("https://cdn.example.com/{id}/{i}.jpg"),
                    "IsMain": i == 0
                })
            })
            .collect();
        self.images.get_mut().unwrap().insert(id, images);
        self
    }

    /// Register every SKU on every page with `count` unlabelled images
    pub fn unlabelled_skus(mut self, count: usize) -> Self {
        let ids: Vec<u64> = self.pages.iter().flatten().copied().collect();
        let labels = vec![""; count];
        for id in ids {
            self = self.sku(id, &format!("Produto {id}"), &labels);
        }
        self
    }

    pub fn reject_updates_for(mut self, id: u64) -> Self {
        self.reject_updates_for.push(id);
        self
    }

    pub fn fail_updates_for(mut self, id: u64) -> Self {
        self.fail_updates_for.push(id);
        self
    }

    pub fn fail_listing_at(mut self, page: u32) -> Self {
        self.fail_listing_at = Some(page);
        self
    }

    pub fn reject_listing_at(mut self, page: u32) -> Self {
        self.reject_listing_at = Some(page);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Read the checkpoint file whenever a SKU's images are fetched
    pub fn watch_checkpoint(mut self, path: PathBuf) -> Self {
        self.watched_checkpoint = Some(path);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn update_calls(&self) -> Vec<(u64, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Update(id, label) => Some((id, label)),
                _ => None,
            })
            .collect()
    }

    pub fn disk_views(&self) -> Vec<DiskView> {
        self.disk_views.lock().unwrap().clone()
    }

    pub fn labels(&self, id: u64) -> Vec<String> {
        self.images
            .lock()
            .unwrap()
            .get(&id)
            .map(|images| {
                images
                    .iter()
                    .map(|image| image["Label"].as_str().unwrap_or_default().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn page_of(&self, id: u64) -> Option<u32> {
        self.pages
            .iter()
            .position(|page| page.contains(&id))
            .map(|index| index as u32 + 1)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    async fn pause(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl CatalogApi for InMemoryCatalog {
    async fn list_sku_ids(&self, page: u32, _page_size: u32) -> Result<Vec<SkuId>> {
        self.record(Call::List(page));
        self.pause().await;
        if self.reject_listing_at == Some(page) {
            return Err(CatalogError::Unauthorized("cookie expired".into()).into());
        }
        if self.fail_listing_at == Some(page) {
            return Err(CatalogError::NoResponse(format!("page {page}")).into());
        }
        Ok(self
            .pages
            .get(page as usize - 1)
            .map(|ids| ids.iter().copied().map(SkuId::new).collect())
            .unwrap_or_default())
    }

    async fn get_sku(&self, id: SkuId) -> Result<Option<SkuDetail>> {
        self.record(Call::Detail(id.value()));
        self.pause().await;
        Ok(self.names.get(&id.value()).map(|name| SkuDetail {
            id,
            name: Some(name.clone()),
            ref_id: Some(format!("REF-{id}")),
        }))
    }

    async fn get_images(&self, id: SkuId) -> Result<Vec<SkuImage>> {
        self.record(Call::Images(id.value()));
        if let Some(path) = &self.watched_checkpoint {
            let saved = std::fs::read_to_string(path)
                .ok()
                .and_then(|s| serde_json::from_str::<Checkpoint>(&s).ok());
            self.disk_views.lock().unwrap().push(DiskView {
                sku: id.value(),
                page: self.page_of(id.value()).unwrap_or(0),
                persisted_page: saved.as_ref().map_or(1, |c| c.last_page),
                persisted_ids: saved.as_ref().map_or(0, |c| c.processed_count()),
            });
        }
        self.pause().await;

        let images = self
            .images
            .lock()
            .unwrap()
            .get(&id.value())
            .cloned()
            .unwrap_or_default();
        Ok(images
            .into_iter()
            .map(|value| SkuImage::from_value(value).unwrap())
            .collect())
    }

    async fn update_image(&self, id: SkuId, image: &SkuImage, label: &str) -> Result<()> {
        self.record(Call::Update(id.value(), label.to_string()));
        self.pause().await;
        if self.reject_updates_for.contains(&id.value()) {
            return Err(CatalogError::Unauthorized("cookie expired".into()).into());
        }
        if self.fail_updates_for.contains(&id.value()) {
            return Err(CatalogError::UnexpectedStatus {
                status: 500,
                body: "internal".into(),
            }
            .into());
        }

        let payload = image.relabeled(label);
        let mut images = self.images.lock().unwrap();
        if let Some(stored) = images
            .get_mut(&id.value())
            .and_then(|list| list.iter_mut().find(|v| v["Id"] == payload["Id"]))
        {
            *stored = payload;
        }
        Ok(())
    }
}

pub fn run_config(workers: usize, page_size: u32, checkpoint_interval: usize) -> RunConfig {
    RunConfig {
        workers,
        page_size,
        checkpoint_interval,
    }
}
