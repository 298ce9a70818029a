//! VTEX catalog implementation
//!
//! Endpoints, relative to the account base URL:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | list      | `GET /api/catalog_system/pvt/sku/stockkeepingunitids?page={p}&pagesize={n}` |
//! | detail    | `GET /api/catalog/pvt/stockkeepingunit/{id}` |
//! | images    | `GET /api/catalog/pvt/stockkeepingunit/{id}/file` |
//! | update    | `PUT /api/catalog/pvt/stockkeepingunit/{id}/file/{fileId}` |

use super::traits::CatalogApi;
use crate::adapters::http::{
    HttpRequest, HttpResponse, RateGate, RequestLayer, ReqwestTransport,
};
use crate::config::{CatalogConfig, SecretString, SkuLabelConfig};
use crate::domain::ids::SkuId;
use crate::domain::{CatalogError, Result, SkuDetail, SkuImage, SkuLabelError};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const STATUS_UNAUTHORIZED: u16 = 401;
const STATUS_NOT_FOUND: u16 = 404;

/// Catalog client for a VTEX account
#[derive(Clone)]
pub struct VtexCatalog {
    requests: RequestLayer,
    base_url: String,
    auth_header: String,
    auth_token: SecretString,
}

impl VtexCatalog {
    /// Create a catalog client on top of an existing request layer
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no credential is configured.
    pub fn new(config: &CatalogConfig, requests: RequestLayer) -> Result<Self> {
        let auth_token = config.auth_token.clone().ok_or_else(|| {
            SkuLabelError::Configuration("catalog.auth_token is required".to_string())
        })?;

        Ok(Self {
            requests,
            base_url: config.base_url(),
            auth_header: config.auth_header.clone(),
            auth_token,
        })
    }

    /// Build the full stack: pooled reqwest transport, shared rate gate and
    /// retrying request layer
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or no credential
    /// is configured.
    pub fn from_config(config: &SkuLabelConfig) -> Result<Self> {
        let transport = ReqwestTransport::with_settings(
            Duration::from_secs(config.catalog.timeout_seconds),
            config.catalog.pool_max_idle_per_host,
        )
        .map_err(|e| SkuLabelError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        let gate = Arc::new(RateGate::new(Duration::from_millis(
            config.rate_limit.min_interval_ms,
        )));
        let requests = RequestLayer::new(
            Arc::new(transport),
            gate,
            config.catalog.retry.clone(),
            config.rate_limit.clone(),
        );

        Self::new(&config.catalog, requests)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn sku_url(&self, id: SkuId) -> String {
        format!("{}/api/catalog/pvt/stockkeepingunit/{}", self.base_url, id)
    }

    fn authorized(&self, request: HttpRequest) -> HttpRequest {
        let token: &str = self.auth_token.expose_secret().as_ref();
        request
            .with_header(&self.auth_header, token)
            .with_header("Content-Type", "application/json")
            .with_header("Accept", "application/json")
    }

    /// Send and reject missing responses and 401s
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let target = format!("{} {}", request.method, request.url);
        let response = self
            .requests
            .execute(self.authorized(request))
            .await
            .ok_or_else(|| CatalogError::NoResponse(target.clone()))?;

        if response.status == STATUS_UNAUTHORIZED {
            return Err(CatalogError::Unauthorized(format!("credential rejected by {target}")).into());
        }
        Ok(response)
    }
}

fn unexpected(response: &HttpResponse) -> SkuLabelError {
    CatalogError::UnexpectedStatus {
        status: response.status,
        body: response.text(),
    }
    .into()
}

fn invalid(context: &str, error: impl std::fmt::Display) -> SkuLabelError {
    CatalogError::InvalidResponse(format!("{context}: {error}")).into()
}

#[async_trait]
impl CatalogApi for VtexCatalog {
    async fn list_sku_ids(&self, page: u32, page_size: u32) -> Result<Vec<SkuId>> {
        let url = format!(
            "{}/api/catalog_system/pvt/sku/stockkeepingunitids?page={}&pagesize={}",
            self.base_url, page, page_size
        );
        let response = self.send(HttpRequest::get(url)).await?;
        if !response.is_success() {
            return Err(unexpected(&response));
        }

        let ids: Vec<u64> = response
            .json()
            .map_err(|e| invalid(&format!("SKU id page {page}"), e))?;
        Ok(ids.into_iter().map(SkuId::new).collect())
    }

    async fn get_sku(&self, id: SkuId) -> Result<Option<SkuDetail>> {
        let response = self.send(HttpRequest::get(self.sku_url(id))).await?;
        if response.status == STATUS_NOT_FOUND {
            return Ok(None);
        }
        if !response.is_success() {
            return Err(unexpected(&response));
        }

        let value: Value = response
            .json()
            .map_err(|e| invalid(&format!("SKU {id} detail"), e))?;
        Ok(Some(SkuDetail::from_json(id, &value)))
    }

    async fn get_images(&self, id: SkuId) -> Result<Vec<SkuImage>> {
        let url = format!("{}/file", self.sku_url(id));
        let response = self.send(HttpRequest::get(url)).await?;
        if response.status == STATUS_NOT_FOUND {
            return Ok(Vec::new());
        }
        if !response.is_success() {
            return Err(unexpected(&response));
        }

        // Some accounts answer 200 with an empty body for SKUs without files
        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let values: Vec<Value> = response
            .json()
            .map_err(|e| invalid(&format!("SKU {id} images"), e))?;
        values
            .into_iter()
            .map(|value| SkuImage::from_value(value).map_err(|e| invalid(&format!("SKU {id} images"), e)))
            .collect()
    }

    async fn update_image(&self, id: SkuId, image: &SkuImage, label: &str) -> Result<()> {
        let file_id = image.file_id().ok_or_else(|| {
            invalid(&format!("SKU {id} image"), "missing numeric Id")
        })?;
        let url = format!("{}/file/{}", self.sku_url(id), file_id);

        let request = HttpRequest::put(url).with_json(&image.relabeled(label));
        let response = self.send(request).await?;
        if !response.is_success() {
            return Err(unexpected(&response));
        }
        Ok(())
    }
}
