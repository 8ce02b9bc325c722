//! Catalog backend API client.
//!
//! Plain JSON over HTTP with `reqwest` 0.13:
//!
//! - `GET /products`, `GET /products/on-sale`, `GET /products/id/{id}`
//! - `GET /physical-stores`, `GET /physical-stores/{id}`
//! - `POST /recipes/recommend`
//!
//! Product listings and single products are cached with `moka` for the
//! configured TTL. Searches bypass the cache. Requests are never retried.
//!
//! # Example
//!
//! ```rust,ignore
//! use handlekurv_app::catalog::{CatalogClient, ProductQuery};
//!
//! let client = CatalogClient::new(&config.api_base_url, config.cache_ttl);
//! let deals = client.products_on_sale(&ProductQuery::default().page(1, 20)).await?;
//! ```

mod cache;
mod query;

use std::sync::Arc;
use std::time::Duration;

use handlekurv_core::{
    Page, PhysicalStore, PhysicalStoreId, Position, Product, ProductId, RecommendationRequest,
    RecommendedRecipes,
};
use moka::future::Cache;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use cache::{CacheKey, CacheValue};
pub use query::{CART_STORE_RADIUS_KM, ProductQuery, StoreQuery};

/// Errors that can occur when talking to the catalog backend.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("Catalog API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl CatalogError {
    /// Whether the backend reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the catalog backend.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("cached_entries", &self.inner.cache.entry_count())
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a client for the backend at `base_url`.
    #[must_use]
    pub fn new(base_url: &Url, cache_ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(cache_ttl)
            .build();

        // Endpoints are joined relative to the base, which needs a trailing slash
        let mut base_url = base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url,
                cache,
            }),
        }
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, CatalogError> {
        Ok(self.inner.base_url.join(path)?)
    }

    fn get(&self, path: &str) -> Result<reqwest::RequestBuilder, CatalogError> {
        Ok(self.inner.client.get(self.endpoint(path)?))
    }

    fn post(&self, path: &str) -> Result<reqwest::RequestBuilder, CatalogError> {
        Ok(self.inner.client.post(self.endpoint(path)?))
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// List products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn products(&self, query: &ProductQuery) -> Result<Page<Product>, CatalogError> {
        self.product_listing("products", false, query).await
    }

    /// List products currently on sale.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn products_on_sale(
        &self,
        query: &ProductQuery,
    ) -> Result<Page<Product>, CatalogError> {
        self.product_listing("products/on-sale", true, query).await
    }

    async fn product_listing(
        &self,
        path: &str,
        on_sale: bool,
        query: &ProductQuery,
    ) -> Result<Page<Product>, CatalogError> {
        let cache_key = query.is_cacheable().then(|| CacheKey::Products {
            on_sale,
            query: query.clone(),
        });

        if let Some(key) = &cache_key
            && let Some(CacheValue::Products(page)) = self.inner.cache.get(key).await
        {
            debug!("Cache hit for product listing");
            return Ok(page);
        }

        let page: Page<Product> = send(self.get(path)?.query(query)).await?;
        debug!(count = page.data.len(), page = page.meta.current_page, "Fetched products");

        if let Some(key) = cache_key {
            self.inner
                .cache
                .insert(key, CacheValue::Products(page.clone()))
                .await;
        }

        Ok(page)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let cache_key = CacheKey::Product(id);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = send(self.get(&format!("products/id/{id}"))?).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    // =========================================================================
    // Physical Store Methods
    // =========================================================================

    /// List physical stores.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn physical_stores(
        &self,
        query: &StoreQuery,
    ) -> Result<Page<PhysicalStore>, CatalogError> {
        send(self.get("physical-stores")?.query(query)).await
    }

    /// Get a physical store by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is not found or the request fails.
    #[instrument(skip(self), fields(store_id = %id))]
    pub async fn physical_store(&self, id: PhysicalStoreId) -> Result<PhysicalStore, CatalogError> {
        send(self.get(&format!("physical-stores/{id}"))?).await
    }

    /// Find stores of every chain in the cart, near `position` when given.
    ///
    /// Issues one lookup per store code within [`CART_STORE_RADIUS_KM`].
    /// Stores are de-duplicated by ID in first-seen order. A failed lookup
    /// is logged and skipped.
    #[instrument(skip(self, store_codes), fields(codes = store_codes.len()))]
    pub async fn stores_for_cart(
        &self,
        store_codes: &[String],
        position: Option<Position>,
    ) -> Vec<PhysicalStore> {
        let mut stores: Vec<PhysicalStore> = Vec::new();

        for code in store_codes {
            let query = StoreQuery::for_group(code.as_str(), position, CART_STORE_RADIUS_KM);
            match self.physical_stores(&query).await {
                Ok(page) => {
                    for store in page.data {
                        if !stores.iter().any(|known| known.id == store.id) {
                            stores.push(store);
                        }
                    }
                }
                Err(e) => warn!(store_code = %code, error = %e, "Store lookup failed"),
            }
        }

        debug!(count = stores.len(), "Found stores for cart");
        stores
    }

    // =========================================================================
    // Recipe Methods
    // =========================================================================

    /// Ask the recommender for a meal plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, request))]
    pub async fn recommend_recipes(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendedRecipes, CatalogError> {
        send(self.post("recipes/recommend")?.json(request)).await
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Send `request` and decode its JSON response.
async fn send<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, CatalogError> {
    let response = request.send().await?;
    read_json(response).await
}

/// Decode a successful response, or turn a failed one into `CatalogError::Api`.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, CatalogError> {
    let status = response.status();
    let url = response.url().clone();

    // Get response body as text first for better error diagnostics
    let body = response.text().await?;

    if !status.is_success() {
        let detail = error_detail(&body);
        tracing::error!(
            status = %status,
            url = %url,
            detail = %detail,
            "Catalog API returned non-success status"
        );
        return Err(CatalogError::Api {
            status: status.as_u16(),
            detail,
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::error!(
            error = %e,
            url = %url,
            body = %body.chars().take(500).collect::<String>(),
            "Failed to parse catalog response"
        );
        CatalogError::Parse(e)
    })
}

/// Extract the backend's `detail` message from an error body.
fn error_detail(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        detail: serde_json::Value,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(message),
        }) => message,
        Ok(ErrorBody { detail }) if !detail.is_null() => detail.to_string(),
        _ if body.trim().is_empty() => "empty response body".to_string(),
        _ => body.chars().take(200).collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> CatalogClient {
        CatalogClient::new(&Url::parse(base).unwrap(), Duration::from_secs(300))
    }

    #[test]
    fn test_endpoint_join() {
        let client = client("http://localhost:8000");
        assert_eq!(
            client.endpoint("products/on-sale").unwrap().as_str(),
            "http://localhost:8000/products/on-sale"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = client("https://api.example.no/v1");
        assert_eq!(client.base_url().as_str(), "https://api.example.no/v1/");
        assert_eq!(
            client.endpoint("products/id/42").unwrap().as_str(),
            "https://api.example.no/v1/products/id/42"
        );
    }

    #[test]
    fn test_error_detail_string() {
        assert_eq!(
            error_detail(r#"{"detail": "Product not found"}"#),
            "Product not found"
        );
    }

    #[test]
    fn test_error_detail_structured() {
        let detail = error_detail(r#"{"detail": [{"loc": ["query", "page"], "msg": "bad"}]}"#);
        assert!(detail.contains("\"msg\":\"bad\""));
    }

    #[test]
    fn test_error_detail_fallbacks() {
        assert_eq!(error_detail(""), "empty response body");
        assert_eq!(error_detail("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_detail(r#"{"error": "x"}"#), r#"{"error": "x"}"#);
    }

    #[test]
    fn test_not_found_classification() {
        let err = CatalogError::Api {
            status: 404,
            detail: "missing".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Catalog API error (404): missing");
    }
}
