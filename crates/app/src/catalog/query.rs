//! Query parameters for the listing endpoints.

use rust_decimal::Decimal;
use serde::Serialize;

use handlekurv_core::Position;

/// Search radius used when looking up stores for the cart.
pub const CART_STORE_RADIUS_KM: f64 = 20.0;

/// Filters for `GET /products` and `GET /products/on-sale`.
///
/// Unset fields are omitted so the backend applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_min: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_max: Option<Decimal>,
    /// Collapse listings of the same EAN across chains.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_without_ean: Option<bool>,
    /// e.g. `price_asc`, `price_desc`, `date_desc`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl ProductQuery {
    /// Free-text search.
    #[must_use]
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Self::default()
        }
    }

    /// Request a specific page.
    #[must_use]
    pub const fn page(mut self, page: u32, size: u32) -> Self {
        self.page = Some(page);
        self.size = Some(size);
        self
    }

    /// Whether responses for this query may be served from cache.
    ///
    /// Search results go straight to the backend.
    #[must_use]
    pub const fn is_cacheable(&self) -> bool {
        self.search.is_none()
    }
}

/// Filters for `GET /physical-stores`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    /// Radius around `lat`/`lng`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub km: Option<f64>,
    /// Chain code, e.g. `KIWI`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl StoreQuery {
    /// Stores of chain `group`, optionally near `position`.
    #[must_use]
    pub fn for_group(group: impl Into<String>, position: Option<Position>, km: f64) -> Self {
        Self {
            group: Some(group.into()),
            lat: position.map(|p| p.lat),
            lng: position.map(|p| p.lng),
            km: position.map(|_| km),
            ..Self::default()
        }
    }
}
