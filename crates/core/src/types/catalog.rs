//! Catalog records returned by the product/store backend.
//!
//! These mirror the backend's JSON shapes. Only the fields the shopping list
//! depends on are required; everything else is optional and defaults when
//! absent so that catalog schema drift never breaks cart loading.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{PhysicalStoreId, ProductId};
use super::units::Kroner;

// =============================================================================
// Product Types
// =============================================================================

/// Grocery chain a product listing belongs to (e.g., `KIWI`, `MENY_NO`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRef {
    /// Chain code, used to look up physical stores.
    pub code: String,
    /// Display name (e.g., "Kiwi").
    pub name: String,
    /// Chain website.
    #[serde(default)]
    pub url: Option<String>,
    /// Chain logo URL.
    #[serde(default)]
    pub logo: Option<String>,
}

/// Historical price point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub price: Kroner,
    /// ISO datetime as sent by the backend.
    pub date: String,
}

/// Allergen declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allergen {
    pub code: String,
    pub display_name: String,
    /// `YES`, `NO` or `CAN_CONTAIN_TRACES`.
    pub contains: String,
}

/// Nutrition fact per 100 g/ml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub code: String,
    pub display_name: String,
    pub amount: f64,
    pub unit: String,
}

/// Kind of promotion attached to a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleKind {
    /// Fixed sale price (`price`).
    Price,
    /// Percent off the shelf price (`discount_percentage`).
    Percentage,
    /// `n` units for `total_price`.
    NForPrice,
}

/// Promotion details as sent by the backend.
///
/// Only the fields matching `kind` are expected to be set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    #[serde(rename = "type")]
    pub kind: SaleKind,
    #[serde(default)]
    pub price: Option<Kroner>,
    /// e.g. `20` for 20% off.
    #[serde(default)]
    pub discount_percentage: Option<Decimal>,
    #[serde(default)]
    pub n: Option<u32>,
    #[serde(default)]
    pub total_price: Option<Kroner>,
}

impl Sale {
    /// Price of one unit under this sale, rounded to øre.
    ///
    /// `None` when the sale is missing the fields its kind needs, or for a
    /// percentage sale on a product without a shelf price.
    #[must_use]
    pub fn unit_price(&self, regular: Option<Kroner>) -> Option<Kroner> {
        let amount = match self.kind {
            SaleKind::Price => self.price?.amount(),
            SaleKind::Percentage => {
                let percent = self.discount_percentage?;
                regular?.amount() * (Decimal::ONE_HUNDRED - percent) / Decimal::ONE_HUNDRED
            }
            SaleKind::NForPrice => match self.n? {
                0 => return None,
                n => self.total_price?.amount() / Decimal::from(n),
            },
        };
        Some(Kroner::new(amount.round_dp(2)))
    }

    /// Short description of the deal, e.g. `-20%` or `3 for 99.00 kr`.
    #[must_use]
    pub fn describe(&self) -> Option<String> {
        match self.kind {
            SaleKind::Price => self.price.map(|price| format!("sale {price}")),
            SaleKind::Percentage => self
                .discount_percentage
                .map(|percent| format!("-{}%", percent.normalize())),
            SaleKind::NForPrice => self
                .n
                .zip(self.total_price)
                .map(|(n, total)| format!("{n} for {total}")),
        }
    }
}

/// A product listing from one grocery chain.
///
/// Treated as an immutable value by the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Shelf price for one unit. Some listings carry none.
    #[serde(default)]
    pub current_price: Option<Kroner>,
    #[serde(default)]
    pub sale: Option<Sale>,
    #[serde(default)]
    pub store: Option<StoreRef>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub ean: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Option<String>,
    /// Price per kg/l.
    #[serde(default)]
    pub current_unit_price: Option<Kroner>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub weight_unit: Option<String>,
    #[serde(default)]
    pub price_history: Vec<PricePoint>,
    #[serde(default)]
    pub allergens: Vec<Allergen>,
    #[serde(default)]
    pub nutrition: Vec<Nutrition>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Product {
    /// Create a product with only the fields the shopping list needs.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, current_price: Kroner) -> Self {
        Self {
            id,
            name: name.into(),
            current_price: Some(current_price),
            sale: None,
            store: None,
            brand: None,
            vendor: None,
            ean: None,
            url: None,
            image: None,
            description: None,
            ingredients: None,
            current_unit_price: None,
            weight: None,
            weight_unit: None,
            price_history: Vec::new(),
            allergens: Vec::new(),
            nutrition: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Price of one unit with any sale applied.
    ///
    /// Falls back to the shelf price when there is no usable sale.
    #[must_use]
    pub fn effective_price(&self) -> Option<Kroner> {
        self.sale
            .as_ref()
            .and_then(|sale| sale.unit_price(self.current_price))
            .or(self.current_price)
    }

    /// Whether a usable sale lowers the price.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.effective_price() != self.current_price
    }

    /// Attach a store reference.
    #[must_use]
    pub fn with_store(mut self, code: impl Into<String>, name: impl Into<String>) -> Self {
        self.store = Some(StoreRef {
            code: code.into(),
            name: name.into(),
            url: None,
            logo: None,
        });
        self
    }
}

// =============================================================================
// Physical Store Types
// =============================================================================

/// Geographic coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

/// Opening hours per weekday, free-form (e.g., "07:00 - 23:00").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningHours {
    pub monday: Option<String>,
    pub tuesday: Option<String>,
    pub wednesday: Option<String>,
    pub thursday: Option<String>,
    pub friday: Option<String>,
    pub saturday: Option<String>,
    pub sunday: Option<String>,
}

/// A physical grocery store location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalStore {
    pub id: PhysicalStoreId,
    /// Chain code (matches [`StoreRef::code`]).
    pub group: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub fax: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub detail_url: Option<String>,
    pub position: Position,
    #[serde(default)]
    pub opening_hours: OpeningHours,
}

// =============================================================================
// Pagination
// =============================================================================

/// Pagination links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    #[serde(default)]
    pub first: Option<String>,
    #[serde(default)]
    pub last: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

/// Pagination metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    #[serde(default)]
    pub from: Option<u32>,
    #[serde(default)]
    pub to: Option<u32>,
    #[serde(default)]
    pub last_page: Option<u32>,
    pub per_page: u32,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub path: Option<String>,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub links: PageLinks,
    #[serde(default)]
    pub meta: PageMeta,
}

impl<T> Page<T> {
    /// Whether the backend reports a following page.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.links.next.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_product_from_backend_json() {
        let json = r#"{
            "id": 101,
            "name": "Tine Lettmelk 1L",
            "brand": "Tine",
            "current_price": 21.9,
            "store": {"name": "Kiwi", "code": "KIWI", "url": "https://kiwi.no", "logo": "kiwi.png"},
            "price_history": [{"price": 22.4, "date": "2024-01-01T00:00:00.000000Z"}],
            "allergens": [{"code": "milk", "display_name": "Melk", "contains": "YES"}],
            "nutrition": [],
            "unknown_field": true
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(101));
        assert_eq!(product.current_price.unwrap().to_string(), "21.90 kr");
        assert!(product.sale.is_none());
        assert_eq!(product.store.as_ref().unwrap().code, "KIWI");
        assert_eq!(product.price_history.len(), 1);
        assert!(product.ean.is_none());
    }

    #[test]
    fn test_product_without_store() {
        let json = r#"{"id": 1, "name": "Løsvekt", "current_price": 10}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.store.is_none());
    }

    #[test]
    fn test_physical_store_camel_case() {
        let json = r#"{
            "id": 9,
            "group": "KIWI",
            "name": "Kiwi Grünerløkka",
            "address": "Thorvald Meyers gate 1",
            "detailUrl": "https://example.no/9",
            "position": {"lat": 59.92, "lng": 10.76},
            "openingHours": {"monday": "07:00 - 23:00"}
        }"#;

        let store: PhysicalStore = serde_json::from_str(json).unwrap();
        assert_eq!(store.detail_url.as_deref(), Some("https://example.no/9"));
        assert_eq!(store.opening_hours.monday.as_deref(), Some("07:00 - 23:00"));
        assert!(store.opening_hours.sunday.is_none());
    }

    #[test]
    fn test_page_has_next() {
        let json = r#"{
            "data": [],
            "links": {"first": "/p?page=1", "next": "/p?page=2"},
            "meta": {"current_page": 1, "per_page": 20}
        }"#;
        let page: Page<Product> = serde_json::from_str(json).unwrap();
        assert!(page.has_next());
        assert_eq!(page.meta.per_page, 20);
    }

    #[test]
    fn test_page_with_missing_price() {
        let json = r#"{
            "data": [
                {"id": 1, "name": "Tine Lettmelk 1L", "current_price": 21.9},
                {"id": 2, "name": "Pant", "current_price": null},
                {"id": 3, "name": "Løsvekt godteri"}
            ],
            "meta": {"current_page": 1, "per_page": 20}
        }"#;

        let page: Page<Product> = serde_json::from_str(json).unwrap();
        assert_eq!(page.data.len(), 3);
        assert_eq!(page.data[0].current_price, Some(Kroner::new(Decimal::new(219, 1))));
        assert!(page.data[1].current_price.is_none());
        assert!(page.data[2].effective_price().is_none());
    }

    fn on_sale(sale: &str) -> Product {
        let json = format!(r#"{{"id": 5, "name": "Kyllingfilet", "current_price": 100, "sale": {sale}}}"#);
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_price_sale() {
        let product = on_sale(r#"{"type": "price", "price": 79.9}"#);
        assert_eq!(product.effective_price(), Some(Kroner::new(Decimal::new(7990, 2))));
        assert!(product.is_discounted());
        assert_eq!(product.sale.unwrap().describe().unwrap(), "sale 79.90 kr");
    }

    #[test]
    fn test_percentage_sale() {
        let product = on_sale(r#"{"type": "percentage", "discount_percentage": 20}"#);
        assert_eq!(product.effective_price(), Some(Kroner::whole(80)));
        assert_eq!(product.sale.unwrap().describe().unwrap(), "-20%");
    }

    #[test]
    fn test_percentage_sale_without_shelf_price() {
        let sale = Sale {
            kind: SaleKind::Percentage,
            price: None,
            discount_percentage: Some(Decimal::from(20)),
            n: None,
            total_price: None,
        };
        assert!(sale.unit_price(None).is_none());
    }

    #[test]
    fn test_n_for_price_sale() {
        let product = on_sale(r#"{"type": "n_for_price", "n": 3, "total_price": 100}"#);
        assert_eq!(product.effective_price(), Some(Kroner::new(Decimal::new(3333, 2))));
        assert_eq!(product.sale.unwrap().describe().unwrap(), "3 for 100.00 kr");
    }

    #[test]
    fn test_incomplete_sale_falls_back_to_shelf_price() {
        let product = on_sale(r#"{"type": "price"}"#);
        assert_eq!(product.effective_price(), Some(Kroner::whole(100)));
        assert!(!product.is_discounted());

        let zero_units = on_sale(r#"{"type": "n_for_price", "n": 0, "total_price": 50}"#);
        assert_eq!(zero_units.effective_price(), Some(Kroner::whole(100)));
    }
}
