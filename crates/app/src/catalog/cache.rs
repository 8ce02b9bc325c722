//! Cache types for catalog responses.

use handlekurv_core::{Page, Product, ProductId};

use super::query::ProductQuery;

/// Cache key for products and product listings.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    Products { on_sale: bool, query: ProductQuery },
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Page<Product>),
}
