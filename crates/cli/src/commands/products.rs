//! Product browsing commands.

use handlekurv_app::{AppState, KeyValueStore, ProductQuery, Result};
use handlekurv_core::ProductId;

use crate::output;

/// List or search products.
pub async fn list<S: KeyValueStore>(state: &AppState<S>, query: &ProductQuery) -> Result<String> {
    let page = state.catalog().products(query).await?;
    Ok(output::product_page(&page))
}

/// List products currently on sale.
pub async fn deals<S: KeyValueStore>(state: &AppState<S>, query: &ProductQuery) -> Result<String> {
    let page = state.catalog().products_on_sale(query).await?;
    Ok(output::product_page(&page))
}

/// Show one product.
pub async fn show<S: KeyValueStore>(state: &AppState<S>, id: ProductId) -> Result<String> {
    let product = state.catalog().product(id).await?;
    Ok(output::product_detail(&product))
}
