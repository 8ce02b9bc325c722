//! Shopping list commands.

use handlekurv_app::{AppState, KeyValueStore, PersistHandle, Result};
use handlekurv_core::ProductId;
use tracing::info;

use super::persist;
use crate::output;

/// Show the shopping list grouped by store.
pub fn show<S: KeyValueStore>(state: &AppState<S>) -> String {
    output::cart(&state.cart().snapshot())
}

/// Look up a product and add `quantity` units of it.
pub async fn add<S: KeyValueStore>(
    state: &AppState<S>,
    id: ProductId,
    quantity: u32,
) -> Result<String> {
    let product = state.catalog().product(id).await?;
    info!(product_id = %id, quantity, "Adding to shopping list");

    let handle: PersistHandle = (0..quantity)
        .map(|_| state.cart().add_to_cart(product.clone()))
        .collect();
    persist(handle).await;

    Ok(format!(
        "Added {} x {} ({} in list)",
        quantity,
        product.name,
        state.cart().quantity_of(id)
    ))
}

/// Remove one unit, or the whole line with `all`.
pub async fn remove<S: KeyValueStore>(state: &AppState<S>, id: ProductId, all: bool) -> String {
    if !state.cart().contains(id) {
        return format!("Product {id} is not in the shopping list.");
    }

    let handle = if all {
        state.cart().remove_all_from_cart(id)
    } else {
        state.cart().remove_from_cart(id)
    };
    persist(handle).await;

    match state.cart().quantity_of(id) {
        0 => format!("Removed product {id} from the shopping list."),
        left => format!("Product {id}: {left} left in the shopping list."),
    }
}

/// Empty the shopping list.
pub async fn clear<S: KeyValueStore>(state: &AppState<S>) -> String {
    persist(state.cart().clear_cart()).await;
    "Shopping list cleared.".to_string()
}
