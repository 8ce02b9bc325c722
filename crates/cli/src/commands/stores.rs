//! Physical store lookup.

use handlekurv_app::{AppState, KeyValueStore};
use handlekurv_core::Position;

use crate::output;

/// Stores for every chain in the shopping list, near `position` if given.
pub async fn nearby<S: KeyValueStore>(state: &AppState<S>, position: Option<Position>) -> String {
    let codes = state.cart().store_codes();
    if codes.is_empty() {
        return "The shopping list has no products with a known store.".to_string();
    }

    let stores = state.catalog().stores_for_cart(&codes, position).await;
    output::stores(&stores)
}
