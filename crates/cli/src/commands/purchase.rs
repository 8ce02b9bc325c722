//! Purchase confirmation and savings commands.

use handlekurv_app::{AppState, KeyValueStore, Result};
use handlekurv_core::ProductId;

use super::persist;
use crate::output;

/// Confirm a purchase of `ids` (or the whole list with `all`).
///
/// `bags` is the number of reusable bags brought; `None` means none.
pub async fn purchase<S: KeyValueStore>(
    state: &AppState<S>,
    ids: &[ProductId],
    all: bool,
    bags: Option<u32>,
) -> Result<String> {
    let ids: Vec<ProductId> = if all {
        state
            .cart()
            .snapshot()
            .items()
            .iter()
            .map(|item| item.product.id)
            .collect()
    } else {
        ids.to_vec()
    };

    let receipt = state.checkout().purchase(&ids, bags)?;
    let text = output::receipt(&receipt);
    persist(receipt.persisted).await;
    Ok(text)
}

/// Show the running savings totals.
pub fn savings<S: KeyValueStore>(state: &AppState<S>) -> String {
    output::savings(&state.savings().totals())
}
