//! Cart state manager with write-through persistence.
//!
//! The cart lives in memory behind a mutex. Every mutation updates it
//! synchronously and then persists the whole cart under [`CART_KEY`] in the
//! background.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use handlekurv_core::{Cart, Kroner, Product, ProductId};
use tracing::{debug, instrument, warn};

use crate::storage::{CART_KEY, KeyValueStore, PersistHandle, WriteThrough};

/// Owner of the shopping cart.
#[derive(Debug)]
pub struct CartStore<S> {
    cart: Mutex<Cart>,
    writer: WriteThrough<S>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Load the persisted cart.
    ///
    /// A missing, unreadable or malformed value yields an empty cart.
    #[instrument(skip(store))]
    pub async fn load(store: Arc<S>) -> Self {
        let cart = match store.get(CART_KEY).await {
            Ok(Some(json)) => serde_json::from_str::<Cart>(&json).unwrap_or_else(|e| {
                warn!(error = %e, "Stored cart is malformed, starting empty");
                Cart::new()
            }),
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read stored cart, starting empty");
                Cart::new()
            }
        };

        debug!(line_items = cart.len(), "Loaded cart");
        Self::with_cart(store, cart)
    }

    /// Create a store around an existing cart without reading storage.
    #[must_use]
    pub fn with_cart(store: Arc<S>, cart: Cart) -> Self {
        Self {
            cart: Mutex::new(cart),
            writer: WriteThrough::new(store, CART_KEY),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add one unit of `product`.
    pub fn add_to_cart(&self, product: Product) -> PersistHandle {
        let product_id = product.id;
        self.mutate(|cart| {
            let quantity = cart.add(product);
            debug!(%product_id, quantity, "Added to cart");
        })
    }

    /// Remove one unit of `product_id`, deleting the line at zero.
    pub fn remove_from_cart(&self, product_id: ProductId) -> PersistHandle {
        self.mutate(|cart| {
            let remaining = cart.remove_one(product_id);
            debug!(%product_id, ?remaining, "Removed one from cart");
        })
    }

    /// Remove the whole line for `product_id`.
    pub fn remove_all_from_cart(&self, product_id: ProductId) -> PersistHandle {
        self.mutate(|cart| {
            let removed = cart.remove_all(product_id);
            debug!(%product_id, removed, "Removed line from cart");
        })
    }

    /// Empty the cart.
    pub fn clear_cart(&self) -> PersistHandle {
        self.mutate(|cart| {
            cart.clear();
            debug!("Cleared cart");
        })
    }

    fn mutate(&self, apply: impl FnOnce(&mut Cart)) -> PersistHandle {
        let mut cart = self.lock();
        apply(&mut cart);
        self.writer.write_json(&*cart)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Copy of the current cart.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.lock().clone()
    }

    /// Run `read` against the current cart without cloning it.
    pub fn with_cart_ref<R>(&self, read: impl FnOnce(&Cart) -> R) -> R {
        read(&self.lock())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.lock().quantity_of(product_id)
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.lock().contains(product_id)
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn total(&self) -> Kroner {
        self.lock().total()
    }

    /// Distinct store codes in first-seen order.
    #[must_use]
    pub fn store_codes(&self) -> Vec<String> {
        self.lock()
            .store_codes()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageError};
    use handlekurv_core::{CartLineItem, UNKNOWN_STORE_CODE};

    fn product(id: i64, price: i64) -> Product {
        Product::new(ProductId::new(id), format!("Vare {id}"), Kroner::whole(price))
    }

    fn stored_cart(store: &MemoryStore) -> Vec<CartLineItem> {
        serde_json::from_str(&store.peek(CART_KEY).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_load_missing_is_empty() {
        let cart = CartStore::load(Arc::new(MemoryStore::new())).await;
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_load_malformed_is_empty() {
        let store = MemoryStore::with_entries([(CART_KEY, "{not json")]);
        let cart = CartStore::load(Arc::new(store)).await;
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_add_twice_then_remove() {
        let store = Arc::new(MemoryStore::new());
        let cart = CartStore::load(Arc::clone(&store)).await;

        cart.add_to_cart(product(1, 10));
        cart.add_to_cart(product(1, 10)).wait().await.unwrap();
        assert_eq!(cart.quantity_of(ProductId::new(1)), 2);
        assert_eq!(stored_cart(&store)[0].quantity, 2);

        cart.remove_from_cart(ProductId::new(1)).wait().await.unwrap();
        assert_eq!(cart.quantity_of(ProductId::new(1)), 1);

        cart.remove_from_cart(ProductId::new(1)).wait().await.unwrap();
        assert!(!cart.contains(ProductId::new(1)));
        assert!(stored_cart(&store).is_empty());
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let store = Arc::new(MemoryStore::new());
        let cart = CartStore::load(Arc::clone(&store)).await;
        cart.add_to_cart(product(1, 10));

        cart.remove_from_cart(ProductId::new(9)).wait().await.unwrap();
        cart.remove_all_from_cart(ProductId::new(9)).wait().await.unwrap();
        assert_eq!(cart.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_all_and_clear() {
        let store = Arc::new(MemoryStore::new());
        let cart = CartStore::load(Arc::clone(&store)).await;
        for _ in 0..3 {
            cart.add_to_cart(product(1, 10));
        }
        cart.add_to_cart(product(2, 20));

        cart.remove_all_from_cart(ProductId::new(1)).wait().await.unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total(), Kroner::whole(20));

        cart.clear_cart().wait().await.unwrap();
        assert!(cart.is_empty());
        assert_eq!(store.peek(CART_KEY).as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_reload_preserves_order_and_quantities() {
        let store = Arc::new(MemoryStore::new());
        let cart = CartStore::load(Arc::clone(&store)).await;
        cart.add_to_cart(product(3, 30).with_store("KIWI", "Kiwi"));
        cart.add_to_cart(product(1, 10));
        cart.add_to_cart(product(3, 30).with_store("KIWI", "Kiwi"))
            .wait()
            .await
            .unwrap();

        let reloaded = CartStore::load(store).await;
        assert_eq!(reloaded.snapshot(), cart.snapshot());

        let ids: Vec<i64> = reloaded
            .snapshot()
            .items()
            .iter()
            .map(|item| item.product.id.as_i64())
            .collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(reloaded.quantity_of(ProductId::new(3)), 2);
    }

    #[tokio::test]
    async fn test_store_codes_and_grouping() {
        let cart = CartStore::load(Arc::new(MemoryStore::new())).await;
        cart.add_to_cart(product(1, 10).with_store("MENY_NO", "Meny"));
        cart.add_to_cart(product(2, 10));
        cart.add_to_cart(product(3, 10).with_store("KIWI", "Kiwi"));
        cart.add_to_cart(product(4, 10).with_store("MENY_NO", "Meny"));

        assert_eq!(cart.store_codes(), vec!["MENY_NO", "KIWI"]);

        let groups: Vec<(String, usize)> = cart.with_cart_ref(|cart| {
            cart.group_by_store()
                .iter()
                .map(|group| (group.store_code.to_string(), group.items.len()))
                .collect()
        });
        assert_eq!(
            groups,
            vec![
                ("MENY_NO".to_string(), 2),
                (UNKNOWN_STORE_CODE.to_string(), 1),
                ("KIWI".to_string(), 1),
            ]
        );
    }

    struct ReadFailingStore;

    impl KeyValueStore for ReadFailingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("locked".to_string()))
        }

        async fn set(&self, _key: &str, _value: String) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("locked".to_string()))
        }

        async fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_storage_failures_keep_memory_state() {
        let cart = CartStore::load(Arc::new(ReadFailingStore)).await;
        assert!(cart.is_empty());

        let result = cart.add_to_cart(product(1, 10)).wait().await;
        assert!(result.is_err());
        assert_eq!(cart.quantity_of(ProductId::new(1)), 1);
    }
}
