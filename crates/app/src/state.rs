//! Application state shared across commands.

use std::sync::Arc;

use tracing::instrument;

use crate::cart_store::CartStore;
use crate::catalog::CatalogClient;
use crate::checkout::CheckoutService;
use crate::config::AppConfig;
use crate::profile_store::ProfileStore;
use crate::savings_store::SavingsStore;
use crate::storage::{FileStore, KeyValueStore};

/// Application state shared across all commands.
///
/// Owns every store and the catalog client. Cheaply cloneable via `Arc`;
/// front ends receive it explicitly instead of reaching for globals.
#[derive(Debug)]
pub struct AppState<S> {
    inner: Arc<AppStateInner<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[derive(Debug)]
struct AppStateInner<S> {
    config: AppConfig,
    catalog: CatalogClient,
    cart: Arc<CartStore<S>>,
    savings: Arc<SavingsStore<S>>,
    profile: ProfileStore<S>,
    checkout: CheckoutService<S>,
}

impl AppState<FileStore> {
    /// Open the on-device data directory named by `config`.
    pub async fn open(config: AppConfig) -> Self {
        let store = Arc::new(FileStore::new(&config.data_dir));
        Self::load(config, store).await
    }
}

impl<S: KeyValueStore> AppState<S> {
    /// Load every store from `store`.
    ///
    /// Never fails: unreadable data starts from defaults.
    #[instrument(skip_all, fields(api_base_url = %config.api_base_url))]
    pub async fn load(config: AppConfig, store: Arc<S>) -> Self {
        let catalog = CatalogClient::new(&config.api_base_url, config.cache_ttl);
        let cart = Arc::new(CartStore::load(Arc::clone(&store)).await);
        let savings = Arc::new(SavingsStore::load(Arc::clone(&store)).await);
        let profile = ProfileStore::load(store).await;
        let checkout = CheckoutService::new(Arc::clone(&cart), Arc::clone(&savings));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart,
                savings,
                profile,
                checkout,
            }),
        }
    }

    /// Get a reference to the application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the cart.
    #[must_use]
    pub fn cart(&self) -> &CartStore<S> {
        &self.inner.cart
    }

    /// Get a reference to the savings totals.
    #[must_use]
    pub fn savings(&self) -> &SavingsStore<S> {
        &self.inner.savings
    }

    /// Get a reference to the user profile.
    #[must_use]
    pub fn profile(&self) -> &ProfileStore<S> {
        &self.inner.profile
    }

    /// Get a reference to the purchase checkout.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutService<S> {
        &self.inner.checkout
    }
}
