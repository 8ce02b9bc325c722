//! Handlekurv App - Stores, persistence and the catalog API client.
//!
//! # Architecture
//!
//! - Domain rules live in `handlekurv-core`; this crate adds I/O around them
//! - Every piece of device state has exactly one owner store
//! - Mutations are synchronous in memory and persisted in the background
//! - [`AppState`] owns all stores and is passed explicitly to front ends
//!
//! # Modules
//!
//! - [`config`] - Environment configuration
//! - [`storage`] - Key-value stores and write-through persistence
//! - [`cart_store`] - Shopping cart owner
//! - [`savings_store`] - Money/CO2 savings owner
//! - [`profile_store`] - User profile owner
//! - [`checkout`] - Purchase settlement against cart and savings
//! - [`catalog`] - Catalog backend HTTP client
//! - [`state`] - Application state
//! - [`error`] - Error aggregation and Sentry helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart_store;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod profile_store;
pub mod savings_store;
pub mod state;
pub mod storage;

pub use cart_store::CartStore;
pub use catalog::{CatalogClient, CatalogError, ProductQuery, StoreQuery};
pub use checkout::{CheckoutService, Receipt};
pub use config::{AppConfig, ConfigError};
pub use error::{AppError, Result};
pub use profile_store::ProfileStore;
pub use savings_store::SavingsStore;
pub use state::AppState;
pub use storage::{FileStore, KeyValueStore, MemoryStore, PersistHandle, StorageError};
