//! Handlekurv Core - Shopping list domain library.
//!
//! This crate provides the pure, I/O-free pieces shared by the Handlekurv
//! application and its front ends:
//! - `app` - Stores, persistence and the catalog API client
//! - `cli` - Terminal front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no
//! storage, no HTTP clients, no runtime. Everything here can be tested
//! synchronously.
//!
//! # Modules
//!
//! - [`types`] - IDs, currency/mass units, catalog records, profile, recipes
//! - [`cart`] - Cart line items and the grouped-by-store projection
//! - [`savings`] - Savings totals and settlement deltas
//! - [`settlement`] - Checked items and the purchase confirmation state machine
//! - [`recipe_text`] - Decoder for the list strings embedded in recipe records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod recipe_text;
pub mod savings;
pub mod settlement;
pub mod types;

pub use cart::{Cart, CartLineItem, StoreGroup, UNKNOWN_STORE_CODE, UNKNOWN_STORE_NAME};
pub use savings::{SavingsDelta, SavingsTotals};
pub use settlement::{CheckedItems, FlowState, PurchaseFlow, Settlement, SettlementError};
pub use types::*;
