//! Command implementations.
//!
//! Each command takes the application state, performs its work, and
//! returns the text to show the user.

pub mod cart;
pub mod products;
pub mod profile;
pub mod purchase;
pub mod recipes;
pub mod stores;

use handlekurv_app::PersistHandle;

/// Wait for background writes before the process exits.
///
/// Failures are logged; the in-memory result of the command stands.
pub async fn persist(handle: PersistHandle) {
    if let Err(e) = handle.wait().await {
        tracing::warn!(error = %e, "Changes were not saved");
    }
}
