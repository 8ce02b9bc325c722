//! Integration tests for Handlekurv.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p handlekurv-integration-tests
//! ```
//!
//! Tests run against an in-process fake of the catalog backend (an axum
//! router bound to an ephemeral port) and temporary data directories, so
//! no external services are needed.
//!
//! # Test Categories
//!
//! - `catalog_client` - HTTP client, caching and error mapping
//! - `persistence` - On-device state surviving a restart

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::time::Duration;

use axum::Router;
use handlekurv_app::AppConfig;
use serde_json::{Value, json};
use url::Url;
use uuid::Uuid;

/// Serve `router` on `127.0.0.1` and return its base URL.
///
/// The server lives until the test's runtime shuts down.
///
/// # Panics
///
/// Panics if the listener cannot be bound.
#[allow(clippy::unwrap_used)]
pub async fn spawn_backend(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    Url::parse(&format!("http://{addr}/")).unwrap()
}

/// A fresh, not yet created, data directory under the system temp dir.
#[must_use]
pub fn temp_data_dir() -> PathBuf {
    std::env::temp_dir().join(format!("handlekurv-it-{}", Uuid::new_v4()))
}

/// Configuration pointing at `api_base_url` and `data_dir`.
#[must_use]
pub fn test_config(api_base_url: Url, data_dir: PathBuf) -> AppConfig {
    AppConfig {
        api_base_url,
        data_dir,
        cache_ttl: Duration::from_secs(300),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Product JSON as the backend sends it.
#[must_use]
pub fn product_json(id: i64, name: &str, price: f64, store: Option<(&str, &str)>) -> Value {
    let store = store.map_or(Value::Null, |(code, name)| {
        json!({ "code": code, "name": name, "url": null, "logo": null })
    });
    json!({
        "id": id,
        "name": name,
        "current_price": price,
        "store": store,
        "brand": null,
        "price_history": [],
    })
}

/// Physical store JSON as the backend sends it.
#[must_use]
pub fn store_json(id: i64, group: &str, name: &str) -> Value {
    json!({
        "id": id,
        "group": group,
        "name": name,
        "address": "Storgata 1, 0155 Oslo",
        "position": { "lat": 59.91, "lng": 10.75 },
        "openingHours": { "monday": "07:00 - 23:00" },
    })
}

/// Wrap `data` in a single-page listing envelope.
#[must_use]
pub fn page_json(data: Vec<Value>) -> Value {
    let count = data.len();
    json!({
        "data": data,
        "links": { "first": null, "last": null, "prev": null, "next": null },
        "meta": { "current_page": 1, "last_page": 1, "per_page": 24, "total": count },
    })
}
