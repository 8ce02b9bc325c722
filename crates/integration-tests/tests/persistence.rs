//! Integration tests for on-device state surviving a restart.
//!
//! Each test opens an `AppState` over a `FileStore` in a fresh temporary
//! directory, mutates it, waits for the background writes and then loads
//! a second `AppState` from the same directory.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::path::Path;
use std::sync::Arc;

use axum::extract::Path as UrlPath;
use axum::routing::get;
use axum::{Json, Router};
use handlekurv_app::{AppState, FileStore};
use handlekurv_core::{Co2Kg, Kroner, Product, ProductId, ProfileForm};
use handlekurv_integration_tests::{product_json, spawn_backend, temp_data_dir, test_config};
use rust_decimal::Decimal;
use url::Url;

async fn open(base_url: &Url, data_dir: &Path) -> AppState<FileStore> {
    let config = test_config(base_url.clone(), data_dir.to_path_buf());
    let store = Arc::new(FileStore::new(data_dir));
    AppState::load(config, store).await
}

fn offline_url() -> Url {
    Url::parse("http://127.0.0.1:9/").unwrap()
}

#[tokio::test]
async fn test_cart_and_savings_survive_restart() {
    let data_dir = temp_data_dir();
    let base_url = offline_url();

    {
        let state = open(&base_url, &data_dir).await;
        let melk = Product::new(ProductId::new(1), "Tine Lettmelk 1L", Kroner::whole(22))
            .with_store("KIWI", "Kiwi");
        let brod = Product::new(ProductId::new(2), "Grovbrød", Kroner::whole(35))
            .with_store("MENY_NO", "Meny");
        let egg = Product::new(ProductId::new(3), "Egg 12pk", Kroner::whole(49));

        state.cart().add_to_cart(melk.clone()).wait().await.unwrap();
        state.cart().add_to_cart(melk).wait().await.unwrap();
        state.cart().add_to_cart(brod).wait().await.unwrap();
        state.cart().add_to_cart(egg).wait().await.unwrap();

        let receipt = state
            .checkout()
            .purchase(&[ProductId::new(1), ProductId::new(2)], Some(2))
            .unwrap();
        assert_eq!(receipt.totals.money_saved, Kroner::whole(22));
        receipt.persisted.wait().await.unwrap();
    }

    let reopened = open(&base_url, &data_dir).await;
    let totals = reopened.savings().totals();
    assert_eq!(totals.money_saved, Kroner::whole(22));
    assert_eq!(totals.co2_saved, Co2Kg::new(Decimal::new(316, 2)));

    let cart = reopened.cart().snapshot();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.items()[0].product.id, ProductId::new(3));
    assert!(reopened.cart().store_codes().is_empty());

    std::fs::remove_dir_all(&data_dir).ok();
}

#[tokio::test]
async fn test_savings_accumulate_across_sessions() {
    let data_dir = temp_data_dir();
    let base_url = offline_url();

    for _ in 0..2 {
        let state = open(&base_url, &data_dir).await;
        state
            .cart()
            .add_to_cart(Product::new(ProductId::new(7), "Bananer", Kroner::whole(25)))
            .wait()
            .await
            .unwrap();
        let receipt = state
            .checkout()
            .purchase(&[ProductId::new(7)], None)
            .unwrap();
        receipt.persisted.wait().await.unwrap();
    }

    let state = open(&base_url, &data_dir).await;
    assert_eq!(state.savings().totals().money_saved, Kroner::whole(10));
    assert_eq!(state.savings().totals().co2_saved, Co2Kg::default());
    assert!(state.cart().is_empty());

    std::fs::remove_dir_all(&data_dir).ok();
}

#[tokio::test]
async fn test_profile_survives_restart() {
    let data_dir = temp_data_dir();
    let base_url = offline_url();

    let form = ProfileForm {
        name: "Kari".to_string(),
        gender: "female".to_string(),
        weight: "62.5".to_string(),
        height: "168".to_string(),
        age: "34".to_string(),
        activity: "lightly_active".to_string(),
        objective: "muscle_gain".to_string(),
        profile_picture: None,
    };
    open(&base_url, &data_dir)
        .await
        .profile()
        .save(&form)
        .unwrap()
        .wait()
        .await
        .unwrap();

    let reopened = open(&base_url, &data_dir).await;
    let profile = reopened.profile().profile().unwrap();
    assert_eq!(profile.name, "Kari");
    assert!((profile.weight - 62.5).abs() < f64::EPSILON);
    assert_eq!(profile.age, 34);

    std::fs::remove_dir_all(&data_dir).ok();
}

#[tokio::test]
async fn test_corrupt_files_fall_back_to_defaults() {
    let data_dir = temp_data_dir();
    std::fs::create_dir_all(&data_dir).unwrap();
    std::fs::write(data_dir.join("shoppingCart"), "{not json").unwrap();
    std::fs::write(data_dir.join("moneySaved"), "lots").unwrap();

    let state = open(&offline_url(), &data_dir).await;
    assert!(state.cart().is_empty());
    assert_eq!(state.savings().totals().money_saved, Kroner::default());
    assert!(state.profile().profile().is_none());

    std::fs::remove_dir_all(&data_dir).ok();
}

#[tokio::test]
async fn test_product_from_catalog_lands_in_cart() {
    let router = Router::new().route(
        "/products/id/{id}",
        get(|UrlPath(id): UrlPath<i64>| async move {
            Json(product_json(id, "Norvegia 1kg", 119.9, Some(("KIWI", "Kiwi"))))
        }),
    );
    let base_url = spawn_backend(router).await;
    let data_dir = temp_data_dir();

    {
        let state = open(&base_url, &data_dir).await;
        let product = state.catalog().product(ProductId::new(42)).await.unwrap();
        state.cart().add_to_cart(product).wait().await.unwrap();
    }

    let reopened = open(&base_url, &data_dir).await;
    assert_eq!(reopened.cart().quantity_of(ProductId::new(42)), 1);
    assert_eq!(reopened.cart().store_codes(), ["KIWI"]);
    assert_eq!(
        reopened.cart().total(),
        Kroner::new(Decimal::new(11990, 2))
    );

    std::fs::remove_dir_all(&data_dir).ok();
}
