//! Integration tests for the stored snapshot layout.
//!
//! The snapshot is a JSON array of line items stored as a string value under
//! `@GoMarketplace:cart`. Carts saved by earlier app builds must keep loading.

#![allow(clippy::unwrap_used)]

use gomarketplace_cart::{DEFAULT_STORAGE_KEY, WritePolicy};
use gomarketplace_core::ProductId;
use gomarketplace_integration_tests::{FileFixture, product};
use serde_json::{Value, json};

async fn stored_snapshot(fixture: &FileFixture) -> Value {
    let contents = tokio::fs::read_to_string(fixture.path()).await.unwrap();
    let entries: Value = serde_json::from_str(&contents).unwrap();
    let raw = entries[DEFAULT_STORAGE_KEY].as_str().unwrap();
    serde_json::from_str(raw).unwrap()
}

#[tokio::test]
async fn test_snapshot_is_array_of_line_items() {
    let fixture = FileFixture::new();
    let provider = fixture.mount(WritePolicy::WriteThrough).await.unwrap();
    let cart = provider.handle();

    cart.add(product("p1", "Shirt", 1000)).await.unwrap();
    cart.add(product("p1", "Shirt", 1000)).await.unwrap();

    let snapshot = stored_snapshot(&fixture).await;
    assert_eq!(
        snapshot,
        json!([{
            "id": "p1",
            "title": "Shirt",
            "image_url": "https://cdn.example/p1.png",
            "price": 10.0,
            "quantity": 2
        }])
    );
}

#[tokio::test]
async fn test_loads_snapshot_written_elsewhere() {
    let fixture = FileFixture::new();
    let raw = json!([
        {"id": "a", "title": "Mug", "image_url": "u1", "price": 12, "quantity": 3},
        {"id": "b", "title": "Cap", "image_url": "u2", "price": 7.5, "quantity": 1}
    ])
    .to_string();
    let file = json!({ (DEFAULT_STORAGE_KEY): raw }).to_string();
    tokio::fs::write(fixture.path(), file).await.unwrap();

    let provider = fixture.mount(WritePolicy::WriteThrough).await.unwrap();
    let cart = provider.handle();
    let snapshot = cart.products().unwrap();

    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.items()[0].id, ProductId::new("a"));
    assert_eq!(snapshot.items()[1].price, "7.5".parse().unwrap());
    assert_eq!(snapshot.item_count(), 4);

    cart.increment(&ProductId::new("b")).await.unwrap();
    let stored = stored_snapshot(&fixture).await;
    assert_eq!(stored[1]["quantity"], 2);
    assert_eq!(stored[0]["quantity"], 3);
}

#[tokio::test]
async fn test_other_keys_are_preserved() {
    let fixture = FileFixture::new();
    tokio::fs::write(fixture.path(), r#"{"@GoMarketplace:theme": "dark"}"#)
        .await
        .unwrap();

    let provider = fixture.mount(WritePolicy::WriteThrough).await.unwrap();
    provider
        .handle()
        .add(product("p1", "Shirt", 1000))
        .await
        .unwrap();

    let contents = tokio::fs::read_to_string(fixture.path()).await.unwrap();
    let entries: Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(entries["@GoMarketplace:theme"], "dark");
    assert!(entries[DEFAULT_STORAGE_KEY].is_string());
}
