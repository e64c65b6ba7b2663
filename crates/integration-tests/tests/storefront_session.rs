//! Integration tests for the storefront session and cart containers.
//!
//! The offline tests only need a writable temp directory. The rest talk to a
//! live API and need:
//! - `DOKAN_TEST_API_URL` (defaults to `http://localhost:5000/api`)
//! - `DOKAN_TEST_EMAIL` and `DOKAN_TEST_PASSWORD` for a customer account
//!
//! Run with: `cargo test -p dokan-integration-tests -- --ignored`

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::Arc;

use dokan_core::ProductId;
use dokan_integration_tests::{client_with_file_store, credentials};
use dokan_storefront::api::{ApiError, SessionEvent};
use dokan_storefront::models::{CartItem, storage_keys};
use dokan_storefront::services::{AuthContainer, AuthPhase, CartContainer};
use dokan_storefront::storage::{FileStore, KeyValueStore};
use rust_decimal::Decimal;
use secrecy::SecretString;

fn tea_glass(color: &str, quantity: u32) -> CartItem {
    CartItem {
        product_id: ProductId::new("tea-glass"),
        name: "استکان کمرباریک".to_string(),
        price: Decimal::new(85_000, 0),
        image: String::new(),
        quantity,
        color: Some(color.to_string()),
        size: None,
    }
}

// =============================================================================
// Offline
// =============================================================================

#[test]
fn test_cart_survives_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&path).unwrap());
        let cart = CartContainer::load(store);
        cart.add_to_cart(tea_glass("gold", 2)).unwrap();
        cart.add_to_cart(tea_glass("gold", 1)).unwrap();
        cart.add_to_cart(tea_glass("clear", 6)).unwrap();
    }

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&path).unwrap());
    let cart = CartContainer::load(store);

    assert_eq!(cart.items().len(), 2);
    assert_eq!(cart.get_cart_items_count(), 9);
    assert_eq!(cart.get_cart_total(), Decimal::new(765_000, 0));
}

#[test]
fn test_cart_removal_without_variant_clears_every_line() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn KeyValueStore> =
        Arc::new(FileStore::open(dir.path().join("storage.json")).unwrap());
    let cart = CartContainer::load(store.clone());
    cart.add_to_cart(tea_glass("gold", 1)).unwrap();
    cart.add_to_cart(tea_glass("clear", 1)).unwrap();

    cart.remove_from_cart(&ProductId::new("tea-glass"), None, None)
        .unwrap();

    assert!(cart.is_empty());
    assert_eq!(store.get(storage_keys::CART).unwrap().as_deref(), Some("[]"));
}

#[tokio::test]
async fn test_user_without_token_is_dropped_on_initialize() {
    let (client, store, _dir) = client_with_file_store();
    store
        .set(
            storage_keys::USER,
            r#"{"id":"u1","firstName":"Sara","lastName":"Ahmadi","email":"sara@example.ir"}"#,
        )
        .unwrap();

    let auth = AuthContainer::new(Arc::new(client), store.clone());
    let phase = auth.initialize().await.unwrap();

    assert_eq!(phase, AuthPhase::Anonymous);
    assert!(auth.user().is_none());
    assert!(store.get(storage_keys::USER).unwrap().is_none());
}

// =============================================================================
// Live API
// =============================================================================

#[tokio::test]
#[ignore = "Requires running Dokan API and DOKAN_TEST_EMAIL/DOKAN_TEST_PASSWORD"]
async fn test_login_then_restore_session() {
    let (email, password) =
        credentials("DOKAN_TEST_EMAIL", "DOKAN_TEST_PASSWORD").expect("Credentials not set");
    let (client, store, _dir) = client_with_file_store();
    let client = Arc::new(client);

    let auth = AuthContainer::new(client.clone(), store.clone());
    let user = auth
        .login(&email, SecretString::from(password))
        .await
        .expect("Login failed");
    assert!(auth.is_authenticated());
    assert!(store.get(storage_keys::TOKEN).unwrap().is_some());

    // A fresh container on the same store picks the session back up
    let restored = AuthContainer::new(client, store);
    let phase = restored.initialize().await.unwrap();
    assert_eq!(phase, AuthPhase::Authenticated);
    assert_eq!(restored.user().map(|u| u.id), Some(user.id));
}

#[tokio::test]
#[ignore = "Requires running Dokan API"]
async fn test_rejected_token_signs_out_on_initialize() {
    let (client, store, _dir) = client_with_file_store();
    store.set(storage_keys::TOKEN, "not-a-real-token").unwrap();

    let auth = AuthContainer::new(Arc::new(client), store.clone());
    let phase = auth.initialize().await.unwrap();

    assert_eq!(phase, AuthPhase::Anonymous);
    assert!(auth.token().is_none());
    assert!(store.get(storage_keys::TOKEN).unwrap().is_none());
}

#[tokio::test]
#[ignore = "Requires running Dokan API"]
async fn test_unauthorized_response_broadcasts_expiry() {
    let (client, store, _dir) = client_with_file_store();
    store.set(storage_keys::TOKEN, "not-a-real-token").unwrap();
    store.set(storage_keys::ADMIN_TOKEN, "not-a-real-token").unwrap();
    let mut events = client.subscribe();

    let result = client.get::<serde_json::Value>("auth/profile", &[]).await;

    assert!(matches!(result, Err(ApiError::Unauthorized)));
    assert!(matches!(
        events.try_recv(),
        Ok(SessionEvent::Expired { .. })
    ));
    for key in storage_keys::SESSION_KEYS {
        assert!(store.get(key).unwrap().is_none(), "{key} was not cleared");
    }
}
