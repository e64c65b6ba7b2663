//! Integration tests for Dokan.
//!
//! # Running Tests
//!
//! ```bash
//! # Offline tests (file-backed store, cart persistence)
//! cargo test -p dokan-integration-tests
//!
//! # Tests against a live API
//! DOKAN_TEST_API_URL=http://localhost:5000/api \
//! DOKAN_TEST_EMAIL=... DOKAN_TEST_PASSWORD=... \
//! DOKAN_TEST_ADMIN_EMAIL=... DOKAN_TEST_ADMIN_PASSWORD=... \
//! cargo test -p dokan-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `storefront_session` - login, session restore, 401 handling, cart persistence
//! - `admin_dashboard` - moderation queue and sales reports

use std::sync::Arc;

use dokan_storefront::api::ApiClient;
use dokan_storefront::config::ApiConfig;
use dokan_storefront::storage::{FileStore, KeyValueStore};

/// Base URL of the API under test.
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("DOKAN_TEST_API_URL").unwrap_or_else(|_| "http://localhost:5000/api".to_string())
}

/// Credentials from the environment, if both are set.
#[must_use]
pub fn credentials(email_var: &str, password_var: &str) -> Option<(String, String)> {
    let email = std::env::var(email_var).ok()?;
    let password = std::env::var(password_var).ok()?;
    Some((email, password))
}

/// A file-backed store in a fresh temporary directory and a client using it.
///
/// Keep the returned directory alive for the duration of the test.
///
/// # Panics
///
/// Panics if the directory, store or client cannot be created.
#[must_use]
#[allow(clippy::expect_used)]
pub fn client_with_file_store() -> (ApiClient, Arc<dyn KeyValueStore>, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store: Arc<dyn KeyValueStore> = Arc::new(
        FileStore::open(dir.path().join("storage.json")).expect("Failed to open file store"),
    );
    let config = ApiConfig::with_base_url(&api_base_url()).expect("Invalid DOKAN_TEST_API_URL");
    let client = ApiClient::new(&config, store.clone()).expect("Failed to build API client");
    (client, store, dir)
}
