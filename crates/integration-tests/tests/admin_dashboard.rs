//! Integration tests for the admin moderation queue and sales reports.
//!
//! Requirements for the live tests:
//! - `DOKAN_TEST_API_URL` (defaults to `http://localhost:5000/api`)
//! - `DOKAN_TEST_ADMIN_EMAIL` and `DOKAN_TEST_ADMIN_PASSWORD` for an admin account
//!
//! Run with: `cargo test -p dokan-integration-tests -- --ignored`

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::Arc;

use dokan_admin::download::{DirectorySink, today};
use dokan_admin::models::{
    CommentFilters, CommentFiltersPatch, ExportFormat, ReportFilters, StatusFilter,
};
use dokan_admin::notify::{ToastLevel, ToastLog};
use dokan_admin::store::AdminStore;
use dokan_admin::{CommentsService, FilterMode, ReportsService};
use dokan_core::CommentStatus;
use dokan_integration_tests::{client_with_file_store, credentials};
use dokan_storefront::api::ApiClient;
use dokan_storefront::config::ApiConfig;
use dokan_storefront::services::AuthContainer;
use dokan_storefront::storage::{KeyValueStore, MemoryStore};
use secrecy::SecretString;

const PAGE_SIZE: u32 = 10;

struct Dashboard {
    comments: CommentsService,
    reports: ReportsService,
    store: Arc<AdminStore>,
    toasts: Arc<ToastLog>,
    downloads: tempfile::TempDir,
    _storage: tempfile::TempDir,
}

fn dashboard(client: ApiClient, storage: tempfile::TempDir) -> Dashboard {
    let client = Arc::new(client);
    let store = Arc::new(AdminStore::new(
        CommentFilters::with_limit(PAGE_SIZE),
        ReportFilters::ending(today()),
    ));
    let toasts = Arc::new(ToastLog::new());
    let downloads = tempfile::tempdir().unwrap();
    let sink = Arc::new(DirectorySink::new(downloads.path()));

    Dashboard {
        comments: CommentsService::new(
            client.clone(),
            store.clone(),
            toasts.clone(),
            sink.clone(),
            FilterMode::ServerAndClient,
        ),
        reports: ReportsService::new(client, store.clone(), toasts.clone(), sink),
        store,
        toasts,
        downloads,
        _storage: storage,
    }
}

/// Log in as the test admin and build the dashboard on that session.
async fn admin_dashboard() -> Dashboard {
    let (email, password) = credentials("DOKAN_TEST_ADMIN_EMAIL", "DOKAN_TEST_ADMIN_PASSWORD")
        .expect("Admin credentials not set");
    let (client, store, dir) = client_with_file_store();

    let auth = AuthContainer::new(Arc::new(client.clone()), store);
    auth.login(&email, SecretString::from(password))
        .await
        .expect("Admin login failed");
    assert!(auth.is_admin(), "Test account is not an admin");

    dashboard(client, dir)
}

// =============================================================================
// Offline
// =============================================================================

#[tokio::test]
async fn test_unreachable_api_surfaces_error_toast() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let config = ApiConfig::with_base_url("http://127.0.0.1:1/api").unwrap();
    let client = ApiClient::new(&config, store).unwrap();
    let board = dashboard(client, tempfile::tempdir().unwrap());

    let result = board.reports.fetch_reports_data(None).await;

    assert!(result.is_err());
    let state = board.store.reports();
    assert!(!state.loading);
    assert!(state.error.is_some());
    assert!(state.data.is_none());
    assert_eq!(board.toasts.last().unwrap().level, ToastLevel::Error);
}

// =============================================================================
// Comments
// =============================================================================

#[tokio::test]
#[ignore = "Requires running Dokan API and admin credentials"]
async fn test_fetch_comments_fills_the_queue() {
    let board = admin_dashboard().await;

    let outcome = board.comments.fetch_comments(None).await.unwrap();
    assert!(outcome.is_applied());

    let state = board.comments.state();
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert!(board.comments.paginated_comments().len() <= PAGE_SIZE as usize);

    let stats = board.comments.statistics();
    assert_eq!(stats.total, state.comments.len());
}

#[tokio::test]
#[ignore = "Requires running Dokan API and admin credentials"]
async fn test_status_filter_is_honored() {
    let board = admin_dashboard().await;

    board
        .comments
        .fetch_comments(Some(CommentFiltersPatch {
            status: Some(StatusFilter::Only(CommentStatus::Pending)),
            ..CommentFiltersPatch::default()
        }))
        .await
        .unwrap();

    assert!(
        board
            .comments
            .filtered_comments()
            .iter()
            .all(|c| c.status == CommentStatus::Pending)
    );
}

#[tokio::test]
#[ignore = "Requires running Dokan API and admin credentials"]
async fn test_export_comments_writes_dated_file() {
    let board = admin_dashboard().await;

    let path = board
        .comments
        .export_comments(ExportFormat::Csv)
        .await
        .unwrap();

    assert!(path.starts_with(board.downloads.path()));
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("comments-export-"));
    assert!(name.ends_with(".csv"));
    assert_eq!(board.toasts.last().unwrap().level, ToastLevel::Success);
}

// =============================================================================
// Reports
// =============================================================================

#[tokio::test]
#[ignore = "Requires running Dokan API and admin credentials"]
async fn test_reports_fetch_and_statistics() {
    let board = admin_dashboard().await;

    let outcome = board.reports.fetch_reports_data(None).await.unwrap();
    assert!(outcome.is_applied());
    assert!(board.reports.data().is_some());

    let stats = board.reports.statistics();
    assert!(stats.totals.revenue >= 0.0);
    let chart = board.reports.sales_chart();
    for dataset in &chart.datasets {
        assert_eq!(dataset.values.len(), chart.labels.len());
    }
}

#[tokio::test]
#[ignore = "Requires running Dokan API and admin credentials"]
async fn test_export_report_as_pdf() {
    let board = admin_dashboard().await;

    let path = board.reports.export_to_pdf().await.unwrap();

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(name, format!("sales-report-{}.pdf", today().format("%Y-%m-%d")));
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}
