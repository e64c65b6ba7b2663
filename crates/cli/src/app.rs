//! Composition root.
//!
//! Every container and service is built exactly once here and handed to the
//! commands by reference.

use std::sync::Arc;

use dokan_admin::download::{DirectorySink, today};
use dokan_admin::models::{CommentFilters, ReportFilters};
use dokan_admin::notify::{ToastLevel, ToastLog};
use dokan_admin::store::AdminStore;
use dokan_admin::{AdminConfig, CommentsService, ReportsService};
use dokan_storefront::api::ApiClient;
use dokan_storefront::config::StorefrontConfig;
use dokan_storefront::services::{AuthContainer, CartContainer};
use dokan_storefront::storage::{FileStore, KeyValueStore};
use tokio::task::JoinHandle;

use crate::error::CliError;

pub struct App {
    pub auth: Arc<AuthContainer>,
    pub cart: CartContainer,
    pub comments: CommentsService,
    pub reports: ReportsService,
    toasts: Arc<ToastLog>,
    session_watch: JoinHandle<()>,
}

impl App {
    /// Wire the store, API client, containers and admin services.
    ///
    /// Must be called inside the tokio runtime; the session watcher is
    /// spawned here.
    pub fn build(config: &StorefrontConfig, admin: &AdminConfig) -> Result<Self, CliError> {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.storage_path)?);
        let api = ApiClient::new(&config.api, store.clone())?;

        let auth = Arc::new(AuthContainer::new(Arc::new(api.clone()), store.clone()));
        let session_watch = auth.clone().watch_session_events(api.subscribe());
        let cart = CartContainer::load(store);

        let toasts = Arc::new(ToastLog::new());
        let admin_store = Arc::new(AdminStore::new(
            CommentFilters::with_limit(admin.comments_page_size),
            ReportFilters::ending(today()),
        ));
        let downloads = Arc::new(DirectorySink::new(&admin.download_dir));

        let comments = CommentsService::new(
            Arc::new(api.clone()),
            admin_store.clone(),
            toasts.clone(),
            downloads.clone(),
            admin.filter_mode,
        );
        let reports = ReportsService::new(Arc::new(api), admin_store, toasts.clone(), downloads);

        Ok(Self {
            auth,
            cart,
            comments,
            reports,
            toasts,
            session_watch,
        })
    }

    /// Validate the stored session and require an admin account.
    pub async fn require_admin(&self) -> Result<(), CliError> {
        self.auth.initialize().await?;
        if !self.auth.is_authenticated() {
            return Err(CliError::NotLoggedIn);
        }
        if !self.auth.is_admin() {
            return Err(CliError::NotAdmin);
        }
        Ok(())
    }

    /// Print and clear the toasts raised by the last command.
    pub fn print_toasts(&self) {
        for toast in self.toasts.drain() {
            match toast.level {
                ToastLevel::Success => println!("✓ {}", toast.message),
                ToastLevel::Info => println!("ℹ {}", toast.message),
                ToastLevel::Warning => eprintln!("! {}", toast.message),
                ToastLevel::Error => eprintln!("✗ {}", toast.message),
            }
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.session_watch.abort();
    }
}
