//! Dokan admin library.
//!
//! Back-office services for the shop: comment moderation and sales
//! reporting. Both services talk to the REST API through the shared
//! [`ApiClient`](dokan_storefront::api::ApiClient), keep their datasets in an
//! [`AdminStore`](store::AdminStore) and report outcomes as toasts.
//!
//! # Example
//!
//! ```rust,ignore
//! let store = Arc::new(AdminStore::new(
//!     CommentFilters::with_limit(config.comments_page_size),
//!     ReportFilters::ending(download::today()),
//! ));
//! let comments = CommentsService::new(
//!     Arc::new(api.clone()),
//!     store.clone(),
//!     toasts.clone(),
//!     Arc::new(DirectorySink::new(&config.download_dir)),
//!     config.filter_mode,
//! );
//! comments.fetch_comments(None).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod download;
pub mod error;
pub mod models;
pub mod notify;
pub mod sequence;
pub mod services;
pub mod store;

pub use config::{AdminConfig, FilterMode};
pub use error::AdminError;
pub use services::{CommentsService, ReportsService};
