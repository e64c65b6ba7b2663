//! Admin services.
//!
//! - `comments` - moderation queue: CRUD, moderation, bulk actions, export
//! - `reports` - sales analytics, statistics and chart series, export

pub mod comments;
pub mod reports;

pub use comments::CommentsService;
pub use reports::ReportsService;
