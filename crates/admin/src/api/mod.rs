//! Admin REST endpoints.
//!
//! The endpoints are exposed as traits implemented for the shared
//! [`ApiClient`](dokan_storefront::api::ApiClient), so the services can be
//! driven by in-memory fakes in tests. Authentication, 401 handling and
//! error decoding all happen in the client.

pub mod comments;
pub mod reports;

pub use comments::CommentsApi;
pub use reports::ReportsApi;
