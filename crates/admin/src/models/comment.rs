//! Moderation queue types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use dokan_core::{CommentId, CommentStatus, ProductId, SortOrder, UserId};
use serde::{Deserialize, Serialize};

/// A product comment as seen by moderators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(alias = "_id")]
    pub id: CommentId,
    pub content: String,
    /// Star rating, 1 to 5.
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub status: CommentStatus,
    #[serde(default)]
    pub user: Option<CommentAuthor>,
    #[serde(default)]
    pub product: Option<CommentProduct>,
    #[serde(default)]
    pub admin_reply: Option<AdminReply>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// Author name for display and sorting; empty when unknown.
    #[must_use]
    pub fn author_name(&self) -> String {
        self.user
            .as_ref()
            .map(CommentAuthor::full_name)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn product_name(&self) -> &str {
        self.product.as_ref().map_or("", |p| p.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAuthor {
    #[serde(alias = "_id")]
    pub id: UserId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

impl CommentAuthor {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentProduct {
    #[serde(alias = "_id")]
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
}

/// The shop's public answer to a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminReply {
    pub content: String,
    #[serde(default)]
    pub replied_at: Option<DateTime<Utc>>,
}

/// Status part of the comment query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(CommentStatus),
}

impl StatusFilter {
    #[must_use]
    pub fn matches(self, status: CommentStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }

    /// Query value sent to the server.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(status) => status.as_str(),
        }
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// Field the moderation queue is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentSortField {
    #[default]
    CreatedAt,
    Rating,
    Author,
    Product,
    Status,
    Content,
}

impl CommentSortField {
    /// Query value sent to the server.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::Rating => "rating",
            Self::Author => "user",
            Self::Product => "product",
            Self::Status => "status",
            Self::Content => "content",
        }
    }
}

impl std::str::FromStr for CommentSortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "createdat" | "created_at" | "date" => Ok(Self::CreatedAt),
            "rating" => Ok(Self::Rating),
            "user" | "author" => Ok(Self::Author),
            "product" => Ok(Self::Product),
            "status" => Ok(Self::Status),
            "content" => Ok(Self::Content),
            _ => Err(format!("invalid sort field: {s}")),
        }
    }
}

/// Query the moderation queue is fetched and viewed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentFilters {
    pub status: StatusFilter,
    /// Case-insensitive substring matched against content, author and product.
    pub search: String,
    pub sort_by: CommentSortField,
    pub sort_order: SortOrder,
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
}

impl CommentFilters {
    /// Defaults with the given page size.
    #[must_use]
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: limit.max(1),
            ..Self::default()
        }
    }

    /// Apply the fields set in `patch`.
    pub fn merge(&mut self, patch: CommentFiltersPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(search) = patch.search {
            self.search = search;
        }
        if let Some(sort_by) = patch.sort_by {
            self.sort_by = sort_by;
        }
        if let Some(sort_order) = patch.sort_order {
            self.sort_order = sort_order;
        }
        if let Some(page) = patch.page {
            self.page = page.max(1);
        }
        if let Some(limit) = patch.limit {
            self.limit = limit.max(1);
        }
    }

    /// Query pairs for `GET admin/comments`.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("status", self.status.as_str().to_string())];
        if !self.search.trim().is_empty() {
            query.push(("search", self.search.trim().to_string()));
        }
        query.extend([
            ("sortBy", self.sort_by.as_str().to_string()),
            ("sortOrder", self.sort_order.as_str().to_string()),
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ]);
        query
    }
}

impl Default for CommentFilters {
    fn default() -> Self {
        Self {
            status: StatusFilter::All,
            search: String::new(),
            sort_by: CommentSortField::CreatedAt,
            sort_order: SortOrder::Desc,
            page: 1,
            limit: 10,
        }
    }
}

/// Partial update of [`CommentFilters`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentFiltersPatch {
    pub status: Option<StatusFilter>,
    pub search: Option<String>,
    pub sort_by: Option<CommentSortField>,
    pub sort_order: Option<SortOrder>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Server pagination metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub limit: u32,
}

/// Body of `GET admin/comments`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentPage {
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Action applied to several comments at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkAction {
    Approve,
    Reject,
    Spam,
    Delete,
    /// Passed through to the server verbatim; the queue is reloaded afterwards.
    Other(String),
}

impl BulkAction {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Spam => "spam",
            Self::Delete => "delete",
            Self::Other(action) => action,
        }
    }

    /// Status a successful action leaves the comments in, when known locally.
    #[must_use]
    pub const fn resulting_status(&self) -> Option<CommentStatus> {
        match self {
            Self::Approve => Some(CommentStatus::Approved),
            Self::Reject => Some(CommentStatus::Rejected),
            Self::Spam => Some(CommentStatus::Spam),
            Self::Delete | Self::Other(_) => None,
        }
    }
}

impl From<&str> for BulkAction {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "approve" => Self::Approve,
            "reject" => Self::Reject,
            "spam" => Self::Spam,
            "delete" => Self::Delete,
            _ => Self::Other(s.to_string()),
        }
    }
}

/// Server-side moderation analytics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAnalytics {
    #[serde(default)]
    pub total_comments: u64,
    #[serde(default)]
    pub average_rating: Option<f64>,
    /// Count per star rating, keyed `"1"` to `"5"`.
    #[serde(default)]
    pub rating_distribution: BTreeMap<String, u64>,
    #[serde(default)]
    pub status_breakdown: BTreeMap<String, u64>,
    #[serde(default)]
    pub comments_by_day: Vec<DailyCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: String,
    pub count: u64,
}

/// Client-side counts over the cached collection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CommentStatistics {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub spam: usize,
    pub pending_percentage: f64,
    pub approved_percentage: f64,
    pub rejected_percentage: f64,
    pub spam_percentage: f64,
}

/// Result of a single-comment moderation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationOutcome {
    /// The server accepted the new status.
    Confirmed,
    /// The server refused; the cached status was restored.
    RolledBack,
}
