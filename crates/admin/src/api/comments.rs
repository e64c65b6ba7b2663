//! Comment moderation endpoints.

use async_trait::async_trait;
use dokan_core::{CommentId, CommentStatus};
use dokan_storefront::api::{ApiClient, ApiError};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::models::{BulkAction, Comment, CommentAnalytics, CommentFilters, CommentPage, ExportFormat};

/// Single-comment responses; some endpoints wrap the comment.
#[derive(Deserialize)]
#[serde(untagged)]
enum CommentBody {
    Wrapped { comment: Comment },
    Bare(Comment),
}

impl CommentBody {
    fn into_comment(self) -> Comment {
        match self {
            Self::Wrapped { comment } | Self::Bare(comment) => comment,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnalyticsBody {
    Wrapped { analytics: CommentAnalytics },
    Bare(CommentAnalytics),
}

/// Remote operations behind the moderation queue.
#[async_trait]
pub trait CommentsApi: Send + Sync {
    async fn list_comments(&self, filters: &CommentFilters) -> Result<CommentPage, ApiError>;

    async fn get_comment(&self, id: &CommentId) -> Result<Comment, ApiError>;

    async fn update_comment(&self, id: &CommentId, content: &str) -> Result<Comment, ApiError>;

    async fn reply_to_comment(&self, id: &CommentId, reply: &str) -> Result<Comment, ApiError>;

    async fn delete_comment(&self, id: &CommentId) -> Result<(), ApiError>;

    /// Move a comment to `status`. Only the three moderation decisions are
    /// accepted by the server.
    async fn set_status(&self, id: &CommentId, status: CommentStatus) -> Result<(), ApiError>;

    async fn bulk_action(&self, ids: &[CommentId], action: &BulkAction) -> Result<(), ApiError>;

    async fn analytics(&self) -> Result<CommentAnalytics, ApiError>;

    async fn export(&self, format: ExportFormat) -> Result<Vec<u8>, ApiError>;
}

/// Path segment of the moderation endpoint for `status`.
const fn moderation_action(status: CommentStatus) -> &'static str {
    match status {
        CommentStatus::Approved => "approve",
        CommentStatus::Rejected => "reject",
        CommentStatus::Spam => "spam",
        CommentStatus::Pending | CommentStatus::Unknown => "pending",
    }
}

#[async_trait]
impl CommentsApi for ApiClient {
    #[instrument(skip(self))]
    async fn list_comments(&self, filters: &CommentFilters) -> Result<CommentPage, ApiError> {
        self.get("admin/comments", &filters.to_query()).await
    }

    #[instrument(skip(self), fields(comment_id = %id))]
    async fn get_comment(&self, id: &CommentId) -> Result<Comment, ApiError> {
        let body: CommentBody = self.get(&format!("admin/comments/{id}"), &[]).await?;
        Ok(body.into_comment())
    }

    #[instrument(skip(self, content), fields(comment_id = %id))]
    async fn update_comment(&self, id: &CommentId, content: &str) -> Result<Comment, ApiError> {
        let body: CommentBody = self
            .put(&format!("admin/comments/{id}"), &json!({ "content": content }))
            .await?;
        Ok(body.into_comment())
    }

    #[instrument(skip(self, reply), fields(comment_id = %id))]
    async fn reply_to_comment(&self, id: &CommentId, reply: &str) -> Result<Comment, ApiError> {
        let body: CommentBody = self
            .post(&format!("admin/comments/{id}/reply"), &json!({ "reply": reply }))
            .await?;
        Ok(body.into_comment())
    }

    #[instrument(skip(self), fields(comment_id = %id))]
    async fn delete_comment(&self, id: &CommentId) -> Result<(), ApiError> {
        self.delete(&format!("admin/comments/{id}")).await
    }

    #[instrument(skip(self), fields(comment_id = %id, status = %status))]
    async fn set_status(&self, id: &CommentId, status: CommentStatus) -> Result<(), ApiError> {
        let action = moderation_action(status);
        self.patch(&format!("admin/comments/{id}/{action}")).await
    }

    #[instrument(skip(self, ids), fields(count = ids.len(), action = action.as_str()))]
    async fn bulk_action(&self, ids: &[CommentId], action: &BulkAction) -> Result<(), ApiError> {
        let body = json!({
            "commentIds": ids.iter().map(CommentId::as_str).collect::<Vec<_>>(),
            "action": action.as_str(),
        });
        self.post_discard("admin/comments/bulk", &body).await
    }

    #[instrument(skip(self))]
    async fn analytics(&self) -> Result<CommentAnalytics, ApiError> {
        let body: AnalyticsBody = self.get("admin/comments/analytics", &[]).await?;
        Ok(match body {
            AnalyticsBody::Wrapped { analytics } | AnalyticsBody::Bare(analytics) => analytics,
        })
    }

    #[instrument(skip(self))]
    async fn export(&self, format: ExportFormat) -> Result<Vec<u8>, ApiError> {
        self.get_bytes(
            "admin/comments/export",
            &[("format", format.as_str().to_string())],
        )
        .await
    }
}
