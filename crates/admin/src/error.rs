//! Error type shared by the admin services.

use dokan_core::CommentId;
use dokan_storefront::api::ApiError;
use thiserror::Error;

use crate::download::DownloadError;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    /// The comment is not in the cached collection.
    #[error("Comment not found: {0}")]
    CommentNotFound(CommentId),
}

impl AdminError {
    /// Text for an error toast: the server's message, else `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api(err) => err.user_message(fallback),
            Self::CommentNotFound(_) => "نظر مورد نظر یافت نشد".to_string(),
            Self::Download(_) => fallback.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = AdminError::from(ApiError::Server {
            status: 422,
            message: Some("متن نظر خالی است".to_string()),
        });
        assert_eq!(err.user_message("خطا"), "متن نظر خالی است");

        let err = AdminError::from(ApiError::Server {
            status: 500,
            message: None,
        });
        assert_eq!(err.user_message("خطا در بارگذاری نظرات"), "خطا در بارگذاری نظرات");
    }
}
