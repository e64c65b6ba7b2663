//! Authentication error types.

use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;

/// Errors that can occur during authentication operations.
///
/// Remote failures are passed through untouched so callers can show the
/// server's own message.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password missing.
    #[error("email and password are required")]
    MissingCredentials,

    /// A registration field is missing.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The REST API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The session could not be written to or read from the store.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Text to show a user: the server message, else `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api(err) => err.user_message(fallback),
            Self::MissingCredentials => "ایمیل و رمز عبور الزامی است".to_string(),
            Self::MissingField(_) => "لطفا تمام فیلدهای الزامی را پر کنید".to_string(),
            Self::Storage(_) => fallback.to_string(),
        }
    }
}
