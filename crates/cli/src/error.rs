//! CLI error type.

use dokan_admin::AdminError;
use dokan_storefront::api::ApiError;
use dokan_storefront::config::ConfigError;
use dokan_storefront::services::{AuthError, CartError};
use dokan_storefront::storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    #[error(transparent)]
    Admin(#[from] AdminError),

    /// Input rejected before any call was made.
    #[error("Invalid input: {0}")]
    Invalid(String),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Admin access required")]
    NotAdmin,
}

impl CliError {
    /// Line printed to the terminal when a command fails.
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(err) => err.user_message("خطا در احراز هویت"),
            Self::Api(err) => err.user_message("خطا در ارتباط با سرور"),
            Self::Admin(err) => err.user_message("خطا در انجام عملیات"),
            Self::Invalid(message) => message.clone(),
            Self::NotLoggedIn => "ابتدا وارد حساب کاربری شوید (dokan auth login)".to_string(),
            Self::NotAdmin => "این عملیات فقط برای مدیران مجاز است".to_string(),
            Self::Config(_) | Self::Storage(_) | Self::Cart(_) => self.to_string(),
        }
    }

    /// Whether the failure should reach Sentry as an event.
    ///
    /// Server-reported and validation errors are expected outcomes.
    pub const fn is_reportable(&self) -> bool {
        match self {
            Self::Config(_) | Self::Storage(_) => true,
            Self::Api(err)
            | Self::Auth(AuthError::Api(err))
            | Self::Admin(AdminError::Api(err)) => {
                matches!(err, ApiError::Transport(_) | ApiError::Decode(_))
            }
            Self::Auth(AuthError::Storage(_)) | Self::Admin(AdminError::Download(_)) => true,
            Self::Auth(_)
            | Self::Cart(_)
            | Self::Admin(_)
            | Self::Invalid(_)
            | Self::NotLoggedIn
            | Self::NotAdmin => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_uses_server_text() {
        let err = CliError::from(AuthError::Api(ApiError::Server {
            status: 401,
            message: Some("ایمیل یا رمز عبور اشتباه است".to_string()),
        }));
        assert_eq!(err.user_message(), "ایمیل یا رمز عبور اشتباه است");
        assert_eq!(
            CliError::Invalid("رمز عبور و تکرار آن یکسان نیست".to_string()).user_message(),
            "رمز عبور و تکرار آن یکسان نیست"
        );
    }

    #[test]
    fn test_server_errors_are_not_reportable() {
        let rejected = CliError::from(ApiError::Server {
            status: 422,
            message: None,
        });
        assert!(!rejected.is_reportable());
        assert!(CliError::from(ApiError::Decode("bad".into())).is_reportable());
        assert!(!CliError::from(AuthError::MissingCredentials).is_reportable());
        assert!(!CliError::NotAdmin.is_reportable());
    }
}
