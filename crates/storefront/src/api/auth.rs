//! Authentication endpoints.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use super::{ApiClient, ApiError};
use crate::models::{LoginRequest, RegisterRequest, User};

/// Successful login or registration.
#[derive(Deserialize)]
pub struct AuthResponse {
    /// Opaque bearer token.
    pub token: String,
    pub user: User,
}

impl std::fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthResponse")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// Profile endpoint body; older API versions return the bare user.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProfileBody {
    Wrapped { user: User },
    Bare(User),
}

/// Remote operations the auth container depends on.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a session.
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;

    /// Create an account and start a session.
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError>;

    /// Fetch the user a token belongs to. Fails when the token is rejected.
    async fn fetch_profile(&self, token: &SecretString) -> Result<User, ApiError>;
}

#[async_trait]
impl AuthApi for ApiClient {
    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let body = json!({
            "email": request.email,
            "password": request.password.expose_secret(),
        });
        self.post("auth/login", &body).await
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let body = json!({
            "firstName": request.first_name,
            "lastName": request.last_name,
            "email": request.email,
            "phone": request.phone,
            "password": request.password.expose_secret(),
        });
        self.post("auth/register", &body).await
    }

    #[instrument(skip_all)]
    async fn fetch_profile(&self, token: &SecretString) -> Result<User, ApiError> {
        let body: ProfileBody = self.get_with_token("auth/profile", token).await?;
        Ok(match body {
            ProfileBody::Wrapped { user } | ProfileBody::Bare(user) => user,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_body_accepts_both_shapes() {
        let user = json!({
            "id": "u1",
            "firstName": "Reza",
            "lastName": "Karimi",
            "email": "reza@example.ir"
        });

        let wrapped: ProfileBody = serde_json::from_value(json!({ "user": user })).unwrap();
        let bare: ProfileBody = serde_json::from_value(user).unwrap();

        for body in [wrapped, bare] {
            let (ProfileBody::Wrapped { user } | ProfileBody::Bare(user)) = body;
            assert_eq!(user.id.as_str(), "u1");
        }
    }

    #[test]
    fn test_auth_response_debug_hides_token() {
        let response: AuthResponse = serde_json::from_value(json!({
            "token": "eyJhbGciOiJIUzI1NiJ9.secret",
            "user": {
                "id": "u1",
                "firstName": "Reza",
                "lastName": "Karimi",
                "email": "reza@example.ir"
            }
        }))
        .unwrap();
        let debug = format!("{response:?}");
        assert!(!debug.contains("eyJhbGciOiJIUzI1NiJ9"));
    }
}
