//! User domain types.
//!
//! The server is authoritative for accounts; these are the cached copies the
//! auth container keeps for the current session.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use dokan_core::{Email, UserId};

/// A storefront user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    #[serde(alias = "_id")]
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    /// Login key, unique per account.
    pub email: Email,
    #[serde(default)]
    pub phone: String,
    /// Whether the account may use the admin dashboard.
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl User {
    /// First and last name joined for display.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Shallow-merge the fields present in `update` into this user.
    pub fn apply(&mut self, update: UserUpdate) {
        if let Some(first_name) = update.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        if let Some(address) = update.address {
            self.address = Some(address);
        }
    }
}

/// Postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
}

/// Partial user fields for [`AuthContainer::update_user`](crate::services::auth::AuthContainer::update_user).
///
/// Absent fields leave the current value untouched. The address is replaced
/// as a whole, not merged field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

/// Login credentials.
///
/// `Debug` is implemented manually to redact the password.
#[derive(Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: SecretString,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Registration form data.
///
/// Password confirmation is the caller's concern; only one password travels.
#[derive(Clone)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: SecretString,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        serde_json::from_value(serde_json::json!({
            "_id": "u1",
            "firstName": "Sara",
            "lastName": "Ahmadi",
            "email": "sara@example.ir",
            "phone": "09120000000",
            "isAdmin": false
        }))
        .unwrap()
    }

    #[test]
    fn test_user_accepts_mongo_style_id() {
        let user = sample_user();
        assert_eq!(user.id.as_str(), "u1");
        assert_eq!(user.full_name(), "Sara Ahmadi");
        assert!(user.address.is_none());
    }

    #[test]
    fn test_apply_merges_only_present_fields() {
        let mut user = sample_user();
        user.apply(UserUpdate {
            phone: Some("09121111111".to_string()),
            ..UserUpdate::default()
        });
        assert_eq!(user.phone, "09121111111");
        assert_eq!(user.first_name, "Sara");
        assert_eq!(user.email.as_str(), "sara@example.ir");
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let request = LoginRequest {
            email: "sara@example.ir".to_string(),
            password: SecretString::from("hunter2-very-secret"),
        };
        let debug = format!("{request:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2-very-secret"));
    }
}
