//! Storefront state containers.

pub mod auth;
pub mod cart;

pub use auth::{AuthContainer, AuthError, AuthPhase};
pub use cart::{CartContainer, CartError};
