//! Session-related types.
//!
//! Keys under which session and cart state live in the persistent store.

/// Persistent store keys.
///
/// Auth and cart state own disjoint keys, so the two containers never need
/// to coordinate writes.
pub mod keys {
    /// Bearer token of the storefront session.
    pub const TOKEN: &str = "token";

    /// Serialized [`User`](crate::models::User) of the storefront session.
    pub const USER: &str = "user";

    /// Serialized cart line items.
    pub const CART: &str = "cart";

    /// Bearer token of the admin dashboard session.
    pub const ADMIN_TOKEN: &str = "adminToken";

    /// Serialized admin user record.
    pub const ADMIN_USER: &str = "adminUser";

    /// Every key that carries credentials or identity.
    ///
    /// Cleared as a whole when the server rejects a token.
    pub const SESSION_KEYS: [&str; 4] = [TOKEN, USER, ADMIN_TOKEN, ADMIN_USER];
}
