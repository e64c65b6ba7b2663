//! Domain models for the storefront state layer.
//!
//! All models use the REST API's camelCase JSON shape so they can be stored
//! verbatim in the persistent key-value store.

pub mod cart;
pub mod session;
pub mod user;

pub use cart::CartItem;
pub use session::keys as storage_keys;
pub use user::{Address, LoginRequest, RegisterRequest, User, UserUpdate};
