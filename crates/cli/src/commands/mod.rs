//! Subcommands, one module per area.

pub mod auth;
pub mod cart;
pub mod comments;
pub mod reports;

pub use auth::AuthCommand;
pub use cart::CartCommand;
pub use comments::CommentsCommand;
pub use reports::ReportsCommand;
