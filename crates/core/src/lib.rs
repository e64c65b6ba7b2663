//! Dokan Core - Shared types library.
//!
//! This crate provides common types used across all Dokan components:
//! - `storefront` - Session, cart and REST client for the shop front
//! - `admin` - Moderation and reporting services for the back-office
//! - `cli` - Command-line composition root
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
