//! Dokan Storefront library.
//!
//! Client-side state layer of the shop front:
//!
//! - [`storage`] - persistent key-value store adapter
//! - [`api`] - REST client with bearer injection and global 401 handling
//! - [`services::auth`] - session state container
//! - [`services::cart`] - cart state container
//!
//! Containers are plain values built once by the application root and shared
//! through `Arc`; nothing here is a global.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
