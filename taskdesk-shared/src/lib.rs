//! # TaskDesk Shared Library
//!
//! Domain types and persistence used by the TaskDesk API server.
//!
//! ## Module Organization
//!
//! - `db`: connection pool and schema migrations
//! - `models`: `User` and `Task` records with their repository operations
//! - `validation`: task field and status rules
//! - `auth`: credential hashing

pub mod auth;
pub mod db;
pub mod models;
pub mod validation;

/// Current version of the TaskDesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
