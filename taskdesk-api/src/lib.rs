//! # TaskDesk API Server Library
//!
//! HTTP surface of the TaskDesk task tracker.
//!
//! ## Modules
//!
//! - `app`: application state and router builder
//! - `config`: configuration from the environment
//! - `error`: error type and HTTP response mapping
//! - `extract`: request extractors and query parameter types
//! - `middleware`: security headers
//! - `routes`: route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
