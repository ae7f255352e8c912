//! # Employee API
//!
//! A small REST service for managing employee records.
//!
//! ## Architecture
//!
//! - [`api`]: the `Employee` entity shared by every layer
//! - [`db`]: repository trait, storage backends and the service layer
//! - [`http`]: axum router and handlers (feature `http-server`)
//!
//! Storage backends are chosen at build time with Cargo features
//! (`local-repo`, `postgres-repo`) and at run time through environment
//! variables or a `repository.toml` file.

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;

#[cfg(feature = "http-server")]
pub mod http;
