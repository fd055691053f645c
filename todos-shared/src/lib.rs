//! # Todos Shared Library
//!
//! Query compilation, validation, avatar derivation and storage for the
//! todos service. Nothing in here knows about HTTP.
//!
//! ## Module Organization
//!
//! - `query`: request parameters → validated predicate, sort and limit
//! - `avatar`: avatar URLs derived from email addresses
//! - `models`: the todo record and request/response types
//! - `store`: the `TodoStore` trait with Postgres and in-memory backends
//! - `service`: create / get / list / delete / group flows
//! - `db`: connection pool and migrations
//! - `error`: domain error types

pub mod avatar;
pub mod db;
pub mod error;
pub mod models;
pub mod query;
pub mod service;
pub mod store;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
