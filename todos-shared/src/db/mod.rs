//! Database bootstrap
//!
//! - `pool`: PostgreSQL connection pool with a health check
//! - `migrations`: embedded schema migrations

pub mod migrations;
pub mod pool;
