//! API route handlers
//!
//! - `health`: Health check endpoint
//! - `todos`: Todo CRUD, filtered listing and grouped view

pub mod health;
pub mod todos;
