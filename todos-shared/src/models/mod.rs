//! Data models
//!
//! - `todo`: the todo record, its create request, and the grouped view types

pub mod todo;
