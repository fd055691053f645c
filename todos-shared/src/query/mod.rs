//! Query compilation
//!
//! Request parameters are collected once, at the HTTP boundary, into a
//! [`TodoQuery`] of raw strings. Everything after that is pure:
//!
//! ```text
//! TodoQuery ──▶ validate ──▶ filter::compile_filter ──▶ Predicate ─┐
//!           └──────────────▶ sort::resolve_sort/limit ─▶ Sort, cap ─┴▶ CompiledQuery
//! ```
//!
//! # Example
//!
//! ```
//! use todos_shared::query::TodoQuery;
//!
//! let params = TodoQuery {
//!     company: Some("acme".to_string()),
//!     limit: Some("10".to_string()),
//!     ..Default::default()
//! };
//!
//! let compiled = params.compile().unwrap();
//! assert_eq!(compiled.limit, Some(10));
//! ```

pub mod filter;
pub mod predicate;
pub mod sort;
pub mod validate;

use predicate::Predicate;
use serde::Deserialize;
use sort::Sort;
use validate::ValidationError;

/// Recognized query parameters of the list endpoint, as raw strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TodoQuery {
    pub age: Option<String>,
    pub company: Option<String>,
    pub owner: Option<String>,
    pub role: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub contains: Option<String>,
    pub body: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
}

/// Recognized query parameters of the grouped view
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GroupQuery {
    #[serde(rename = "groupBy")]
    pub group_by: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
}

/// Everything a store needs to run a list query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    pub predicate: Predicate,
    pub sort: Sort,
    pub limit: Option<u32>,
}

impl TodoQuery {
    /// Validates and compiles the parameters
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] met, filter dimensions first,
    /// then `sortBy`.
    pub fn compile(&self) -> Result<CompiledQuery, ValidationError> {
        let predicate = filter::compile_filter(self)?;
        let sort = sort::resolve_sort(self)?;
        let limit = sort::resolve_limit(self.limit.as_deref());

        Ok(CompiledQuery {
            predicate,
            sort,
            limit,
        })
    }
}
