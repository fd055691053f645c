//! Sort and limit resolution
//!
//! - Sort field comes from `sortBy`, defaulting to `owner`.
//! - Direction is descending only for the exact string `desc`; anything
//!   else (including `DESC` or nothing) sorts ascending.
//! - `limit` caps the result count when it parses as a positive integer.
//!   Zero, negatives, garbage and absence all mean "no cap". A bad limit is
//!   never an error.
//!
//! The grouped view resolves its own sort from the same parameters: by
//! group key by default, or by member count with `sortBy=count`.

use super::predicate::Field;
use super::validate::ValidationError;
use super::{GroupQuery, TodoQuery};
use std::cmp::Ordering;

/// Field used when `sortBy` is absent
pub const DEFAULT_SORT_FIELD: Field = Field::Owner;

/// `sortBy` value that orders groups by size
pub const COUNT_SORT_KEY: &str = "count";

const SORTABLE: &[(&str, Field)] = &[
    ("owner", Field::Owner),
    ("name", Field::Owner),
    ("age", Field::Age),
    ("company", Field::Company),
    ("role", Field::Role),
    ("category", Field::Category),
    ("email", Field::Email),
    ("body", Field::Body),
    ("completed", Field::Completed),
    ("status", Field::Completed),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Resolves `sortOrder`; only the literal `desc` reverses
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some("desc") => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }

    /// Applies the direction to an ascending ordering
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// Result ordering for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: Field,
    pub direction: SortDirection,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            field: DEFAULT_SORT_FIELD,
            direction: SortDirection::Ascending,
        }
    }
}

/// Field a grouped view is keyed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupField {
    #[default]
    Company,
    Category,
}

impl GroupField {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupField::Company => "company",
            GroupField::Category => "category",
        }
    }

    pub fn field(&self) -> Field {
        match self {
            GroupField::Company => Field::Company,
            GroupField::Category => Field::Category,
        }
    }
}

/// What groups are ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupOrder {
    #[default]
    Key,
    Count,
}

/// Ordering of the grouped view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupSort {
    pub order: GroupOrder,
    pub direction: SortDirection,
}

/// Resolves `sortBy` / `sortOrder` for a list query
pub fn resolve_sort(params: &TodoQuery) -> Result<Sort, ValidationError> {
    let field = match params.sort_by.as_deref() {
        None => DEFAULT_SORT_FIELD,
        Some(name) => SORTABLE
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, field)| *field)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "sortBy",
                allowed: SORTABLE
                    .iter()
                    .map(|(key, _)| *key)
                    .collect::<Vec<_>>()
                    .join(", "),
                input: name.to_string(),
            })?,
    };

    Ok(Sort {
        field,
        direction: SortDirection::from_param(params.sort_order.as_deref()),
    })
}

/// Resolves `limit`; `None` means no cap
pub fn resolve_limit(raw: Option<&str>) -> Option<u32> {
    let limit = raw?.parse::<i64>().ok()?;
    if limit > 0 {
        Some(u32::try_from(limit).unwrap_or(u32::MAX))
    } else {
        None
    }
}

/// Resolves `groupBy`, `sortBy` and `sortOrder` for the grouped view
pub fn resolve_group(params: &GroupQuery) -> Result<(GroupField, GroupSort), ValidationError> {
    let group_field = match params.group_by.as_deref() {
        None => GroupField::default(),
        Some("company") => GroupField::Company,
        Some("category") => GroupField::Category,
        Some(other) => {
            return Err(ValidationError::NotAllowed {
                field: "groupBy",
                allowed: "company, category".to_string(),
                input: other.to_string(),
            })
        }
    };

    let order = match params.sort_by.as_deref() {
        None => GroupOrder::Key,
        Some(COUNT_SORT_KEY) => GroupOrder::Count,
        Some(name) if name == group_field.as_str() => GroupOrder::Key,
        Some(other) => {
            return Err(ValidationError::NotAllowed {
                field: "sortBy",
                allowed: format!("{}, {}", group_field.as_str(), COUNT_SORT_KEY),
                input: other.to_string(),
            })
        }
    };

    Ok((
        group_field,
        GroupSort {
            order,
            direction: SortDirection::from_param(params.sort_order.as_deref()),
        },
    ))
}
