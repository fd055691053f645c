//! Field validators
//!
//! Every raw value that reaches the store passes through one of these
//! functions first. They are pure: a raw string (or number) goes in, a typed
//! constrained value or a [`ValidationError`] comes out.
//!
//! # Rules
//!
//! | field      | rule |
//! |------------|------|
//! | `age`      | integer, `0 < age < 150` |
//! | `role`     | `^(admin|editor|viewer)$` |
//! | `category` | one of `homework`, `software design`, `video games`, `groceries` |
//! | `email`    | [`EMAIL_REGEX`] |
//! | `owner`, `company` | non-blank after trimming |
//! | `_id`      | a UUID |
//!
//! # Example
//!
//! ```
//! use todos_shared::query::validate::{parse_age, ValidationError};
//!
//! assert_eq!(parse_age("35").unwrap(), 35);
//! assert!(matches!(parse_age("150"), Err(ValidationError::OutOfRange { .. })));
//! ```

use crate::models::todo::{Category, Role};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use uuid::Uuid;

/// Exclusive upper bound for ages
pub const REASONABLE_AGE_LIMIT: i64 = 150;

/// Accepted roles
pub const ROLE_REGEX: &str = "^(admin|editor|viewer)$";

/// Accepted email shape
pub const EMAIL_REGEX: &str = "^[a-zA-Z0-9_!#$%&'*+/=?`{|}~^.-]+@[a-zA-Z0-9.-]+$";

static ROLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(ROLE_REGEX).expect("role pattern is valid"));

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMAIL_REGEX).expect("email pattern is valid"));

/// A raw value failed a field rule
///
/// The `Display` output is the client-facing message: it always names the
/// field and the violated constraint, and echoes the raw input where there
/// is one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Value is not an integer
    #[error("{field} must be an integer, got {input:?}")]
    NotAnInteger { field: &'static str, input: String },

    /// Integer outside its allowed range
    #[error("{field} must be {constraint}, got {input}")]
    OutOfRange {
        field: &'static str,
        constraint: String,
        input: i64,
    },

    /// Value not in a fixed enumeration
    #[error("{field} must be one of [{allowed}], got {input:?}")]
    NotAllowed {
        field: &'static str,
        allowed: String,
        input: String,
    },

    /// Value does not look like an email address
    #[error("{field} must be a well-formed email address, got {input:?}")]
    MalformedEmail { field: &'static str, input: String },

    /// Text is empty after trimming
    #[error("{field} must not be blank")]
    Blank { field: &'static str },

    /// Required field absent from the request
    #[error("{field} is required")]
    Missing { field: &'static str },

    /// Identifier is not syntactically valid
    #[error("{field} must be a legal todo identifier, got {input:?}")]
    MalformedId { field: &'static str, input: String },
}

impl ValidationError {
    /// Name of the field that failed
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::NotAnInteger { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::NotAllowed { field, .. }
            | ValidationError::MalformedEmail { field, .. }
            | ValidationError::Blank { field }
            | ValidationError::Missing { field }
            | ValidationError::MalformedId { field, .. } => field,
        }
    }
}

/// Parses a raw `age` value
pub fn parse_age(raw: &str) -> Result<i32, ValidationError> {
    let age = raw
        .parse::<i64>()
        .map_err(|_| ValidationError::NotAnInteger {
            field: "age",
            input: raw.to_string(),
        })?;
    check_age(age)
}

/// Checks an already-numeric age against the bounds
pub fn check_age(age: i64) -> Result<i32, ValidationError> {
    if age <= 0 {
        return Err(ValidationError::OutOfRange {
            field: "age",
            constraint: "> 0".to_string(),
            input: age,
        });
    }
    if age >= REASONABLE_AGE_LIMIT {
        return Err(ValidationError::OutOfRange {
            field: "age",
            constraint: format!("< {}", REASONABLE_AGE_LIMIT),
            input: age,
        });
    }

    // Bounded above, so this always fits.
    Ok(age as i32)
}

/// Parses a raw `role` value (case-sensitive)
pub fn parse_role(raw: &str) -> Result<Role, ValidationError> {
    if !ROLE_PATTERN.is_match(raw) {
        return Err(not_allowed("role", Role::ALL.iter().map(|r| r.as_str()), raw));
    }
    Role::from_name(raw).ok_or_else(|| not_allowed("role", Role::ALL.iter().map(|r| r.as_str()), raw))
}

/// Parses a raw `category` value (case-sensitive)
pub fn parse_category(raw: &str) -> Result<Category, ValidationError> {
    Category::from_name(raw)
        .ok_or_else(|| not_allowed("category", Category::ALL.iter().map(|c| c.as_str()), raw))
}

/// Checks an email address against [`EMAIL_REGEX`]
pub fn parse_email(raw: &str) -> Result<String, ValidationError> {
    if EMAIL_PATTERN.is_match(raw) {
        Ok(raw.to_string())
    } else {
        Err(ValidationError::MalformedEmail {
            field: "email",
            input: raw.to_string(),
        })
    }
}

/// Requires non-blank text and returns it trimmed
pub fn require_text(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Blank { field });
    }
    Ok(trimmed.to_string())
}

/// Parses a todo identifier
///
/// A malformed identifier is reported here, before any lookup, so callers
/// can tell it apart from a well-formed identifier that matches nothing.
pub fn parse_id(raw: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(raw).map_err(|_| ValidationError::MalformedId {
        field: "_id",
        input: raw.to_string(),
    })
}

/// Unwraps a required request field
pub fn required<T>(field: &'static str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::Missing { field })
}

fn not_allowed<'a>(
    field: &'static str,
    allowed: impl Iterator<Item = &'a str>,
    raw: &str,
) -> ValidationError {
    ValidationError::NotAllowed {
        field,
        allowed: allowed.collect::<Vec<_>>().join(", "),
        input: raw.to_string(),
    }
}
