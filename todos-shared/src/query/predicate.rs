//! Store-agnostic predicate over todos
//!
//! A [`Predicate`] is what the filter compiler produces and what every
//! [`TodoStore`](crate::store::TodoStore) consumes. Stores either evaluate it
//! directly with [`Predicate::matches`] or translate it into their native
//! query form.

use crate::models::todo::Todo;
use std::cmp::Ordering;

/// Todo fields that can be filtered or sorted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Owner,
    Body,
    Category,
    Role,
    Company,
    Age,
    Email,
    Completed,
}

impl Field {
    /// Column name in the `todos` table
    pub fn column(&self) -> &'static str {
        match self {
            Field::Owner => "owner",
            Field::Body => "body",
            Field::Category => "category",
            Field::Role => "role",
            Field::Company => "company",
            Field::Age => "age",
            Field::Email => "email",
            Field::Completed => "completed",
        }
    }

    /// Whether the field holds text (as opposed to a number or flag)
    pub fn is_text(&self) -> bool {
        !matches!(self, Field::Age | Field::Completed)
    }

    fn text<'a>(&self, todo: &'a Todo) -> Option<&'a str> {
        match self {
            Field::Owner => Some(&todo.owner),
            Field::Body => Some(&todo.body),
            Field::Category => todo.category.as_deref(),
            Field::Role => Some(&todo.role),
            Field::Company => Some(&todo.company),
            Field::Email => Some(&todo.email),
            Field::Age | Field::Completed => None,
        }
    }

    fn value(&self, todo: &Todo) -> Option<Value> {
        match self {
            Field::Age => Some(Value::Int(todo.age)),
            Field::Completed => Some(Value::Bool(todo.completed)),
            _ => self.text(todo).map(|s| Value::Text(s.to_string())),
        }
    }

    /// Orders two todos by this field; unset values sort first
    ///
    /// Text compares by code point (byte order of the UTF-8 encoding).
    pub fn compare(&self, a: &Todo, b: &Todo) -> Ordering {
        match self {
            Field::Age => a.age.cmp(&b.age),
            Field::Completed => a.completed.cmp(&b.completed),
            _ => self.text(a).cmp(&self.text(b)),
        }
    }
}

/// A typed comparison operand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i32),
    Text(String),
    Bool(bool),
}

/// Boolean condition over stored todos
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Field equals value exactly
    Equals { field: Field, value: Value },

    /// Field contains `needle`, ignoring case; the needle is literal text
    ///
    /// In memory both sides go through `str::to_lowercase`, a per-character
    /// Unicode mapping with no full case folding (`STRASSE` does not match
    /// `straße`). Postgres `ILIKE` folds by the database locale and can
    /// disagree on such characters.
    ContainsIgnoreCase { field: Field, needle: String },

    /// All children hold; no children matches everything
    And(Vec<Predicate>),
}

impl Predicate {
    /// Predicate that matches every todo
    pub fn match_all() -> Self {
        Predicate::And(Vec::new())
    }

    pub fn equals(field: Field, value: Value) -> Self {
        Predicate::Equals { field, value }
    }

    pub fn contains_ignore_case(field: Field, needle: impl Into<String>) -> Self {
        Predicate::ContainsIgnoreCase {
            field,
            needle: needle.into(),
        }
    }

    /// Conjunction of `predicates`, flattened when there is only one
    pub fn and(mut predicates: Vec<Predicate>) -> Self {
        if predicates.len() == 1 {
            predicates.remove(0)
        } else {
            Predicate::And(predicates)
        }
    }

    pub fn is_match_all(&self) -> bool {
        matches!(self, Predicate::And(children) if children.iter().all(Predicate::is_match_all))
    }

    /// Evaluates the predicate against one todo
    pub fn matches(&self, todo: &Todo) -> bool {
        match self {
            Predicate::Equals { field, value } => field.value(todo).as_ref() == Some(value),
            Predicate::ContainsIgnoreCase { field, needle } => field
                .text(todo)
                .map(|text| text.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false),
            Predicate::And(children) => children.iter().all(|p| p.matches(todo)),
        }
    }
}
