//! Todo model
//!
//! `Todo` is the persisted record; `NewTodo` is a validated record that has
//! not been stored yet and therefore has no identifier.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE todos (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     owner TEXT NOT NULL,
//!     body TEXT NOT NULL DEFAULT '',
//!     category TEXT,
//!     role TEXT NOT NULL,
//!     company TEXT NOT NULL,
//!     age INTEGER NOT NULL CHECK (age > 0 AND age < 150),
//!     email TEXT NOT NULL,
//!     avatar TEXT NOT NULL,
//!     completed BOOLEAN NOT NULL DEFAULT FALSE,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Role a todo is assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    Viewer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Editor, Role::Viewer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Viewer => "viewer",
        }
    }

    /// Exact, case-sensitive lookup
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == name)
    }
}

/// Todo category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "homework")]
    Homework,
    #[serde(rename = "software design")]
    SoftwareDesign,
    #[serde(rename = "video games")]
    VideoGames,
    #[serde(rename = "groceries")]
    Groceries,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Homework,
        Category::SoftwareDesign,
        Category::VideoGames,
        Category::Groceries,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Homework => "homework",
            Category::SoftwareDesign => "software design",
            Category::VideoGames => "video games",
            Category::Groceries => "groceries",
        }
    }

    /// Exact, case-sensitive lookup
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

/// A stored todo
///
/// Equality and hashing use the identifier only: two todos are the same
/// record iff they share an `_id`, whatever their other fields say.
///
/// `role` and `category` are kept as text on read. They are constrained when
/// written, and rows written before a rule changed must still load.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    /// Store-assigned identifier
    #[serde(rename = "_id")]
    pub id: Uuid,

    /// Display name of the owner
    pub owner: String,

    /// Task description
    pub body: String,

    /// Optional category
    pub category: Option<String>,

    /// Assigned role
    pub role: String,

    /// Owning company
    pub company: String,

    pub age: i32,

    pub email: String,

    /// Avatar URL derived from `email`
    pub avatar: String,

    /// Completion flag
    pub completed: bool,

    /// When the record was stored
    pub created_at: DateTime<Utc>,
}

impl PartialEq for Todo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Todo {}

impl Hash for Todo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A validated todo waiting to be inserted
///
/// No `PartialEq`: a todo has identity only once it is stored.
#[derive(Debug, Clone, Serialize)]
pub struct NewTodo {
    pub owner: String,
    pub body: String,
    pub category: Option<Category>,
    pub role: Role,
    pub company: String,
    pub age: i32,
    pub email: String,
    pub avatar: String,
    pub completed: bool,
}

/// Create request body, as sent by clients
///
/// Every field is optional here so that a missing field surfaces as a
/// validation error naming that field rather than a generic decode failure.
/// Any `avatar` sent by the client is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTodo {
    /// Owner name (`name` is accepted too)
    #[serde(alias = "name")]
    pub owner: Option<String>,

    pub body: Option<String>,

    pub category: Option<String>,

    pub role: Option<String>,

    pub company: Option<String>,

    pub age: Option<i64>,

    pub email: Option<String>,

    /// Completion flag (`status` is accepted too)
    #[serde(alias = "status")]
    pub completed: Option<bool>,
}

/// Abbreviated todo used in grouped listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub owner: String,
}

/// One group of the grouped aggregate view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoGroup {
    /// Value of the grouping field (empty when the field is unset)
    #[serde(rename = "_id")]
    pub key: String,

    /// Number of todos in the group
    pub count: i64,

    /// Members ordered by owner
    pub todos: Vec<TodoSummary>,
}

impl From<&Todo> for TodoSummary {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id,
            owner: todo.owner.clone(),
        }
    }
}
