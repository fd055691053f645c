//! Todo storage
//!
//! [`TodoStore`] is the seam between the query pipeline and persistence.
//! Implementations receive already-validated input: a compiled
//! [`Predicate`], a resolved [`Sort`] and an optional row cap.
//!
//! - `postgres`: sqlx-backed store used in production
//! - `memory`: in-process store for tests and local runs

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgTodoStore;

use crate::error::StoreError;
use crate::models::todo::{NewTodo, Todo, TodoGroup};
use crate::query::predicate::Predicate;
use crate::query::sort::{GroupField, GroupSort, Sort};
use async_trait::async_trait;
use uuid::Uuid;

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistent collection of todos
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Short backend name for logs and health output
    fn name(&self) -> &str;

    /// Checks that the backend is reachable
    async fn ping(&self) -> StoreResult<()>;

    /// Todos matching `predicate`, ordered by `sort`, at most `limit` of them
    async fn find(
        &self,
        predicate: &Predicate,
        sort: &Sort,
        limit: Option<u32>,
    ) -> StoreResult<Vec<Todo>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Todo>>;

    /// Stores a todo and returns its new identifier
    async fn insert(&self, todo: NewTodo) -> StoreResult<Uuid>;

    /// Deletes by identifier, returning how many records went away (0 or 1)
    async fn delete_by_id(&self, id: Uuid) -> StoreResult<u64>;

    /// Groups all todos by `field`, counting members and listing them by owner
    async fn aggregate_grouped_by(
        &self,
        field: GroupField,
        sort: &GroupSort,
    ) -> StoreResult<Vec<TodoGroup>>;
}
