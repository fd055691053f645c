//! In-memory todo store
//!
//! Evaluates predicates with [`Predicate::matches`] over a map guarded by a
//! tokio `RwLock`. Ordering mirrors the Postgres store: sort field first,
//! then identifier ascending.

use super::{StoreResult, TodoStore};
use crate::models::todo::{NewTodo, Todo, TodoGroup, TodoSummary};
use crate::query::predicate::{Field, Predicate};
use crate::query::sort::{GroupField, GroupOrder, GroupSort, Sort};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Todo store backed by a `HashMap`
#[derive(Debug, Default)]
pub struct MemoryStore {
    todos: RwLock<HashMap<Uuid, Todo>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `todos`, keeping their identifiers
    pub fn with_todos(todos: impl IntoIterator<Item = Todo>) -> Self {
        Self {
            todos: RwLock::new(todos.into_iter().map(|t| (t.id, t)).collect()),
        }
    }

    /// Number of stored todos
    pub async fn len(&self) -> usize {
        self.todos.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.todos.read().await.is_empty()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn find(
        &self,
        predicate: &Predicate,
        sort: &Sort,
        limit: Option<u32>,
    ) -> StoreResult<Vec<Todo>> {
        let todos = self.todos.read().await;

        let mut found: Vec<Todo> = todos
            .values()
            .filter(|todo| predicate.matches(todo))
            .cloned()
            .collect();

        found.sort_by(|a, b| {
            sort.direction
                .apply(sort.field.compare(a, b))
                .then_with(|| a.id.cmp(&b.id))
        });

        if let Some(limit) = limit {
            found.truncate(limit as usize);
        }

        Ok(found)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Todo>> {
        Ok(self.todos.read().await.get(&id).cloned())
    }

    async fn insert(&self, todo: NewTodo) -> StoreResult<Uuid> {
        let id = Uuid::new_v4();
        let stored = Todo {
            id,
            owner: todo.owner,
            body: todo.body,
            category: todo.category.map(|c| c.as_str().to_string()),
            role: todo.role.as_str().to_string(),
            company: todo.company,
            age: todo.age,
            email: todo.email,
            avatar: todo.avatar,
            completed: todo.completed,
            created_at: Utc::now(),
        };

        self.todos.write().await.insert(id, stored);
        Ok(id)
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<u64> {
        Ok(self.todos.write().await.remove(&id).map_or(0, |_| 1))
    }

    async fn aggregate_grouped_by(
        &self,
        field: GroupField,
        sort: &GroupSort,
    ) -> StoreResult<Vec<TodoGroup>> {
        let todos = self.todos.read().await;

        let mut buckets: BTreeMap<String, Vec<&Todo>> = BTreeMap::new();
        for todo in todos.values() {
            let key = match field {
                GroupField::Company => todo.company.clone(),
                GroupField::Category => todo.category.clone().unwrap_or_default(),
            };
            buckets.entry(key).or_default().push(todo);
        }

        let mut groups: Vec<TodoGroup> = buckets
            .into_iter()
            .map(|(key, mut members)| {
                members.sort_by(|a, b| {
                    Field::Owner.compare(a, b).then_with(|| a.id.cmp(&b.id))
                });
                TodoGroup {
                    key,
                    count: members.len() as i64,
                    todos: members.into_iter().map(TodoSummary::from).collect(),
                }
            })
            .collect();

        groups.sort_by(|a, b| match sort.order {
            GroupOrder::Key => sort.direction.apply(a.key.cmp(&b.key)),
            GroupOrder::Count => sort
                .direction
                .apply(a.count.cmp(&b.count))
                .then_with(|| a.key.cmp(&b.key)),
        });

        Ok(groups)
    }
}
