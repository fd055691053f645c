//! PostgreSQL todo store
//!
//! Predicates are translated into a parameterized `WHERE` clause with
//! [`sqlx::QueryBuilder`]. Column names only ever come from
//! [`Field::column`]; every user-supplied value is a bind parameter.
//!
//! | predicate                  | SQL |
//! |----------------------------|-----|
//! | `Equals(field, v)`         | `field = $n` |
//! | `ContainsIgnoreCase(f, s)` | `f ILIKE $n ESCAPE '\'` with `$n = '%' + escape(s) + '%'` |
//! | `And([])`                  | no `WHERE` clause |
//! | `And([a, b, ..])`          | `(a AND b AND ..)` |
//!
//! # Example
//!
//! ```no_run
//! use todos_shared::db::pool::{create_pool, DatabaseConfig};
//! use todos_shared::query::TodoQuery;
//! use todos_shared::store::{PgTodoStore, TodoStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool(DatabaseConfig {
//!     url: std::env::var("DATABASE_URL")?,
//!     ..Default::default()
//! })
//! .await?;
//! let store = PgTodoStore::new(pool);
//!
//! let compiled = TodoQuery {
//!     company: Some("acme".to_string()),
//!     ..Default::default()
//! }
//! .compile()?;
//!
//! let todos = store.find(&compiled.predicate, &compiled.sort, compiled.limit).await?;
//! # Ok(())
//! # }
//! ```

use super::{StoreResult, TodoStore};
use crate::db::pool::health_check;
use crate::models::todo::{NewTodo, Todo, TodoGroup, TodoSummary};
use crate::query::predicate::{Field, Predicate, Value};
use crate::query::sort::{GroupField, GroupOrder, GroupSort, Sort, SortDirection};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

const TODO_COLUMNS: &str =
    "id, owner, body, category, role, company, age, email, avatar, completed, created_at";

/// Todo store backed by the `todos` table
#[derive(Debug, Clone)]
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Escapes `\`, `%` and `_` so the text matches literally inside `LIKE`
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn push_predicate(builder: &mut QueryBuilder<'static, Postgres>, predicate: &Predicate) {
    match predicate {
        Predicate::Equals { field, value } => {
            builder.push(field.column()).push(" = ");
            match value {
                Value::Int(v) => builder.push_bind(*v),
                Value::Text(v) => builder.push_bind(v.clone()),
                Value::Bool(v) => builder.push_bind(*v),
            };
        }
        Predicate::ContainsIgnoreCase { field, needle } => {
            builder
                .push(field.column())
                .push(" ILIKE ")
                .push_bind(format!("%{}%", escape_like(needle)))
                .push(" ESCAPE '\\'");
        }
        Predicate::And(children) if children.is_empty() => {
            builder.push("TRUE");
        }
        Predicate::And(children) => {
            builder.push("(");
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    builder.push(" AND ");
                }
                push_predicate(builder, child);
            }
            builder.push(")");
        }
    }
}

/// `ORDER BY` expression for `field`
///
/// Text is compared under the `"C"` collation, i.e. bytewise, matching
/// [`Field::compare`] whatever the database locale is.
fn sort_column(field: Field) -> String {
    if field.is_text() {
        format!("{} COLLATE \"C\"", field.column())
    } else {
        field.column().to_string()
    }
}

/// Builds the `SELECT` for [`TodoStore::find`]
///
/// Ties on the sort field are broken by `id` so paging is stable.
pub fn build_find_query(
    predicate: &Predicate,
    sort: &Sort,
    limit: Option<u32>,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {} FROM todos", TODO_COLUMNS));

    if !predicate.is_match_all() {
        builder.push(" WHERE ");
        push_predicate(&mut builder, predicate);
    }

    let nulls = match sort.direction {
        SortDirection::Ascending => "NULLS FIRST",
        SortDirection::Descending => "NULLS LAST",
    };
    builder.push(format!(
        " ORDER BY {} {} {}, id ASC",
        sort_column(sort.field),
        sort.direction.as_sql(),
        nulls
    ));

    if let Some(limit) = limit {
        builder.push(" LIMIT ").push_bind(i64::from(limit));
    }

    builder
}

/// Builds the `SELECT` for [`TodoStore::aggregate_grouped_by`]
pub fn build_group_query(field: GroupField, sort: &GroupSort) -> String {
    let key = match field {
        GroupField::Company => "company COLLATE \"C\"",
        GroupField::Category => "COALESCE(category, '') COLLATE \"C\"",
    };
    let order = match sort.order {
        GroupOrder::Key => format!("group_key {}", sort.direction.as_sql()),
        GroupOrder::Count => format!("member_count {}, group_key ASC", sort.direction.as_sql()),
    };

    format!(
        "SELECT {key} AS group_key, COUNT(*) AS member_count, \
         array_agg(id ORDER BY owner COLLATE \"C\", id) AS ids, \
         array_agg(owner ORDER BY owner COLLATE \"C\", id) AS owners \
         FROM todos GROUP BY 1 ORDER BY {order}",
        key = key,
        order = order
    )
}

#[derive(Debug, sqlx::FromRow)]
struct GroupRow {
    group_key: String,
    member_count: i64,
    ids: Vec<Uuid>,
    owners: Vec<String>,
}

impl From<GroupRow> for TodoGroup {
    fn from(row: GroupRow) -> Self {
        TodoGroup {
            key: row.group_key,
            count: row.member_count,
            todos: row
                .ids
                .into_iter()
                .zip(row.owners)
                .map(|(id, owner)| TodoSummary { id, owner })
                .collect(),
        }
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    fn name(&self) -> &str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        health_check(&self.pool).await?;
        Ok(())
    }

    async fn find(
        &self,
        predicate: &Predicate,
        sort: &Sort,
        limit: Option<u32>,
    ) -> StoreResult<Vec<Todo>> {
        let mut builder = build_find_query(predicate, sort, limit);
        debug!(sql = builder.sql(), "Finding todos");

        let todos = builder
            .build_query_as::<Todo>()
            .fetch_all(&self.pool)
            .await?;

        Ok(todos)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Todo>> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {} FROM todos WHERE id = $1",
            TODO_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(todo)
    }

    async fn insert(&self, todo: NewTodo) -> StoreResult<Uuid> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO todos (owner, body, category, role, company, age, email, avatar, completed)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(todo.owner)
        .bind(todo.body)
        .bind(todo.category.map(|c| c.as_str()))
        .bind(todo.role.as_str())
        .bind(todo.company)
        .bind(todo.age)
        .bind(todo.email)
        .bind(todo.avatar)
        .bind(todo.completed)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn aggregate_grouped_by(
        &self,
        field: GroupField,
        sort: &GroupSort,
    ) -> StoreResult<Vec<TodoGroup>> {
        let sql = build_group_query(field, sort);
        debug!(sql = %sql, "Grouping todos");

        let rows = sqlx::query_as::<_, GroupRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(TodoGroup::from).collect())
    }
}
