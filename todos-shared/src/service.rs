//! Todo operations
//!
//! [`TodoService`] runs each request through validation before touching the
//! store. Nothing is written or queried until every input has been checked.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use todos_shared::models::todo::CreateTodo;
//! use todos_shared::service::TodoService;
//! use todos_shared::store::MemoryStore;
//!
//! # async fn example() -> Result<(), todos_shared::error::TodoError> {
//! let service = TodoService::new(Arc::new(MemoryStore::new()));
//!
//! let id = service
//!     .create(CreateTodo {
//!         owner: Some("Fry".to_string()),
//!         email: Some("fry@planetexpress.com".to_string()),
//!         age: Some(25),
//!         role: Some("viewer".to_string()),
//!         company: Some("Planet Express".to_string()),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! let todo = service.get(&id.to_string()).await?;
//! assert_eq!(todo.owner, "Fry");
//! # Ok(())
//! # }
//! ```

use crate::avatar::avatar_for;
use crate::error::{StoreError, TodoError, TodoResult};
use crate::models::todo::{CreateTodo, NewTodo, Todo, TodoGroup};
use crate::query::sort::resolve_group;
use crate::query::validate::{
    check_age, parse_category, parse_email, parse_id, parse_role, require_text, required,
    ValidationError,
};
use crate::query::{GroupQuery, TodoQuery};
use crate::store::TodoStore;
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Validates a create request, checking fields in a fixed order
///
/// Order: owner, email, age, role, company, category. The avatar is derived
/// from the validated email.
pub fn validate_create(req: CreateTodo) -> Result<NewTodo, ValidationError> {
    let owner = require_text("owner", &required("owner", req.owner)?)?;
    let email = parse_email(&required("email", req.email)?)?;
    let age = check_age(required("age", req.age)?)?;
    let role = parse_role(&required("role", req.role)?)?;
    let company = require_text("company", &required("company", req.company)?)?;
    let category = req.category.as_deref().map(parse_category).transpose()?;

    let avatar = avatar_for(Some(&email));

    Ok(NewTodo {
        owner,
        body: req.body.unwrap_or_default(),
        category,
        role,
        company,
        age,
        email,
        avatar,
        completed: req.completed.unwrap_or(false),
    })
}

/// Todo operations over any [`TodoStore`]
#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn TodoStore {
        self.store.as_ref()
    }

    /// Todos matching the query parameters
    pub async fn list(&self, params: &TodoQuery) -> TodoResult<Vec<Todo>> {
        let compiled = params.compile()?;
        debug!(
            predicate = ?compiled.predicate,
            sort = ?compiled.sort,
            limit = ?compiled.limit,
            "Compiled todo query"
        );

        let todos = self
            .store
            .find(&compiled.predicate, &compiled.sort, compiled.limit)
            .await?;
        Ok(todos)
    }

    /// One todo by raw identifier
    pub async fn get(&self, raw_id: &str) -> TodoResult<Todo> {
        let id = parse_id(raw_id)?;
        self.store
            .find_by_id(id)
            .await?
            .ok_or(TodoError::NotFound(id))
    }

    /// Validates and stores a new todo, returning its identifier
    pub async fn create(&self, req: CreateTodo) -> TodoResult<Uuid> {
        let todo = validate_create(req)?;
        let id = self.store.insert(todo).await?;

        info!(todo_id = %id, "Todo created");
        Ok(id)
    }

    /// Deletes exactly one todo by raw identifier
    pub async fn delete(&self, raw_id: &str) -> TodoResult<()> {
        let id = parse_id(raw_id)?;

        match self.store.delete_by_id(id).await? {
            0 => Err(TodoError::NotFound(id)),
            1 => {
                info!(todo_id = %id, "Todo deleted");
                Ok(())
            }
            n => {
                error!(todo_id = %id, deleted = n, "Delete removed more than one todo");
                Err(StoreError::ContractViolation(format!(
                    "deleting {} removed {} records",
                    id, n
                ))
                .into())
            }
        }
    }

    /// Grouped view of all todos
    pub async fn groups(&self, params: &GroupQuery) -> TodoResult<Vec<TodoGroup>> {
        let (field, sort) = resolve_group(params)?;
        let groups = self.store.aggregate_grouped_by(field, &sort).await?;
        Ok(groups)
    }
}
