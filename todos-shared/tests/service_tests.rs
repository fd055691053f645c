//! Service tests against the in-memory store
//!
//! Run with: cargo test -p todos-shared --test service_tests

use chrono::Utc;
use std::sync::Arc;
use todos_shared::error::{TodoError, ValidationError};
use todos_shared::models::todo::{CreateTodo, Todo};
use todos_shared::query::{GroupQuery, TodoQuery};
use todos_shared::service::TodoService;
use todos_shared::store::MemoryStore;
use uuid::Uuid;

struct Fixture {
    service: TodoService,
    store: Arc<MemoryStore>,
    special_id: Uuid,
}

fn todo(owner: &str, age: i32, company: &str, role: &str, body: &str, completed: bool) -> Todo {
    Todo {
        id: Uuid::new_v4(),
        owner: owner.to_string(),
        body: body.to_string(),
        category: None,
        role: role.to_string(),
        company: company.to_string(),
        age,
        email: format!("{}@test.com", owner.to_lowercase().replace(' ', ".")),
        avatar: "https://gravatar.com/avatar/example?d=identicon".to_string(),
        completed,
        created_at: Utc::now(),
    }
}

fn fixture() -> Fixture {
    let special = todo(
        "Special Todo",
        35,
        "Initech",
        "viewer",
        "Reticulate (the) splines 100%",
        true,
    );
    let special_id = special.id;

    let store = Arc::new(MemoryStore::with_todos(vec![
        todo("Test Todo 1", 25, "ACME", "admin", "Buy anvils", false),
        todo("Test Todo 2", 30, "Globex", "editor", "Plan world domination", true),
        special,
    ]));

    Fixture {
        service: TodoService::new(store.clone()),
        store,
        special_id,
    }
}

fn query(pairs: &[(&str, &str)]) -> TodoQuery {
    let mut q = TodoQuery::default();
    for (key, value) in pairs {
        let value = Some(value.to_string());
        match *key {
            "age" => q.age = value,
            "company" => q.company = value,
            "owner" => q.owner = value,
            "role" => q.role = value,
            "category" => q.category = value,
            "status" => q.status = value,
            "contains" => q.contains = value,
            "body" => q.body = value,
            "limit" => q.limit = value,
            "sortBy" => q.sort_by = value,
            "sortOrder" => q.sort_order = value,
            other => panic!("unknown parameter {}", other),
        }
    }
    q
}

fn owners(todos: &[Todo]) -> Vec<&str> {
    todos.iter().map(|t| t.owner.as_str()).collect()
}

fn valid_create() -> CreateTodo {
    CreateTodo {
        owner: Some("Hermes".to_string()),
        body: Some("File form 1-B".to_string()),
        category: Some("homework".to_string()),
        role: Some("admin".to_string()),
        company: Some("Central Bureaucracy".to_string()),
        age: Some(41),
        email: Some("hermes@planetexpress.com".to_string()),
        completed: Some(false),
    }
}

#[tokio::test]
async fn test_no_params_returns_everything() {
    let f = fixture();
    let todos = f.service.list(&TodoQuery::default()).await.unwrap();
    assert_eq!(owners(&todos), vec!["Special Todo", "Test Todo 1", "Test Todo 2"]);
}

#[tokio::test]
async fn test_filter_by_age() {
    let f = fixture();
    let todos = f.service.list(&query(&[("age", "35")])).await.unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].id, f.special_id);
}

#[tokio::test]
async fn test_filter_by_company_ignores_case() {
    let f = fixture();
    let todos = f.service.list(&query(&[("company", "acme")])).await.unwrap();
    assert_eq!(owners(&todos), vec!["Test Todo 1"]);
}

#[tokio::test]
async fn test_out_of_range_age_fails_regardless_of_contents() {
    let f = fixture();
    let err = f.service.list(&query(&[("age", "9999")])).await.unwrap_err();
    assert!(matches!(
        err,
        TodoError::Validation(ValidationError::OutOfRange { field: "age", .. })
    ));

    let empty = TodoService::new(Arc::new(MemoryStore::new()));
    assert!(empty.list(&query(&[("age", "9999")])).await.is_err());
}

#[tokio::test]
async fn test_filter_by_role_is_exact() {
    let f = fixture();
    let todos = f.service.list(&query(&[("role", "editor")])).await.unwrap();
    assert_eq!(owners(&todos), vec!["Test Todo 2"]);

    assert!(f.service.list(&query(&[("role", "Editor")])).await.is_err());
}

#[tokio::test]
async fn test_filter_by_status() {
    let f = fixture();

    let complete = f.service.list(&query(&[("status", "COMPLETE")])).await.unwrap();
    assert!(complete.iter().all(|t| t.completed));
    assert_eq!(complete.len(), 2);

    let incomplete = f.service.list(&query(&[("status", "incomplete")])).await.unwrap();
    assert_eq!(owners(&incomplete), vec!["Test Todo 1"]);
}

#[tokio::test]
async fn test_contains_is_literal() {
    let f = fixture();

    let todos = f.service.list(&query(&[("contains", "(THE)")])).await.unwrap();
    assert_eq!(owners(&todos), vec!["Special Todo"]);

    let todos = f.service.list(&query(&[("contains", "100%")])).await.unwrap();
    assert_eq!(todos.len(), 1);

    let todos = f.service.list(&query(&[("contains", "b.y")])).await.unwrap();
    assert!(todos.is_empty());

    let todos = f.service.list(&query(&[("body", "anvils")])).await.unwrap();
    assert_eq!(owners(&todos), vec!["Test Todo 1"]);
}

#[tokio::test]
async fn test_adding_dimensions_never_widens_results() {
    let f = fixture();
    let steps: [&[(&str, &str)]; 4] = [
        &[],
        &[("status", "complete")],
        &[("status", "complete"), ("company", "e")],
        &[("status", "complete"), ("company", "e"), ("age", "30")],
    ];

    let mut previous = usize::MAX;
    for params in steps {
        let count = f.service.list(&query(params)).await.unwrap().len();
        assert!(count <= previous, "{:?} widened the result", params);
        previous = count;
    }
    assert_eq!(previous, 1);
}

#[tokio::test]
async fn test_sort_and_limit() {
    let f = fixture();

    let todos = f
        .service
        .list(&query(&[("sortBy", "age"), ("sortOrder", "desc"), ("limit", "2")]))
        .await
        .unwrap();
    let ages: Vec<_> = todos.iter().map(|t| t.age).collect();
    assert_eq!(ages, vec![35, 30]);

    let todos = f.service.list(&query(&[("limit", "zero")])).await.unwrap();
    assert_eq!(todos.len(), 3);
}

#[tokio::test]
async fn test_get_by_id() {
    let f = fixture();
    let todo = f.service.get(&f.special_id.to_string()).await.unwrap();
    assert_eq!(todo.owner, "Special Todo");
}

#[tokio::test]
async fn test_get_with_malformed_id() {
    let f = fixture();
    let err = f.service.get("bad").await.unwrap_err();
    assert!(matches!(
        err,
        TodoError::Validation(ValidationError::MalformedId { .. })
    ));
}

#[tokio::test]
async fn test_get_with_unknown_id() {
    let f = fixture();
    let id = Uuid::new_v4();
    let err = f.service.get(&id.to_string()).await.unwrap_err();
    assert!(matches!(err, TodoError::NotFound(missing) if missing == id));
}

#[tokio::test]
async fn test_create_then_fetch() {
    let f = fixture();
    let id = f.service.create(valid_create()).await.unwrap();

    let stored = f.service.get(&id.to_string()).await.unwrap();
    assert_eq!(stored.owner, "Hermes");
    assert_eq!(stored.category.as_deref(), Some("homework"));
    assert_eq!(stored.role, "admin");
    assert!(stored.avatar.starts_with("https://gravatar.com/avatar/"));
    assert!(stored.avatar.ends_with("?d=identicon"));
    assert_eq!(f.store.len().await, 4);
}

#[tokio::test]
async fn test_create_with_any_invalid_field_writes_nothing() {
    let invalid = [
        CreateTodo {
            owner: Some("".to_string()),
            ..valid_create()
        },
        CreateTodo {
            email: Some("not-an-email".to_string()),
            ..valid_create()
        },
        CreateTodo {
            age: Some(150),
            ..valid_create()
        },
        CreateTodo {
            role: Some("superuser".to_string()),
            ..valid_create()
        },
        CreateTodo {
            company: None,
            ..valid_create()
        },
        CreateTodo {
            category: Some("chores".to_string()),
            ..valid_create()
        },
    ];

    for req in invalid {
        let f = fixture();
        let err = f.service.create(req).await.unwrap_err();
        assert!(matches!(err, TodoError::Validation(_)), "{:?}", err);
        assert_eq!(f.store.len().await, 3);
    }
}

#[tokio::test]
async fn test_delete() {
    let f = fixture();
    f.service.delete(&f.special_id.to_string()).await.unwrap();
    assert_eq!(f.store.len().await, 2);

    let err = f.service.delete(&f.special_id.to_string()).await.unwrap_err();
    assert!(matches!(err, TodoError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_with_malformed_id_is_not_not_found() {
    let f = fixture();
    let err = f.service.delete("588935f5de613130e931ffd5").await.unwrap_err();
    assert!(matches!(err, TodoError::Validation(_)));
    assert_eq!(f.store.len().await, 3);
}

#[tokio::test]
async fn test_groups() {
    let f = fixture();
    f.service
        .create(CreateTodo {
            company: Some("ACME".to_string()),
            ..valid_create()
        })
        .await
        .unwrap();

    let groups = f
        .service
        .groups(&GroupQuery {
            group_by: None,
            sort_by: Some("count".to_string()),
            sort_order: Some("desc".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0].key, "ACME");
    assert_eq!(groups[0].count, 2);
    let members: Vec<_> = groups[0].todos.iter().map(|t| t.owner.as_str()).collect();
    assert_eq!(members, vec!["Hermes", "Test Todo 1"]);
}
