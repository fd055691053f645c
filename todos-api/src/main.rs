//! # Todos API Server
//!
//! Serves the todo collection over HTTP: filtered listing, lookup,
//! creation, deletion and a grouped view.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/todos cargo run -p todos-api
//! STORE_BACKEND=memory cargo run -p todos-api
//! ```

use std::sync::Arc;
use todos_api::{
    app::{build_router, AppState},
    config::{Config, StoreBackend},
};
use todos_shared::{
    db::{
        migrations::{ensure_database_exists, run_migrations},
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    store::{MemoryStore, PgTodoStore, TodoStore},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Config first: it loads `.env`, which may set LOG_FORMAT and RUST_LOG
    let config = Config::from_env()?;
    init_tracing();

    tracing::info!("Todos API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let (store, pool): (Arc<dyn TodoStore>, _) = match config.store.backend {
        StoreBackend::Postgres => {
            let url = config
                .store
                .database_url
                .clone()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is not set"))?;

            ensure_database_exists(&url).await?;
            let pool = create_pool(DatabaseConfig {
                url,
                max_connections: config.store.max_connections,
                ..Default::default()
            })
            .await?;
            run_migrations(&pool).await?;

            (Arc::new(PgTodoStore::new(pool.clone())), Some(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; todos are lost on shutdown");
            (Arc::new(MemoryStore::new()), None)
        }
    };

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        close_pool(pool).await;
    }
    tracing::info!("Server stopped");

    Ok(())
}

/// Plain text logs by default, JSON when `LOG_FORMAT=json`
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "todos_api=debug,todos_shared=debug,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json");
    let (plain_layer, json_layer) = if json {
        (None, Some(tracing_subscriber::fmt::layer().json()))
    } else {
        (Some(tracing_subscriber::fmt::layer()), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain_layer)
        .with(json_layer)
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
