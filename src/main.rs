// src/main.rs
use std::error::Error;
use std::sync::Arc;

use dotenvy::dotenv;
use polls::clock::SystemClock;
use polls::config::Config;
use polls::store::{MemoryStore, PgStore, PollStore};
use polls::templates::Templates;
use polls::{create_routes, db, logging, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok(); // Load environment variables from .env file
    logging::init();

    let config = Config::from_env()?;

    let store: Arc<dyn PollStore> = match &config.database_url {
        Some(database_url) => {
            let pool = db::create_pool(database_url, config.max_connections).await?;
            db::migrate(&pool).await?;
            tracing::info!(max_connections = config.max_connections, "connected to database");
            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL is not set; polls are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::new(store, Arc::new(SystemClock), Templates::new()?);
    let routes = create_routes(state, config.cors_allow_any);

    let handle = axum_server::Handle::new();
    tokio::spawn(shutdown_on_ctrl_c(handle.clone()));

    let addr = config.bind_addr();
    tracing::info!(%addr, "listening");
    axum_server::bind(addr)
        .handle(handle)
        .serve(routes.into_make_service())
        .await?;

    Ok(())
}

async fn shutdown_on_ctrl_c(handle: axum_server::Handle) {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutting down");
        handle.graceful_shutdown(Some(std::time::Duration::from_secs(10)));
    }
}
