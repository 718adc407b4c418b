//! Roster server: loads config from env (and `.env`), prepares the store, performs the
//! initial student fetch and serves the roster routes.

use roster_sdk::{
    app_router, ensure_database_exists, ensure_roster_tables, seed_courses, Backend, MemoryGateway,
    PgGateway, RosterConfig, RosterState, StudentGateway,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("roster_sdk=info")),
        )
        .init();

    let config = RosterConfig::from_env()?;
    let gateway: Arc<dyn StudentGateway> = match config.backend {
        Backend::Postgres => {
            ensure_database_exists(&config.database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.database_url)
                .await?;
            ensure_roster_tables(&pool, &config.schema).await?;
            let seeded = seed_courses(&pool, &config.schema, &config.seed_courses).await?;
            tracing::info!(schema = %config.schema, seeded, "postgres store ready");
            Arc::new(PgGateway::new(pool, &config.schema))
        }
        Backend::Memory => {
            tracing::info!(courses = config.seed_courses.len(), "using in-memory store");
            Arc::new(MemoryGateway::with_courses(config.seed_courses.clone()))
        }
    };

    let state = RosterState::with_default_filters(gateway, config.default_filters.clone()).shared();
    state.fetch_students().await;
    if let Some(err) = state.error() {
        tracing::warn!(error = %err, "initial student fetch failed");
    }

    let app = app_router(state);
    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
