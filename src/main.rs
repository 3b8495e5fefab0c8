use std::sync::Arc;

use bytebrigade_backend::config::Config;
use bytebrigade_backend::utils::db::{connect, ensure_schema};
use bytebrigade_backend::{router, AppState};
use dotenv::dotenv;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    let config = Config::from_env().expect("DB_URL must be set");

    let db = connect(&config.db_url)
        .await
        .expect("database connect failed");
    ensure_schema(&db)
        .await
        .expect("failed to create database schema");

    let app = router(Arc::new(AppState {
        db,
        api_prefix: config.api_prefix.clone(),
    }));
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("failed to bind listener");

    tracing::info!("Server started on {}.", config.bind_addr);
    axum::serve(listener, app).await.expect("server error");
}
