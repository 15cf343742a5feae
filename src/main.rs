use std::sync::Arc;

use reframe::config::AppConfig;
use reframe::store::PgStore;
use reframe::{db, routes, state};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    reframe::init_tracing();

    let config = AppConfig::from_env().expect("invalid configuration");

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("database init failed");
    let state = state::AppState::new(Arc::new(PgStore::new(pool)));

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, "reframe listening");
    axum::serve(listener, app).await.expect("server failed");
}
