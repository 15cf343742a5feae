//! reframe — a personal frame collage served from one page route.

pub mod config;
pub mod db;
pub mod error;
pub mod grid;
pub mod render;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// `info` filter.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
