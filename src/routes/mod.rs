//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One page route carries the whole application: `GET /{username}` renders
//! a user's frames and `POST /{username}` applies form submissions. A JSON
//! variant of the loader and a health check sit beside it.

pub mod pages;

use axum::Router;
use axum::http::{Method, StatusCode};
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    let api = Router::new()
        .route("/api/frames/{username}", get(pages::page_json))
        .layer(cors);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/{username}", get(pages::show_page).post(pages::submit))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
