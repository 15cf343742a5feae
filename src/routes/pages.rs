//! Frame page routes — HTML view, form submissions, JSON view.

use axum::Form;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::{Html, IntoResponse, Json, Response};
use serde::Deserialize;

use crate::error::PageError;
use crate::render;
use crate::services::mutation::{self, FormFields, MutationOutcome};
use crate::services::page::{self, PageData};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(rename = "collectionId")]
    pub collection_id: Option<String>,
    pub secret: Option<String>,
}

/// `GET /{username}`: render the page.
pub async fn show_page(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, PageError> {
    let data = page::load_page(
        state.store.as_ref(),
        &username,
        query.collection_id.as_deref(),
        query.secret.as_deref(),
    )
    .await?;
    Ok(Html(render::render_page(&data, query.secret.as_deref())))
}

/// `GET /api/frames/{username}`: loader data as JSON.
pub async fn page_json(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageData>, PageError> {
    let data = page::load_page(state.store.as_ref(), &username, query.collection_id.as_deref(), None).await?;
    Ok(Json(data))
}

/// `POST /{username}`: apply a form submission.
///
/// Collection creation answers `302 Found`; every other intent answers an
/// empty `200 OK`.
pub async fn submit(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Form(fields): Form<FormFields>,
) -> Result<Response, PageError> {
    match mutation::apply(state.store.as_ref(), &username, &fields).await? {
        MutationOutcome::Redirect(location) => Ok((StatusCode::FOUND, [(LOCATION, location)]).into_response()),
        MutationOutcome::Done => Ok(StatusCode::OK.into_response()),
    }
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
