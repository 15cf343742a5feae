//! Mutation handler — form submissions that create, update and delete.
//!
//! DESIGN
//! ======
//! Every submission authenticates first: resolve the user named in the URL,
//! then verify the presented edit secret. Nothing is written before both
//! succeed. Dispatch is on the `intent` field; anything unrecognised creates
//! a frame.
//!
//! Frame and collection references are scoped to the authenticated user's
//! collections. A reference outside that scope reads as not found.
//!
//! Updates are partial: only fields present in the form change, and props
//! are merged into the stored ones.
//!
//! Forms rendered by the page add `returnTo=page`. Those submissions answer
//! with a redirect back to the affected collection instead of an empty 200,
//! so a browser lands on the refreshed page.

use std::collections::HashMap;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{COLLECTION_NOT_FOUND, FRAME_NOT_FOUND, PageError};
use crate::services::{page, secret};
use crate::store::{FrameData, FramePatch, FrameStore};

// =============================================================================
// FORM FIELDS
// =============================================================================

pub const FIELD_INTENT: &str = "intent";
pub const FIELD_SECRET: &str = "userId";
pub const FIELD_ID: &str = "id";
pub const FIELD_COLLECTION_ID: &str = "collectionId";
pub const FIELD_NAME: &str = "name";
pub const FIELD_URL: &str = "url";
pub const FIELD_RETURN_TO: &str = "returnTo";
/// `returnTo` value asking for a redirect back to the collection page.
pub const RETURN_TO_PAGE: &str = "page";

/// Fields that never land in a frame's `props`.
const RESERVED_FIELDS: &[&str] = &[
    FIELD_INTENT,
    FIELD_SECRET,
    FIELD_ID,
    FIELD_COLLECTION_ID,
    FIELD_NAME,
    FIELD_URL,
    FIELD_RETURN_TO,
    "x",
    "y",
    "width",
    "height",
];

pub const DEFAULT_COLLECTION_NAME: &str = "Untitled";

/// Raw form fields from an urlencoded body.
pub type FormFields = HashMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    CreateCollection,
    Delete,
    Update,
    CreateFrame,
}

impl Intent {
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("create-collection") => Self::CreateCollection,
            Some("delete") => Self::Delete,
            Some("update") => Self::Update,
            _ => Self::CreateFrame,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateCollection => "create-collection",
            Self::Delete => "delete",
            Self::Update => "update",
            Self::CreateFrame => "create-frame",
        }
    }
}

/// Result of a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Navigate to this location: collection creation, or any intent
    /// submitted with `returnTo=page`.
    Redirect(String),
    /// Empty 200.
    Done,
}

fn field<'a>(fields: &'a FormFields, key: &str) -> Option<&'a str> {
    fields.get(key).map(String::as_str)
}

fn required_uuid(fields: &FormFields, key: &str) -> Result<Uuid, PageError> {
    let raw = field(fields, key).ok_or_else(|| PageError::BadRequest(format!("missing field `{key}`")))?;
    Uuid::parse_str(raw.trim()).map_err(|_| PageError::BadRequest(format!("invalid `{key}`: {raw}")))
}

fn optional_int(fields: &FormFields, key: &str, min: i32) -> Result<Option<i32>, PageError> {
    match field(fields, key).map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<i32>()
            .map(|v| Some(v.max(min)))
            .map_err(|_| PageError::BadRequest(format!("invalid `{key}`: {raw}"))),
    }
}

fn props_from_form(fields: &FormFields) -> Map<String, Value> {
    fields
        .iter()
        .filter(|(k, _)| !RESERVED_FIELDS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect()
}

/// Extract frame geometry and payload from a form.
///
/// Missing geometry falls back to `0,0 1x1`; positions clamp at 0 and sizes
/// at 1. Unreserved fields are kept as string props.
///
/// # Errors
///
/// `BadRequest` if a geometry field is present but not an integer.
pub fn frame_data_from_form(fields: &FormFields) -> Result<FrameData, PageError> {
    let patch = frame_patch_from_form(fields)?;
    let defaults = FrameData::default();
    Ok(FrameData {
        x: patch.x.unwrap_or(defaults.x),
        y: patch.y.unwrap_or(defaults.y),
        width: patch.width.unwrap_or(defaults.width),
        height: patch.height.unwrap_or(defaults.height),
        url: patch.url.unwrap_or_default(),
        props: patch.props,
    })
}

/// Extract only the frame fields present in a form.
///
/// Same clamping as [`frame_data_from_form`]; absent fields stay `None`.
///
/// # Errors
///
/// `BadRequest` if a geometry field is present but not an integer.
pub fn frame_patch_from_form(fields: &FormFields) -> Result<FramePatch, PageError> {
    Ok(FramePatch {
        x: optional_int(fields, "x", 0)?,
        y: optional_int(fields, "y", 0)?,
        width: optional_int(fields, "width", 1)?,
        height: optional_int(fields, "height", 1)?,
        url: field(fields, FIELD_URL).map(|u| u.trim().to_owned()),
        props: props_from_form(fields),
    })
}

/// Location for the page showing `collection_id`, with the secret attached.
#[must_use]
pub fn collection_location(username: &str, collection_id: Uuid, secret: &str) -> String {
    format!(
        "/{}?collectionId={collection_id}&secret={}",
        urlencoding::encode(username),
        urlencoding::encode(secret)
    )
}

// =============================================================================
// APPLY
// =============================================================================

/// Authenticate and apply one form submission for `username`.
///
/// # Errors
///
/// - `NotFound` if the user, target frame or target collection is absent
/// - `Forbidden` if the secret does not belong to the user
/// - `BadRequest` for malformed identifiers or geometry
/// - a store error if any data-store call fails
pub async fn apply(store: &dyn FrameStore, username: &str, fields: &FormFields) -> Result<MutationOutcome, PageError> {
    let user = page::resolve_user(store, username).await?;

    let presented = field(fields, FIELD_SECRET).unwrap_or_default();
    if !secret::verify_secret(store, user.id, presented).await? {
        tracing::warn!(username = %user.username, "edit secret rejected");
        return Err(PageError::Forbidden);
    }

    let intent = Intent::parse(field(fields, FIELD_INTENT));
    tracing::debug!(username = %user.username, intent = intent.as_str(), "applying mutation");
    let collection_id = match intent {
        Intent::CreateCollection => {
            let name = field(fields, FIELD_NAME)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_COLLECTION_NAME);
            let collection = store.create_collection(user.id, name).await?;
            tracing::info!(username = %user.username, collection_id = %collection.id, "collection created");
            return Ok(MutationOutcome::Redirect(collection_location(
                &user.username,
                collection.id,
                presented.trim(),
            )));
        }
        Intent::Delete => {
            let frame_id = required_uuid(fields, FIELD_ID)?;
            let collection_id = store
                .delete_frame(user.id, frame_id)
                .await?
                .ok_or(PageError::NotFound(FRAME_NOT_FOUND))?;
            tracing::info!(username = %user.username, %frame_id, "frame deleted");
            collection_id
        }
        Intent::Update => {
            let frame_id = required_uuid(fields, FIELD_ID)?;
            let patch = frame_patch_from_form(fields)?;
            let frame = store
                .update_frame(user.id, frame_id, &patch)
                .await?
                .ok_or(PageError::NotFound(FRAME_NOT_FOUND))?;
            tracing::info!(username = %user.username, %frame_id, "frame updated");
            frame.collection_id
        }
        Intent::CreateFrame => {
            let collection_id = required_uuid(fields, FIELD_COLLECTION_ID)?;
            let data = frame_data_from_form(fields)?;
            if store.find_collection(user.id, collection_id).await?.is_none() {
                return Err(PageError::NotFound(COLLECTION_NOT_FOUND));
            }
            let frame = store.create_frame(collection_id, &data).await?;
            tracing::info!(username = %user.username, %collection_id, frame_id = %frame.id, "frame created");
            collection_id
        }
    };

    if field(fields, FIELD_RETURN_TO).map(str::trim) == Some(RETURN_TO_PAGE) {
        return Ok(MutationOutcome::Redirect(collection_location(
            &user.username,
            collection_id,
            presented.trim(),
        )));
    }
    Ok(MutationOutcome::Done)
}

#[cfg(test)]
#[path = "mutation_test.rs"]
mod tests;
