//! HTTP request handlers exposing the session to the UI
//!
//! Every handler runs to completion under the session lock: one request, one
//! mutation, one synchronous persist.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::composer::compose;
use crate::error::ApiError;
use crate::model::{
    ComposeResponse, Field, HistoryEntry, OptionsParams, SessionSnapshot, SetFieldRequest,
    UtmFields, ValidateRequest, ValidateResponse,
};
use crate::presets::{filter_options, options_for};
use crate::session::AppState;
use crate::validation::{INVALID_TOKEN_MESSAGE, INVALID_URL_MESSAGE};

/// Returns the full session snapshot
///
/// `GET /api/state`
pub async fn get_state(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.lock().snapshot())
}

/// Updates one form field and returns the recomputed snapshot
///
/// `PUT /api/fields/{field}` with body `{"value": "..."}`
///
/// # Response
///
/// - **200 OK** - Field updated (validation problems are reported in `errors`)
/// - **400 Bad Request** - Unknown field name
pub async fn set_field(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<SetFieldRequest>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let field: Field = name.parse()?;

    let mut session = state.lock();
    session.set_field(field, payload.value);
    Ok(Json(session.snapshot()))
}

/// Runs a field's validator and records the outcome in the session errors
///
/// `POST /api/validate` with body `{"field": "utmTerm", "value": "..."}`
///
/// Source and medium are checked against the token rule without touching
/// the error map.
pub async fn validate_field(
    State(state): State<AppState>,
    Json(payload): Json<ValidateRequest>,
) -> Json<ValidateResponse> {
    let mut session = state.lock();

    let (valid, message) = match payload.field {
        Field::WebsiteUrl => (
            session.composer.validate_website_url(&payload.value),
            INVALID_URL_MESSAGE,
        ),
        field if field.is_token() => (
            session.composer.validate_token(&payload.value, Some(field)),
            INVALID_TOKEN_MESSAGE,
        ),
        _ => (
            session.composer.validate_token(&payload.value, None),
            INVALID_TOKEN_MESSAGE,
        ),
    };

    Json(ValidateResponse {
        valid,
        error: (!valid).then(|| message.to_string()),
    })
}

/// Composes a URL from the given fields without touching the session
///
/// `POST /api/compose`
pub async fn compose_url(Json(fields): Json<UtmFields>) -> Json<ComposeResponse> {
    Json(ComposeResponse {
        generated_url: compose(&fields),
    })
}

/// `GET /api/history`
pub async fn list_history(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    Json(state.lock().history.entries().to_vec())
}

/// Records the current generated URL
///
/// The UI calls this after the URL was copied to the clipboard.
///
/// # Response
///
/// - **201 Created** - Entry recorded, returned in the body
/// - **422 Unprocessable Entity** - There is no valid generated URL yet
pub async fn commit_history(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let entry = state.lock().commit()?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Removes the entry at `index` (0 = newest) and returns the remaining list
///
/// `DELETE /api/history/{index}`; an out-of-range index changes nothing.
pub async fn remove_history_entry(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Json<Vec<HistoryEntry>> {
    let mut session = state.lock();
    session.history.remove_at(index);
    Json(session.history.entries().to_vec())
}

/// `DELETE /api/history`
pub async fn clear_history(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    let mut session = state.lock();
    session.history.clear();
    Json(session.history.entries().to_vec())
}

/// Loads the form from a history entry
///
/// `POST /api/history/{index}/apply`
///
/// # Response
///
/// - **200 OK** - Snapshot after restoring the fields
/// - **404 Not Found** - No entry at `index`
pub async fn apply_history_entry(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let mut session = state.lock();
    if !session.select_history(index) {
        return Err(ApiError::NotFound(format!("History entry {}", index)));
    }
    Ok(Json(session.snapshot()))
}

/// Lists preset values for a dropdown, optionally filtered
///
/// `GET /api/options/{kind}?q=insta` where `kind` is `source` or `medium`
pub async fn list_options(
    Path(kind): Path<String>,
    Query(params): Query<OptionsParams>,
) -> Result<Json<Vec<&'static str>>, ApiError> {
    let options =
        options_for(&kind).ok_or_else(|| ApiError::NotFound(format!("Options '{}'", kind)))?;
    let query = params.q.unwrap_or_default();
    Ok(Json(filter_options(options, &query)))
}
