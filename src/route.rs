//! Route definitions for the UTM builder API
//!
//! This module maps every HTTP route to its handler and injects the shared
//! session state.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handler::{
    apply_history_entry, clear_history, commit_history, compose_url, get_state, list_history,
    list_options, remove_history_entry, set_field, validate_field,
};
use crate::session::AppState;

/// Creates the application router
///
/// # Route Definitions
///
/// - `GET /api/state` - Current fields, errors, generated URL and history
/// - `PUT /api/fields/{field}` - Update one field
/// - `POST /api/validate` - Run a field validator
/// - `POST /api/compose` - Stateless composition
/// - `GET|POST|DELETE /api/history` - List, record the current URL, clear
/// - `DELETE /api/history/{index}` - Remove one entry
/// - `POST /api/history/{index}/apply` - Restore the form from an entry
/// - `GET /api/options/{kind}` - Preset source/medium values
///
/// # Example Usage
///
/// ```no_run
/// # use std::sync::Arc;
/// # use utm_builder::storage::init_store;
/// # use utm_builder::session::AppState;
/// # use utm_builder::route::create_app;
/// let store = init_store("utm.db").unwrap();
/// let app = create_app(AppState::new(Arc::new(store)));
/// // axum::serve(listener, app).await.unwrap();
/// ```
pub fn create_app(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/state", get(get_state))
        .route("/fields/{field}", put(set_field))
        .route("/validate", post(validate_field))
        .route("/compose", post(compose_url))
        .route(
            "/history",
            get(list_history).post(commit_history).delete(clear_history),
        )
        .route("/history/{index}", delete(remove_history_entry))
        .route("/history/{index}/apply", post(apply_history_entry))
        .route("/options/{kind}", get(list_options));

    Router::new().nest("/api", api_routes).with_state(state)
}
