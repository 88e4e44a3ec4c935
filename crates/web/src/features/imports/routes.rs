use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};

use super::handlers::{import_books, import_status};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Every import route requires an API key.
pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    Router::new()
        .route("/", post(import_books))
        .route("/status", get(import_status))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
