use axum::{Router, routing::get};

use super::handlers::{list_benefits, list_categories};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/benefits", get(list_benefits))
        .route("/categories", get(list_categories))
}
