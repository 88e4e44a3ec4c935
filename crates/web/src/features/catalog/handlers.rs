use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    models::{Benefit, Category},
};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/benefits",
    responses(
        (status = 200, description = "List all benefits", body = Vec<Benefit>)
    ),
    tag = "catalog"
)]
pub async fn list_benefits(State(db): State<Database>) -> Result<Response, WebError> {
    let benefits = services::list_benefits(db.pool()).await?;

    Ok(Json(benefits).into_response())
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "List all categories", body = Vec<Category>)
    ),
    tag = "catalog"
)]
pub async fn list_categories(State(db): State<Database>) -> Result<Response, WebError> {
    let categories = services::list_categories(db.pool()).await?;

    Ok(Json(categories).into_response())
}
