use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use storage::Database;

use crate::error::WebError;
use crate::state::SiteUrl;

use super::services;

#[utoipa::path(
    get,
    path = "/sitemap.xml",
    responses(
        (status = 200, description = "Sitemap of the home page, visible books, categories and benefits", content_type = "application/xml", body = String)
    ),
    tag = "sitemap"
)]
pub async fn sitemap(
    State(db): State<Database>,
    State(site_url): State<SiteUrl>,
) -> Result<Response, WebError> {
    let entries = services::load_entries(db.pool()).await?;
    let xml = services::render(site_url.as_str(), &entries, chrono::Utc::now().naive_utc());

    Ok(([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], xml).into_response())
}
