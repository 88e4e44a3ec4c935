use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use importer::{ImportFile, ImportStatus};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

/// Header carrying the uploaded file's original name
pub const FILE_NAME_HEADER: &str = "x-file-name";

/// Final counts of a bulk import
#[derive(Debug, Serialize, ToSchema)]
pub struct ImportSummaryResponse {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub message: String,
}

/// Latest progress of the current or last import
#[derive(Debug, Serialize, ToSchema)]
pub struct ImportStatusResponse {
    pub state: String,
    pub message: String,
    pub running: bool,
}

impl From<&ImportStatus> for ImportStatusResponse {
    fn from(status: &ImportStatus) -> Self {
        Self {
            state: status.kind().to_string(),
            message: status.to_string(),
            running: status.is_running(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/imports",
    request_body(content = String, description = "JSON array of books", content_type = "application/json"),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Import finished; failed records are counted, not fatal", body = ImportSummaryResponse),
        (status = 400, description = "No file, unreadable file, invalid JSON or not an array"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Another import is in progress")
    ),
    tag = "imports"
)]
pub async fn import_books(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, WebError> {
    let file = if body.is_empty() {
        None
    } else {
        let name = headers
            .get(FILE_NAME_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("upload.json");
        Some(ImportFile::upload(name, body.to_vec()))
    };

    let outcome = services::run_import(&state.db, &state.imports, file).await?;

    Ok(Json(ImportSummaryResponse {
        total: outcome.total,
        successful: outcome.successful,
        failed: outcome.failed,
        message: outcome.status().to_string(),
    })
    .into_response())
}

#[utoipa::path(
    get,
    path = "/api/imports/status",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Current import status", body = ImportStatusResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "imports"
)]
pub async fn import_status(State(state): State<AppState>) -> Result<Response, WebError> {
    let status = state.imports.progress.current();

    Ok(Json(ImportStatusResponse::from(&status)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_response_from_progress() {
        let response = ImportStatusResponse::from(&ImportStatus::ProcessingBook {
            current: 3,
            total: 10,
        });
        assert_eq!(response.state, "processing_book");
        assert_eq!(response.message, "Processing book 3 of 10...");
        assert!(response.running);

        let response = ImportStatusResponse::from(&ImportStatus::Complete {
            successful: 9,
            failed: 1,
        });
        assert!(!response.running);
        assert_eq!(response.message, "Upload complete: 9 books added, 1 failed.");
    }
}
