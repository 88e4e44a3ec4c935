use axum::Router;

use crate::features::{books, catalog, imports, sitemap};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/books", books::routes::routes(state.api_keys.clone()))
        .nest("/imports", imports::routes::routes(state.api_keys.clone()))
        .merge(catalog::routes::routes());

    Router::new()
        .nest("/api", api)
        .merge(sitemap::routes::routes())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::ApiKeys;
    use crate::state::{ImportState, SiteUrl};
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use importer::ImportOptions;
    use sqlx::postgres::PgPoolOptions;
    use std::time::Duration;
    use storage::Database;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn test_state() -> AppState {
        // Nothing listens here: requests that reach the pool fail fast
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(1))
            .connect_lazy("postgres://localhost/books_test")
            .unwrap();

        AppState {
            db: Database::from_pool(pool),
            api_keys: ApiKeys::from_comma_separated("secret"),
            imports: ImportState::new(ImportOptions::default()),
            site_url: SiteUrl::new("https://books.example"),
        }
    }

    #[tokio::test]
    async fn test_import_requires_api_key() {
        let app = router(test_state());

        let response = app
            .oneshot(
                Request::post("/api/imports")
                    .body(Body::from("[]"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_import_rejects_wrong_api_key() {
        let app = router(test_state());

        let response = app
            .oneshot(
                Request::get("/api/imports/status")
                    .header(header::AUTHORIZATION, "Bearer nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_status_with_valid_key_is_idle() {
        let app = router(test_state());

        let response = app
            .oneshot(
                Request::get("/api/imports/status")
                    .header(header::AUTHORIZATION, "Bearer secret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_empty_upload_is_no_file_selected() {
        let state = test_state();
        let progress = state.imports.progress.clone();
        let app = router(state);

        let response = app
            .oneshot(
                Request::post("/api/imports")
                    .header(header::AUTHORIZATION, "Bearer secret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            progress.current().to_string(),
            "Please select a file to upload."
        );
    }

    #[tokio::test]
    async fn test_non_array_upload_is_rejected_before_any_write() {
        let state = test_state();
        let progress = state.imports.progress.clone();
        let app = router(state);

        let response = app
            .oneshot(
                Request::post("/api/imports")
                    .header(header::AUTHORIZATION, "Bearer secret")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            progress.current().to_string(),
            "Error: JSON file must contain an array of book objects."
        );
    }

    #[tokio::test]
    async fn test_concurrent_import_conflicts() {
        let state = test_state();
        let _held = state.imports.latch.try_acquire().unwrap();
        let app = router(state);

        let response = app
            .oneshot(
                Request::post("/api/imports")
                    .header(header::AUTHORIZATION, "Bearer secret")
                    .body(Body::from("[]"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    async fn status_of(request: Request<Body>) -> StatusCode {
        router(test_state()).oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_book_admin_routes_require_api_key() {
        let book_id = Uuid::new_v4();
        let image_id = Uuid::new_v4();

        let requests = vec![
            Request::post("/api/books")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
            Request::delete(format!("/api/books/{}", book_id))
                .body(Body::empty())
                .unwrap(),
            Request::post(format!("/api/books/{}/images", book_id))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"url":"https://img.example/a.jpg"}"#))
                .unwrap(),
            Request::put(format!("/api/books/{}/images/order", book_id))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(format!(r#"{{"image_ids":["{}"]}}"#, image_id)))
                .unwrap(),
            Request::delete(format!("/api/books/{}/images/{}", book_id, image_id))
                .body(Body::empty())
                .unwrap(),
        ];

        for request in requests {
            let route = format!("{} {}", request.method(), request.uri());
            assert_eq!(status_of(request).await, StatusCode::UNAUTHORIZED, "{}", route);
        }
    }

    #[tokio::test]
    async fn test_book_admin_routes_reject_wrong_api_key() {
        let request = Request::delete(format!("/api/books/{}", Uuid::new_v4()))
            .header(header::AUTHORIZATION, "Bearer nope")
            .body(Body::empty())
            .unwrap();

        assert_eq!(status_of(request).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_public_book_routes_skip_api_key() {
        let book_id = Uuid::new_v4();

        for uri in [
            format!("/api/books/{}", book_id),
            format!("/api/books/{}/images", book_id),
        ] {
            let request = Request::get(uri.as_str()).body(Body::empty()).unwrap();
            assert_ne!(status_of(request).await, StatusCode::UNAUTHORIZED, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_sitemap_is_mounted_outside_api_without_key() {
        let request = Request::get("/sitemap.xml").body(Body::empty()).unwrap();
        let status = status_of(request).await;

        assert_ne!(status, StatusCode::UNAUTHORIZED);
        assert_ne!(status, StatusCode::NOT_FOUND);
    }
}
