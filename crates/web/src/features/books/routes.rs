use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use super::handlers::{
    add_image, create_book, delete_book, get_book, list_books, list_images, remove_image,
    reorder_images,
};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_book))
        .route("/:book_id", delete(delete_book))
        .route("/:book_id/images", post(add_image))
        .route("/:book_id/images/order", put(reorder_images))
        .route("/:book_id/images/:image_id", delete(remove_image))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_books))
        .route("/:book_id", get(get_book))
        .route("/:book_id/images", get(list_images))
        .merge(protected)
}
