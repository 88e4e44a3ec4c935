use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        book::{BookDetailResponse, BookListParams, BookResponse, CreateBookRequest},
        common::PaginatedResponse,
        image::{AddImageRequest, ReorderImagesRequest},
    },
    models::BookImage,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/books",
    params(BookListParams),
    responses(
        (status = 200, description = "Published books, sponsored first", body = PaginatedResponse<BookResponse>),
        (status = 400, description = "Invalid pagination")
    ),
    tag = "books"
)]
pub async fn list_books(
    State(db): State<Database>,
    Query(params): Query<BookListParams>,
) -> Result<Response, WebError> {
    let pagination = params.pagination();
    pagination.validate().map_err(WebError::BadRequest)?;

    let (books, total) = services::list_books(db.pool(), &params).await?;
    let data: Vec<BookResponse> = books.into_iter().map(BookResponse::from).collect();

    Ok(Json(PaginatedResponse::new(
        data,
        pagination.page,
        pagination.page_size,
        total,
    ))
    .into_response())
}

#[utoipa::path(
    get,
    path = "/api/books/{book_id}",
    params(
        ("book_id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book with categories, benefits and images", body = BookDetailResponse),
        (status = 404, description = "Book not found")
    ),
    tag = "books"
)]
pub async fn get_book(
    State(db): State<Database>,
    Path(book_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let book = services::get_book_detailed(db.pool(), book_id).await?;

    Ok(Json(book).into_response())
}

#[utoipa::path(
    post,
    path = "/api/books",
    request_body = CreateBookRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Book submitted as draft", body = BookResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "A book with this title already exists")
    ),
    tag = "books"
)]
pub async fn create_book(
    State(db): State<Database>,
    Json(req): Json<CreateBookRequest>,
) -> Result<Response, WebError> {
    let req = req.normalized();
    req.validate()?;

    let book = services::create_book(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(BookResponse::from(book))).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/books/{book_id}",
    params(
        ("book_id" = Uuid, Path, description = "Book ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Book not found")
    ),
    tag = "books"
)]
pub async fn delete_book(
    State(db): State<Database>,
    Path(book_id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_book(db.pool(), book_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    get,
    path = "/api/books/{book_id}/images",
    params(
        ("book_id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Images in display order", body = Vec<BookImage>),
        (status = 404, description = "Book not found")
    ),
    tag = "images"
)]
pub async fn list_images(
    State(db): State<Database>,
    Path(book_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let images = services::list_images(db.pool(), book_id).await?;

    Ok(Json(images).into_response())
}

#[utoipa::path(
    post,
    path = "/api/books/{book_id}/images",
    params(
        ("book_id" = Uuid, Path, description = "Book ID")
    ),
    request_body = AddImageRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Image appended after the existing ones", body = BookImage),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Book not found")
    ),
    tag = "images"
)]
pub async fn add_image(
    State(db): State<Database>,
    Path(book_id): Path<Uuid>,
    Json(req): Json<AddImageRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let image = services::add_image(db.pool(), book_id, &req.url).await?;

    Ok((StatusCode::CREATED, Json(image)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/books/{book_id}/images/{image_id}",
    params(
        ("book_id" = Uuid, Path, description = "Book ID"),
        ("image_id" = Uuid, Path, description = "Image ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Image removed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Image not found")
    ),
    tag = "images"
)]
pub async fn remove_image(
    State(db): State<Database>,
    Path((book_id, image_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, WebError> {
    services::remove_image(db.pool(), book_id, image_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    put,
    path = "/api/books/{book_id}/images/order",
    params(
        ("book_id" = Uuid, Path, description = "Book ID")
    ),
    request_body = ReorderImagesRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Images in their new order", body = Vec<BookImage>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Image list does not match the book's images")
    ),
    tag = "images"
)]
pub async fn reorder_images(
    State(db): State<Database>,
    Path(book_id): Path<Uuid>,
    Json(req): Json<ReorderImagesRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let images = services::reorder_images(db.pool(), book_id, &req.image_ids).await?;

    Ok(Json(images).into_response())
}
