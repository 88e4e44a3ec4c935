use sqlx::PgPool;
use storage::{
    dto::book::{BookDetailResponse, BookListParams, CreateBookRequest},
    error::Result,
    models::{Book, BookImage},
    repository::{book::BookRepository, image::BookImageRepository},
};
use uuid::Uuid;

/// List published books matching the filters, with the total count
pub async fn list_books(pool: &PgPool, params: &BookListParams) -> Result<(Vec<Book>, i64)> {
    let repo = BookRepository::new(pool);
    repo.list(params).await
}

/// Get book with categories, benefits and images
pub async fn get_book_detailed(pool: &PgPool, book_id: Uuid) -> Result<BookDetailResponse> {
    let repo = BookRepository::new(pool);
    repo.find_detailed(book_id).await
}

/// Create a submitted book
pub async fn create_book(pool: &PgPool, request: &CreateBookRequest) -> Result<Book> {
    let repo = BookRepository::new(pool);
    repo.create_submission(request).await
}

/// Delete a book
pub async fn delete_book(pool: &PgPool, book_id: Uuid) -> Result<()> {
    let repo = BookRepository::new(pool);
    repo.delete(book_id).await
}

pub async fn list_images(pool: &PgPool, book_id: Uuid) -> Result<Vec<BookImage>> {
    let books = BookRepository::new(pool);
    books.find_by_id(book_id).await?;

    BookImageRepository::new(pool).list_for_book(book_id).await
}

pub async fn add_image(pool: &PgPool, book_id: Uuid, url: &str) -> Result<BookImage> {
    BookImageRepository::new(pool).append(book_id, url).await
}

pub async fn remove_image(pool: &PgPool, book_id: Uuid, image_id: Uuid) -> Result<()> {
    BookImageRepository::new(pool).remove(book_id, image_id).await
}

pub async fn reorder_images(
    pool: &PgPool,
    book_id: Uuid,
    image_ids: &[Uuid],
) -> Result<Vec<BookImage>> {
    BookRepository::new(pool).find_by_id(book_id).await?;

    BookImageRepository::new(pool)
        .reorder(book_id, image_ids)
        .await
}
