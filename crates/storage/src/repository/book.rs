use chrono::NaiveDateTime;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::book::{BookDetailResponse, BookListParams, BookResponse, CreateBookRequest};
use crate::error::{Result, StorageError};
use crate::models::{Book, BookStatus, NewBook};
use crate::repository::benefit::BenefitRepository;
use crate::repository::category::CategoryRepository;
use crate::repository::image::BookImageRepository;

const BOOK_COLUMNS: &str = "book_id, title, author, description, price, sponsored, book_link, \
                            status, images, created_at, updated_at";

pub struct BookRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BookRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List visible books, optionally filtered by category and benefit name.
    /// Returns the page and the total number of matching books.
    pub async fn list(&self, params: &BookListParams) -> Result<(Vec<Book>, i64)> {
        let pagination = params.pagination();

        let books = sqlx::query_as::<_, Book>(&format!(
            r#"
            SELECT {BOOK_COLUMNS}
            FROM books b
            WHERE b.status <> 'Draft'
              AND ($1::text IS NULL OR EXISTS (
                    SELECT 1 FROM book_categories bc
                    JOIN categories c ON c.category_id = bc.category_id
                    WHERE bc.book_id = b.book_id AND c.name = $1))
              AND ($2::text IS NULL OR EXISTS (
                    SELECT 1 FROM book_benefits bb
                    JOIN benefits be ON be.benefit_id = bb.benefit_id
                    WHERE bb.book_id = b.book_id AND be.name::text = $2))
            ORDER BY b.sponsored DESC, b.created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(params.category.as_deref())
        .bind(params.benefit.as_deref())
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM books b
            WHERE b.status <> 'Draft'
              AND ($1::text IS NULL OR EXISTS (
                    SELECT 1 FROM book_categories bc
                    JOIN categories c ON c.category_id = bc.category_id
                    WHERE bc.book_id = b.book_id AND c.name = $1))
              AND ($2::text IS NULL OR EXISTS (
                    SELECT 1 FROM book_benefits bb
                    JOIN benefits be ON be.benefit_id = bb.benefit_id
                    WHERE bb.book_id = b.book_id AND be.name::text = $2))
            "#,
        )
        .bind(params.category.as_deref())
        .bind(params.benefit.as_deref())
        .fetch_one(self.pool)
        .await?;

        Ok((books, total))
    }

    /// Find book by ID
    /// IDs and last update of every visible book, newest change first.
    pub async fn list_published_stamps(&self) -> Result<Vec<(Uuid, NaiveDateTime)>> {
        let stamps = sqlx::query_as::<_, (Uuid, NaiveDateTime)>(
            "SELECT book_id, updated_at FROM books WHERE status <> 'Draft' ORDER BY updated_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(stamps)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Book> {
        sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE book_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Get the book with categories, benefits and ordered images
    pub async fn find_detailed(&self, id: Uuid) -> Result<BookDetailResponse> {
        let book = self.find_by_id(id).await?;

        let categories = CategoryRepository::new(self.pool).list_for_book(id).await?;
        let benefits = BenefitRepository::new(self.pool).list_for_book(id).await?;
        let gallery = BookImageRepository::new(self.pool).list_for_book(id).await?;

        Ok(BookDetailResponse {
            book: BookResponse::from(book),
            categories,
            benefits,
            gallery,
        })
    }

    /// Insert a single book row and return it with its generated ID
    pub async fn create(&self, book: &NewBook) -> Result<Book> {
        let created = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author, description, price, sponsored, book_link, status, images)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {BOOK_COLUMNS}
            "#
        ))
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.description)
        .bind(book.price)
        .bind(book.sponsored)
        .bind(book.book_link.as_deref())
        .bind(book.status.as_str())
        .bind(&book.images)
        .fetch_one(self.pool)
        .await
        .map_err(|e| title_taken(e, &book.title))?;

        Ok(created)
    }

    /// Create a submitted book together with its category, benefit and images.
    /// Submissions start as drafts.
    pub async fn create_submission(&self, req: &CreateBookRequest) -> Result<Book> {
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author, description, price, sponsored, book_link, status, images)
            VALUES ($1, $2, $3, $4, FALSE, $5, $6, $7)
            RETURNING {BOOK_COLUMNS}
            "#
        ))
        .bind(&req.title)
        .bind(&req.author)
        .bind(&req.description)
        .bind(req.price)
        .bind(req.book_link.as_deref())
        .bind(BookStatus::Draft.as_str())
        .bind(&req.images)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| title_taken(e, &req.title))?;

        let category_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO categories (name) VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING category_id
            "#,
        )
        .bind(&req.category)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO book_categories (book_id, category_id) VALUES ($1, $2)")
            .bind(book.book_id)
            .bind(category_id)
            .execute(&mut *tx)
            .await?;

        let linked = sqlx::query(
            r#"
            INSERT INTO book_benefits (book_id, benefit_id)
            SELECT $1, benefit_id FROM benefits WHERE name::text = $2
            "#,
        )
        .bind(book.book_id)
        .bind(&req.benefit)
        .execute(&mut *tx)
        .await?;

        if linked.rows_affected() == 0 {
            return Err(StorageError::ConstraintViolation(format!(
                "Unknown benefit: {}",
                req.benefit
            )));
        }

        for (idx, url) in req.images.iter().enumerate() {
            sqlx::query("INSERT INTO book_images (book_id, url, order_index) VALUES ($1, $2, $3)")
                .bind(book.book_id)
                .bind(url)
                .bind(idx as i32)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(book)
    }

    /// Delete a book by ID, relations cascade
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM books WHERE book_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

fn title_taken(error: sqlx::Error, title: &str) -> StorageError {
    StorageError::from(error).describe_violation(
        &format!("A book titled '{}' already exists", title),
        "Referenced record does not exist",
    )
}
