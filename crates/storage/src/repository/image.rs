use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{BookImage, ImageAssociation};

const IMAGE_COLUMNS: &str = "image_id, book_id, url, order_index, created_at";

pub struct BookImageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BookImageRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_book(&self, book_id: Uuid) -> Result<Vec<BookImage>> {
        let images = sqlx::query_as::<_, BookImage>(&format!(
            "SELECT {IMAGE_COLUMNS} FROM book_images WHERE book_id = $1 ORDER BY order_index, created_at"
        ))
        .bind(book_id)
        .fetch_all(self.pool)
        .await?;

        Ok(images)
    }

    /// Insert one image row as given and refresh `books.images`
    pub async fn insert(&self, image: &ImageAssociation) -> Result<BookImage> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, BookImage>(&format!(
            r#"
            INSERT INTO book_images (book_id, url, order_index)
            VALUES ($1, $2, $3)
            RETURNING {IMAGE_COLUMNS}
            "#
        ))
        .bind(image.book_id)
        .bind(&image.url)
        .bind(image.order_index)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            StorageError::from(e).describe_violation("Duplicate image", "Unknown book id")
        })?;

        sync_images_column(image.book_id, &mut tx).await?;
        tx.commit().await?;

        Ok(created)
    }

    /// Add an image after the existing ones and refresh `books.images`
    pub async fn append(&self, book_id: Uuid, url: &str) -> Result<BookImage> {
        let mut tx = self.pool.begin().await?;

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE book_id = $1)")
                .bind(book_id)
                .fetch_one(&mut *tx)
                .await?;
        if !exists {
            return Err(StorageError::NotFound);
        }

        let image = sqlx::query_as::<_, BookImage>(&format!(
            r#"
            INSERT INTO book_images (book_id, url, order_index)
            SELECT $1, $2, COALESCE(MAX(order_index) + 1, 0) FROM book_images WHERE book_id = $1
            RETURNING {IMAGE_COLUMNS}
            "#
        ))
        .bind(book_id)
        .bind(url)
        .fetch_one(&mut *tx)
        .await?;

        sync_images_column(book_id, &mut tx).await?;
        tx.commit().await?;

        Ok(image)
    }

    pub async fn remove(&self, book_id: Uuid, image_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM book_images WHERE book_id = $1 AND image_id = $2")
            .bind(book_id)
            .bind(image_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        sync_images_column(book_id, &mut tx).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Rewrite `order_index` to follow `image_ids`. The list must name every
    /// image of the book exactly once.
    pub async fn reorder(&self, book_id: Uuid, image_ids: &[Uuid]) -> Result<Vec<BookImage>> {
        let current = self.list_for_book(book_id).await?;

        let mut expected: Vec<Uuid> = current.iter().map(|img| img.image_id).collect();
        let mut given = image_ids.to_vec();
        expected.sort();
        given.sort();
        if expected != given {
            return Err(StorageError::ConstraintViolation(
                "image_ids must list every image of the book exactly once".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        for (idx, image_id) in image_ids.iter().enumerate() {
            sqlx::query(
                "UPDATE book_images SET order_index = $3 WHERE book_id = $1 AND image_id = $2",
            )
            .bind(book_id)
            .bind(image_id)
            .bind(idx as i32)
            .execute(&mut *tx)
            .await?;
        }
        sync_images_column(book_id, &mut tx).await?;
        tx.commit().await?;

        self.list_for_book(book_id).await
    }
}

async fn sync_images_column(
    book_id: Uuid,
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE books
        SET images = ARRAY(
                SELECT url FROM book_images WHERE book_id = $1 ORDER BY order_index, created_at
            ),
            updated_at = NOW()
        WHERE book_id = $1
        "#,
    )
    .bind(book_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
