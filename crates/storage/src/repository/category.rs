use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Category;

pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT category_id, name, created_at FROM categories ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Names of the categories that at least one visible book belongs to.
    pub async fn list_in_use(&self) -> Result<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT c.name
            FROM categories c
            JOIN book_categories bc ON bc.category_id = c.category_id
            JOIN books b ON b.book_id = bc.book_id
            WHERE b.status <> 'Draft'
            ORDER BY c.name
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(names)
    }

    pub async fn list_for_book(&self, book_id: Uuid) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT c.category_id, c.name, c.created_at
            FROM categories c
            JOIN book_categories bc ON bc.category_id = c.category_id
            WHERE bc.book_id = $1
            ORDER BY c.name
            "#,
        )
        .bind(book_id)
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }
}
