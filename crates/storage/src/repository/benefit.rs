use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Benefit, BenefitAssociation};

pub struct BenefitRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BenefitRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Benefit>> {
        let benefits = sqlx::query_as::<_, Benefit>(
            "SELECT benefit_id, name::text AS name, description, created_at FROM benefits ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(benefits)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Benefit>> {
        let benefit = sqlx::query_as::<_, Benefit>(
            r#"
            SELECT benefit_id, name::text AS name, description, created_at
            FROM benefits
            WHERE name::text = $1
            "#,
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(benefit)
    }

    /// Names of the benefits linked to at least one visible book.
    pub async fn list_in_use(&self) -> Result<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT be.name::text AS name
            FROM benefits be
            JOIN book_benefits bb ON bb.benefit_id = be.benefit_id
            JOIN books b ON b.book_id = bb.book_id
            WHERE b.status <> 'Draft'
            ORDER BY name
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(names)
    }

    pub async fn list_for_book(&self, book_id: Uuid) -> Result<Vec<Benefit>> {
        let benefits = sqlx::query_as::<_, Benefit>(
            r#"
            SELECT be.benefit_id, be.name::text AS name, be.description, be.created_at
            FROM benefits be
            JOIN book_benefits bb ON bb.benefit_id = be.benefit_id
            WHERE bb.book_id = $1
            ORDER BY be.name
            "#,
        )
        .bind(book_id)
        .fetch_all(self.pool)
        .await?;

        Ok(benefits)
    }

    /// Insert all associations in one statement; either every row lands or none does.
    pub async fn link_books(&self, associations: &[BenefitAssociation]) -> Result<()> {
        if associations.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO book_benefits (book_id, benefit_id) ");
        builder.push_values(associations, |mut row, assoc| {
            row.push_bind(assoc.book_id).push_bind(assoc.benefit_id);
        });

        builder
            .build()
            .execute(self.pool)
            .await
            .map_err(|e| {
                StorageError::from(e).describe_violation(
                    "Benefit already linked to this book",
                    "Unknown book or benefit id",
                )
            })?;
        Ok(())
    }
}
