use sqlx::PgPool;
use storage::error::Result;
use storage::models::{BenefitAssociation, ImageAssociation, NewBook};
use storage::repository::benefit::BenefitRepository;
use storage::repository::book::BookRepository;
use storage::repository::image::BookImageRepository;
use uuid::Uuid;

use crate::traits::BookStore;

/// `BookStore` backed by the PostgreSQL repositories.
#[derive(Clone)]
pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl BookStore for PgBookStore {
    async fn insert_book(&self, book: &NewBook) -> Result<Uuid> {
        let created = BookRepository::new(&self.pool).create(book).await?;
        Ok(created.book_id)
    }

    async fn insert_book_benefits(&self, associations: &[BenefitAssociation]) -> Result<()> {
        BenefitRepository::new(&self.pool)
            .link_books(associations)
            .await
    }

    async fn insert_book_image(&self, image: &ImageAssociation) -> Result<()> {
        BookImageRepository::new(&self.pool).insert(image).await?;
        Ok(())
    }

    async fn find_benefit_id(&self, name: &str) -> Result<Option<Uuid>> {
        let benefit = BenefitRepository::new(&self.pool).find_by_name(name).await?;
        Ok(benefit.map(|b| b.benefit_id))
    }

    async fn delete_book(&self, book_id: Uuid) -> Result<()> {
        BookRepository::new(&self.pool).delete(book_id).await
    }
}
