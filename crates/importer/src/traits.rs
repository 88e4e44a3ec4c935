use storage::error::Result;
use storage::models::{BenefitAssociation, ImageAssociation, NewBook};
use uuid::Uuid;

/// Writes performed by a book import. Each call is atomic only for its own rows.
#[async_trait::async_trait]
pub trait BookStore: Send + Sync {
    /// Insert a book and return its generated ID
    async fn insert_book(&self, book: &NewBook) -> Result<Uuid>;

    async fn insert_book_benefits(&self, associations: &[BenefitAssociation]) -> Result<()>;

    async fn insert_book_image(&self, image: &ImageAssociation) -> Result<()>;

    /// Look up a benefit by its display name
    async fn find_benefit_id(&self, name: &str) -> Result<Option<Uuid>>;

    async fn delete_book(&self, book_id: Uuid) -> Result<()>;
}
