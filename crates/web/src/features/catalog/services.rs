use sqlx::PgPool;
use storage::{
    error::Result,
    models::{Benefit, Category},
    repository::{benefit::BenefitRepository, category::CategoryRepository},
};

/// List all benefits
pub async fn list_benefits(pool: &PgPool) -> Result<Vec<Benefit>> {
    BenefitRepository::new(pool).list().await
}

/// List all categories
pub async fn list_categories(pool: &PgPool) -> Result<Vec<Category>> {
    CategoryRepository::new(pool).list().await
}
