use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookImage {
    pub image_id: Uuid,
    pub book_id: Uuid,
    pub url: String,
    pub order_index: i32,
    pub created_at: chrono::NaiveDateTime,
}

/// Row to be written into `book_benefits`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenefitAssociation {
    pub book_id: Uuid,
    pub benefit_id: Uuid,
}

/// Row to be written into `book_images`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAssociation {
    pub book_id: Uuid,
    pub url: String,
    pub order_index: i32,
}

impl ImageAssociation {
    /// Cover image, placed first.
    pub fn cover(book_id: Uuid, url: impl Into<String>) -> Self {
        Self {
            book_id,
            url: url.into(),
            order_index: 0,
        }
    }
}
