use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Labels accepted by the `book_benefit` enum in the database.
pub const BENEFIT_NAMES: &[&str] = &[
    "Emotional Intelligence",
    "Problem Solving",
    "Social Skills",
    "Character Building",
    "Language Development",
];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Benefit {
    pub benefit_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

impl Benefit {
    pub fn is_known_name(name: &str) -> bool {
        BENEFIT_NAMES.contains(&name)
    }
}
