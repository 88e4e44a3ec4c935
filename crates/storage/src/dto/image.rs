use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request payload for attaching an already-hosted image to a book
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddImageRequest {
    #[validate(url(message = "Image must be a valid URL"))]
    #[validate(length(max = 2048))]
    pub url: String,
}

/// New display order for a book's images, first entry becomes the cover
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReorderImagesRequest {
    #[validate(length(min = 1, message = "At least one image id is required"))]
    pub image_ids: Vec<Uuid>,
}
