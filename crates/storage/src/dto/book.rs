use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Benefit, Book, BookImage, Category};

/// Response containing basic book information
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookResponse {
    pub book_id: Uuid,
    pub title: String,
    pub author: String,
    pub description: String,
    pub price: Decimal,
    pub sponsored: bool,
    pub book_link: Option<String>,
    pub status: String,
    pub images: Vec<String>,
    pub created_at: NaiveDateTime,
}

/// Book detail page payload with its relations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookDetailResponse {
    #[serde(flatten)]
    pub book: BookResponse,
    pub categories: Vec<Category>,
    pub benefits: Vec<Benefit>,
    /// Ordered by `order_index`, cover first
    pub gallery: Vec<BookImage>,
}

/// Query string for the public book listing
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookListParams {
    /// Category name, exact match
    pub category: Option<String>,
    /// Benefit label, exact match
    pub benefit: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    24
}

impl BookListParams {
    pub fn pagination(&self) -> super::common::PaginationParams {
        super::common::PaginationParams {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Request payload for submitting a single book
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateBookRequest {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,

    #[validate(length(
        min = 10,
        message = "Description must be at least 10 characters"
    ))]
    pub description: String,

    #[validate(length(min = 1, max = 255, message = "Author is required"))]
    pub author: String,

    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,

    #[validate(length(min = 1, max = 255, message = "Category is required"))]
    pub category: String,

    #[validate(custom(function = "validate_benefit"))]
    pub benefit: String,

    #[validate(url(message = "Must be a valid URL"))]
    pub book_link: Option<String>,

    #[validate(length(min = 1, message = "At least one image is required"))]
    pub images: Vec<String>,
}

fn validate_price(price: &Decimal) -> Result<(), validator::ValidationError> {
    if price.is_sign_negative() {
        return Err(validator::ValidationError::new("negative_price"));
    }
    Ok(())
}

fn validate_benefit(benefit: &str) -> Result<(), validator::ValidationError> {
    if Benefit::is_known_name(benefit) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_benefit"))
    }
}

impl CreateBookRequest {
    /// Form fields left blank arrive as empty strings.
    pub fn normalized(mut self) -> Self {
        self.book_link = self
            .book_link
            .map(|link| link.trim().to_string())
            .filter(|link| !link.is_empty());
        self.images = self
            .images
            .into_iter()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect();
        self
    }
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            book_id: book.book_id,
            title: book.title,
            author: book.author,
            description: book.description,
            price: book.price,
            sponsored: book.sponsored,
            book_link: book.book_link,
            status: book.status,
            images: book.images,
            created_at: book.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateBookRequest {
        CreateBookRequest {
            title: "The Feelings Book".to_string(),
            description: "A gentle tour of big emotions.".to_string(),
            author: "Todd Parr".to_string(),
            price: Decimal::new(1299, 2),
            category: "Picture Books".to_string(),
            benefit: "Emotional Intelligence".to_string(),
            book_link: Some("https://example.com/feelings".to_string()),
            images: vec!["https://example.com/cover.jpg".to_string()],
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_short_description_rejected() {
        let mut req = valid_request();
        req.description = "Too short".to_string();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("description"));
    }

    #[test]
    fn test_unknown_benefit_rejected() {
        let mut req = valid_request();
        req.benefit = "Cooking".to_string();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("benefit"));
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut req = valid_request();
        req.price = Decimal::new(-1, 0);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_blank_link_and_images_normalized() {
        let mut req = valid_request();
        req.book_link = Some("  ".to_string());
        req.images = vec![" https://example.com/a.jpg ".to_string(), "".to_string()];

        let req = req.normalized();
        assert_eq!(req.book_link, None);
        assert_eq!(req.images, vec!["https://example.com/a.jpg".to_string()]);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_invalid_link_rejected() {
        let mut req = valid_request();
        req.book_link = Some("not a url".to_string());
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("book_link"));
    }

    #[test]
    fn test_price_deserializes_from_json_number() {
        let req: CreateBookRequest = serde_json::from_value(serde_json::json!({
            "title": "Title",
            "description": "Long enough description",
            "author": "Author",
            "price": 9.99,
            "category": "Bedtime",
            "benefit": "Social Skills",
            "book_link": null,
            "images": ["https://example.com/x.png"]
        }))
        .unwrap();
        assert_eq!(req.price, Decimal::new(999, 2));
    }
}
