use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use storage::models::{BookStatus, NewBook};

use crate::{ImporterError, Result};

/// One element of the uploaded array, before any defaults are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub sponsored: Option<bool>,
    #[serde(default)]
    pub amazon_link: Option<String>,
    /// Kept raw: anything other than an array of strings is ignored
    #[serde(default)]
    pub benefits: Option<Value>,
    #[serde(default)]
    pub img_link: Option<String>,
}

/// A record with every default resolved, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRecord {
    pub book: NewBook,
    pub benefits: Vec<String>,
    pub img_link: Option<String>,
}

impl ImportRecord {
    pub fn from_value(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(ImporterError::InvalidRecord(format!(
                "expected a JSON object, found {}",
                json_kind(value)
            )));
        }

        serde_json::from_value(value.clone())
            .map_err(|e| ImporterError::InvalidRecord(e.to_string()))
    }

    /// Title used in diagnostics, even for records that fail to parse.
    pub fn title_of(value: &Value) -> String {
        value
            .get("title")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| "<untitled>".to_string())
    }

    pub fn resolve(self) -> Result<ResolvedRecord> {
        let title = non_blank(self.title)
            .ok_or_else(|| ImporterError::InvalidRecord("title is required".to_string()))?;
        let author = non_blank(self.author)
            .ok_or_else(|| ImporterError::InvalidRecord(format!("'{}' has no author", title)))?;
        let description = non_blank(self.description)
            .or_else(|| non_blank(self.summary))
            .ok_or_else(|| {
                ImporterError::InvalidRecord(format!("'{}' has no description or summary", title))
            })?;

        let benefits = match self.benefits {
            Some(Value::Array(entries)) => entries
                .into_iter()
                .filter_map(|entry| match entry {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };

        let book = NewBook {
            title,
            author,
            description,
            price: self.price.unwrap_or(Decimal::ZERO),
            sponsored: self.sponsored.unwrap_or(false),
            book_link: non_blank(self.amazon_link),
            status: BookStatus::Published,
            images: Vec::new(),
        };

        Ok(ResolvedRecord {
            book,
            benefits,
            img_link: non_blank(self.img_link),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolve(value: Value) -> Result<ResolvedRecord> {
        ImportRecord::from_value(&value)?.resolve()
    }

    #[test]
    fn test_defaults_applied() {
        let resolved = resolve(json!({
            "title": "Where the Wild Things Are",
            "author": "Maurice Sendak",
            "description": "Max sails to the land of the wild things."
        }))
        .unwrap();

        assert_eq!(resolved.book.price, Decimal::ZERO);
        assert!(!resolved.book.sponsored);
        assert_eq!(resolved.book.book_link, None);
        assert_eq!(resolved.book.status, BookStatus::Published);
        assert!(resolved.book.images.is_empty());
        assert!(resolved.benefits.is_empty());
        assert_eq!(resolved.img_link, None);
    }

    #[test]
    fn test_summary_used_when_description_missing_or_empty() {
        let resolved = resolve(json!({
            "title": "Corduroy",
            "author": "Don Freeman",
            "summary": "A bear looks for his button."
        }))
        .unwrap();
        assert_eq!(resolved.book.description, "A bear looks for his button.");

        let resolved = resolve(json!({
            "title": "Corduroy",
            "author": "Don Freeman",
            "description": "",
            "summary": "A bear looks for his button."
        }))
        .unwrap();
        assert_eq!(resolved.book.description, "A bear looks for his button.");
    }

    #[test]
    fn test_provided_fields_kept() {
        let resolved = resolve(json!({
            "title": "Llama Llama Red Pajama",
            "author": "Anna Dewdney",
            "description": "Bedtime worries.",
            "price": 7.99,
            "sponsored": true,
            "amazon_link": "https://amazon.example/llama",
            "benefits": ["Emotional Intelligence", 42, "Social Skills"],
            "img_link": "https://img.example/llama.jpg"
        }))
        .unwrap();

        assert_eq!(resolved.book.price, Decimal::new(799, 2));
        assert!(resolved.book.sponsored);
        assert_eq!(
            resolved.book.book_link.as_deref(),
            Some("https://amazon.example/llama")
        );
        assert_eq!(
            resolved.benefits,
            vec!["Emotional Intelligence".to_string(), "Social Skills".to_string()]
        );
        assert_eq!(
            resolved.img_link.as_deref(),
            Some("https://img.example/llama.jpg")
        );
    }

    #[test]
    fn test_falsy_optionals_treated_as_absent() {
        let resolved = resolve(json!({
            "title": "Frog and Toad",
            "author": "Arnold Lobel",
            "description": "Friendship stories.",
            "price": null,
            "amazon_link": "",
            "img_link": "",
            "benefits": "Social Skills"
        }))
        .unwrap();

        assert_eq!(resolved.book.price, Decimal::ZERO);
        assert_eq!(resolved.book.book_link, None);
        assert_eq!(resolved.img_link, None);
        assert!(resolved.benefits.is_empty());
    }

    #[test]
    fn test_missing_required_fields_rejected() {
        assert!(resolve(json!({ "author": "A", "description": "D" })).is_err());
        assert!(resolve(json!({ "title": "T", "description": "D" })).is_err());
        assert!(resolve(json!({ "title": "T", "author": "A" })).is_err());
        assert!(resolve(json!({ "title": "  ", "author": "A", "description": "D" })).is_err());
    }

    #[test]
    fn test_non_object_record_rejected() {
        let err = ImportRecord::from_value(&json!("just a string")).unwrap_err();
        assert!(err.to_string().contains("a string"));
        assert!(ImportRecord::from_value(&json!(null)).is_err());
    }

    #[test]
    fn test_wrongly_typed_field_rejected() {
        assert!(ImportRecord::from_value(&json!({ "title": 12 })).is_err());
        assert!(ImportRecord::from_value(&json!({ "sponsored": "yes" })).is_err());
    }

    #[test]
    fn test_title_of_for_diagnostics() {
        assert_eq!(ImportRecord::title_of(&json!({ "title": "Madeline" })), "Madeline");
        assert_eq!(ImportRecord::title_of(&json!(7)), "<untitled>");
    }
}
