use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImporterError>;

#[derive(Error, Debug)]
pub enum ImporterError {
    #[error("Please select a file to upload.")]
    NoFileSelected,

    #[error("Failed to read file: {0}")]
    ReadError(String),

    #[error("Failed to parse JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("JSON file must contain an array of book objects")]
    ShapeError,

    #[error("An import is already in progress")]
    ImportInProgress,

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::error::StorageError),

    #[error("Import error: {0}")]
    ImportError(String),
}

impl ImporterError {
    /// Errors that stop the whole batch before any record is written.
    pub fn is_batch_fatal(&self) -> bool {
        matches!(
            self,
            Self::NoFileSelected
                | Self::ReadError(_)
                | Self::ParseError(_)
                | Self::ShapeError
                | Self::ImportInProgress
        )
    }

    /// Text shown to the operator as the final import status.
    pub fn user_message(&self) -> String {
        match self {
            Self::NoFileSelected => self.to_string(),
            Self::ReadError(detail) => format!("Error reading or parsing file: {}.", detail),
            Self::ParseError(e) => format!(
                "Error reading or parsing file: {}. Please ensure it is a valid JSON.",
                e
            ),
            Self::ShapeError => "Error: JSON file must contain an array of book objects.".to_string(),
            other => format!("Error: {}", other),
        }
    }
}

impl From<std::io::Error> for ImporterError {
    fn from(error: std::io::Error) -> Self {
        Self::ReadError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_error_message() {
        assert_eq!(
            ImporterError::ShapeError.user_message(),
            "Error: JSON file must contain an array of book objects."
        );
    }

    #[test]
    fn test_parse_error_keeps_serde_detail() {
        let err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let detail = err.to_string();
        let message = ImporterError::from(err).user_message();

        assert!(message.starts_with("Error reading or parsing file: "));
        assert!(message.contains(&detail));
    }

    #[test]
    fn test_batch_fatal_classification() {
        assert!(ImporterError::ShapeError.is_batch_fatal());
        assert!(ImporterError::ImportInProgress.is_batch_fatal());
        assert!(!ImporterError::InvalidRecord("x".into()).is_batch_fatal());
    }
}
