use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23505")
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23503")
        )
    }

    /// Replace a unique or foreign key violation with a readable message.
    pub fn describe_violation(self, on_unique: &str, on_foreign_key: &str) -> Self {
        if self.is_unique_violation() {
            StorageError::ConstraintViolation(on_unique.to_string())
        } else if self.is_foreign_key_violation() {
            StorageError::ConstraintViolation(on_foreign_key.to_string())
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_violation_keeps_other_errors() {
        let err = StorageError::NotFound.describe_violation("dup", "missing");
        assert!(matches!(err, StorageError::NotFound));
        assert!(!StorageError::NotFound.is_unique_violation());
    }
}
