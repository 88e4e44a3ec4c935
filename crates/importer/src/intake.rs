use std::path::PathBuf;

use crate::{ImporterError, Result};

/// The single file an operator selected for import.
#[derive(Debug, Clone)]
pub enum ImportFile {
    Path(PathBuf),
    Upload { name: String, bytes: Vec<u8> },
}

impl ImportFile {
    pub fn upload(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::Upload {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Upload { name, .. } => name.clone(),
        }
    }

    /// Read the whole file as UTF-8 text.
    pub async fn read_text(&self) -> Result<String> {
        match self {
            Self::Path(path) => {
                let bytes = tokio::fs::read(path).await?;
                into_text(bytes, &self.name())
            }
            Self::Upload { bytes, .. } => into_text(bytes.clone(), &self.name()),
        }
    }
}

fn into_text(bytes: Vec<u8>, name: &str) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|_| ImporterError::ReadError(format!("{} is not a UTF-8 text file", name)))
}
