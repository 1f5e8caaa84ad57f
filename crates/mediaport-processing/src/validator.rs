use std::collections::BTreeSet;

use mediaport_core::{ManagerConfig, UploadableFile};

/// Validation errors for files offered for upload
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("File size exceeds the {limit_mb}MB limit")]
    FileTooLarge { size_bytes: u64, limit_mb: f64 },

    #[error("Unsupported file format")]
    UnsupportedType { mime_type: String },
}

/// Media file validator
///
/// Checks the decimal-megabyte size limit first, then the mime allow-list.
#[derive(Debug, Clone)]
pub struct MediaValidator {
    max_file_size_mb: f64,
    allowed_types: BTreeSet<String>,
}

impl MediaValidator {
    pub fn new(max_file_size_mb: f64, allowed_types: impl IntoIterator<Item = String>) -> Self {
        Self {
            max_file_size_mb,
            allowed_types: allowed_types
                .into_iter()
                .map(|t| t.trim().to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &ManagerConfig) -> Self {
        Self::new(config.max_file_size_mb, config.allowed_types.iter().cloned())
    }

    /// Validate file size (1 MB = 1,000,000 bytes)
    pub fn validate_file_size(&self, size_bytes: u64) -> Result<(), ValidationError> {
        if size_bytes as f64 / 1e6 > self.max_file_size_mb {
            return Err(ValidationError::FileTooLarge {
                size_bytes,
                limit_mb: self.max_file_size_mb,
            });
        }
        Ok(())
    }

    /// Validate content type against the allow-list
    pub fn validate_content_type(&self, mime_type: &str) -> Result<(), ValidationError> {
        let normalized = mime_type.trim().to_lowercase();
        if !self.allowed_types.contains(&normalized) {
            return Err(ValidationError::UnsupportedType {
                mime_type: mime_type.to_string(),
            });
        }
        Ok(())
    }

    pub fn validate(&self, file: &UploadableFile) -> Result<(), ValidationError> {
        self.validate_file_size(file.size_bytes)?;
        self.validate_content_type(&file.mime_type)?;
        Ok(())
    }
}
