//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must
//! implement, the shared error type, and the helpers every adapter uses to
//! turn failures into a single user-facing line.

use std::fmt::Display;

use async_trait::async_trait;
use mediaport_core::{ConfigError, ConnectionStatus, StorageType, StoredObject, UploadResult, UploadableFile};
use thiserror::Error;

/// Storage operation errors
///
/// Every variant renders as one human-readable line. Adapters classify
/// transport and protocol failures before wrapping them here, so callers
/// never see raw client errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Listing failed: {0}")]
    ListFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Index error: {0}")]
    IndexError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ConfigError(#[from] ConfigError),
}

impl StorageError {
    /// Single-line message suitable for showing to a user.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn is_config_error(&self) -> bool {
        matches!(self, StorageError::ConfigError(_))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Wrap any failure into a single user-facing message.
pub fn format_error(context: &str, error: impl Display) -> String {
    let detail = error.to_string();
    let detail = detail.trim();
    if detail.is_empty() {
        context.to_string()
    } else {
        format!("{}: {}", context, detail)
    }
}

/// Storage abstraction trait
///
/// All backends (S3, OSS, COS, Telegram) implement this trait. Every call is a
/// single attempt; retrying is left to the caller.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload a file and return its public URL and canonical key
    async fn upload(&self, file: &UploadableFile) -> StorageResult<UploadResult>;

    /// Delete an object by key. Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// List stored objects, newest first, optionally restricted to keys
    /// starting with `prefix`
    async fn list_objects(&self, prefix: Option<&str>) -> StorageResult<Vec<StoredObject>>;

    /// Lightweight credential/reachability check that uploads nothing
    async fn test_connection(&self) -> ConnectionStatus;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageType;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_joins_context() {
        assert_eq!(
            format_error("Connection failed", "403 Forbidden"),
            "Connection failed: 403 Forbidden"
        );
    }

    #[test]
    fn test_format_error_without_detail() {
        assert_eq!(format_error("Connection failed", "  "), "Connection failed");
    }

    #[test]
    fn test_user_message_is_single_line() {
        let err = StorageError::UploadFailed("Invalid or expired bot token".to_string());
        assert_eq!(err.user_message(), "Upload failed: Invalid or expired bot token");
        assert!(!err.user_message().contains('\n'));
    }

    #[test]
    fn test_config_error_passes_through() {
        let err = StorageError::from(ConfigError::UnknownStorageType("ftp".to_string()));
        assert!(err.is_config_error());
        assert_eq!(err.user_message(), "Unsupported storage type: ftp");
    }
}
