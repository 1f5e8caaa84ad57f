//! Configuration error types
//!
//! Raised when an adapter cannot be constructed: unknown backend tags,
//! provider maps that fail their schema, or settings that do not parse.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Unsupported storage type: {0}")]
    UnknownStorageType(String),

    #[error("Invalid storage configuration: {0}")]
    InvalidProviderConfig(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid setting {name}: {message}")]
    InvalidSetting { name: String, message: String },
}
