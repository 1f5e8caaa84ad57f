//! Mediaport Core Library
//!
//! This crate provides the shared data model, storage type tags, manager and
//! provider configuration, the static catalogs, and destination path synthesis
//! used by every other Mediaport component.

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod paths;
pub mod storage_types;

// Re-export commonly used types
pub use catalog::{
    validate_provider_config, ConfigValidation, NameRuleInfo, OutputFormatInfo, ProviderSchema,
    NAME_RULES, OUTPUT_FORMATS, SUPPORTED_STORAGES,
};
pub use config::{
    default_settings, provider_config_from_env, CompressionConfig, ManagerConfig, NameRule,
    OutputFormat, ProviderConfig,
};
pub use error::ConfigError;
pub use models::{ConnectionStatus, StoredObject, UploadResult, UploadableFile};
pub use paths::PathGenerator;
pub use storage_types::StorageType;
