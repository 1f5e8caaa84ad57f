//! File manager: validation, compression and adapter construction.

use std::sync::Arc;

use mediaport_core::{
    ConfigError, ManagerConfig, NameRuleInfo, OutputFormatInfo, PathGenerator, ProviderConfig,
    ProviderSchema, UploadResult, UploadableFile, NAME_RULES, OUTPUT_FORMATS, SUPPORTED_STORAGES,
};
use mediaport_storage::{create_storage, IndexStore, Storage, StorageAdapter, StorageError};
use thiserror::Error;

#[cfg(feature = "image")]
use crate::compression::ImageCompressor;
use crate::compression::{Compressor, NoopCompressor};
use crate::validator::{MediaValidator, ValidationError};

/// Failure of a file-manager operation. Always renders as one line.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Compression failed: {0}")]
    Compression(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ProcessError {
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Prepares files for upload and builds adapters that share its settings.
pub struct FileManager {
    config: ManagerConfig,
    validator: MediaValidator,
    paths: PathGenerator,
    compressor: Arc<dyn Compressor>,
    index_store: Arc<dyn IndexStore>,
}

impl FileManager {
    /// Create a manager. The compressor is chosen from `config.compression`.
    pub fn new(config: ManagerConfig, index_store: Arc<dyn IndexStore>) -> Result<Self, ConfigError> {
        config.validate()?;
        let compressor = Self::default_compressor(&config);
        Ok(Self {
            validator: MediaValidator::from_config(&config),
            paths: PathGenerator::from_config(&config),
            compressor,
            index_store,
            config,
        })
    }

    /// Replace the compression collaborator.
    pub fn with_compressor(mut self, compressor: Arc<dyn Compressor>) -> Self {
        self.compressor = compressor;
        self
    }

    #[cfg(feature = "image")]
    fn default_compressor(config: &ManagerConfig) -> Arc<dyn Compressor> {
        if config.compression.enabled {
            Arc::new(ImageCompressor::new(config.compression.clone()))
        } else {
            Arc::new(NoopCompressor)
        }
    }

    #[cfg(not(feature = "image"))]
    fn default_compressor(config: &ManagerConfig) -> Arc<dyn Compressor> {
        if config.compression.enabled {
            tracing::warn!("Compression requested but the image feature is disabled");
        }
        Arc::new(NoopCompressor)
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Check size (decimal MB) and then mime type against the allow-list.
    pub fn validate_file(&self, file: &UploadableFile) -> Result<(), ValidationError> {
        self.validator.validate(file)
    }

    /// Validate and, for images, compress. Non-images come back unchanged.
    pub async fn process_file(&self, file: UploadableFile) -> Result<UploadableFile, ProcessError> {
        self.validate_file(&file)?;

        if !file.is_image() {
            return Ok(file);
        }

        self.compressor.compress(file).await.map_err(|e| {
            tracing::warn!(error = %e, "Image compression failed");
            ProcessError::Compression(format!("{:#}", e))
        })
    }

    /// Destination key for `filename` using the current date.
    pub fn generate_path(&self, filename: &str) -> String {
        self.paths.generate_path(filename)
    }

    /// Build an adapter for `type_tag`.
    ///
    /// `uploadPath` and `nameRule` entries in `config` override this manager's
    /// path settings for the adapter being built.
    pub fn create_storage(
        &self,
        type_tag: &str,
        config: &ProviderConfig,
    ) -> Result<StorageAdapter, StorageError> {
        let scoped = self.config.scoped_to(config)?;
        create_storage(
            type_tag,
            config,
            PathGenerator::from_config(&scoped),
            self.index_store.clone(),
        )
    }

    /// Process `file` and upload the result. Nothing is uploaded when
    /// validation or compression fails.
    pub async fn upload_file(
        &self,
        storage: &dyn Storage,
        file: UploadableFile,
    ) -> Result<UploadResult, ProcessError> {
        let prepared = self.process_file(file).await?;
        let result = storage.upload(&prepared).await?;
        Ok(result)
    }

    pub fn default_settings() -> ManagerConfig {
        mediaport_core::default_settings()
    }

    pub fn name_rules() -> &'static [NameRuleInfo] {
        NAME_RULES
    }

    pub fn output_formats() -> &'static [OutputFormatInfo] {
        OUTPUT_FORMATS
    }

    pub fn supported_storages() -> &'static [ProviderSchema] {
        SUPPORTED_STORAGES
    }
}
