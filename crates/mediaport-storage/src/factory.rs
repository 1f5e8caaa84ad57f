use std::sync::Arc;

use mediaport_core::catalog::{is_fully_configured, ProviderSchema};
use mediaport_core::{validate_provider_config, ConfigError, PathGenerator, ProviderConfig, StorageType};
#[cfg(any(feature = "storage-object", feature = "storage-telegram"))]
use serde::de::DeserializeOwned;

use crate::adapter::StorageAdapter;
use crate::index::IndexStore;
#[cfg(feature = "storage-object")]
use crate::providers::{CosStorage, OssStorage, S3Storage};
#[cfg(feature = "storage-telegram")]
use crate::telegram::TelegramStorage;
use crate::traits::StorageResult;

/// Create a storage adapter for `type_tag` from a provider config map
///
/// The map must pass [`validate_provider_config`] and have every required
/// field filled. Keys are derived with `paths`; backends that keep a local
/// index persist it through `index_store`.
pub fn create_storage(
    type_tag: &str,
    config: &ProviderConfig,
    paths: PathGenerator,
    index_store: Arc<dyn IndexStore>,
) -> StorageResult<StorageAdapter> {
    let kind: StorageType = type_tag.parse()?;

    let validation = validate_provider_config(type_tag, config);
    if !validation.is_valid {
        return Err(ConfigError::InvalidProviderConfig(validation.message).into());
    }
    if !is_fully_configured(kind, config) {
        return Err(ConfigError::InvalidProviderConfig(format!(
            "{} is not configured",
            ProviderSchema::for_type(kind).name
        ))
        .into());
    }

    tracing::debug!(storage_type = %kind, "Creating storage adapter");

    match kind {
        #[cfg(feature = "storage-object")]
        StorageType::S3 => Ok(StorageAdapter::S3(S3Storage::new(parse_config(config)?, paths)?)),
        #[cfg(feature = "storage-object")]
        StorageType::Oss => Ok(StorageAdapter::Oss(OssStorage::new(
            parse_config(config)?,
            paths,
        )?)),
        #[cfg(feature = "storage-object")]
        StorageType::Cos => Ok(StorageAdapter::Cos(CosStorage::new(
            parse_config(config)?,
            paths,
        )?)),

        #[cfg(not(feature = "storage-object"))]
        StorageType::S3 | StorageType::Oss | StorageType::Cos => {
            let _ = (paths, index_store);
            Err(ConfigError::InvalidProviderConfig(format!(
                "{} storage not available (storage-object feature not enabled)",
                kind.display_name()
            ))
            .into())
        }

        #[cfg(feature = "storage-telegram")]
        StorageType::Telegram => Ok(StorageAdapter::Telegram(TelegramStorage::new(
            parse_config(config)?,
            paths,
            index_store,
        )?)),

        #[cfg(not(feature = "storage-telegram"))]
        StorageType::Telegram => Err(ConfigError::InvalidProviderConfig(
            "Telegram storage not available (storage-telegram feature not enabled)".to_string(),
        )
        .into()),
    }
}

/// Deserialize the typed config of one backend from the string map.
/// Blank values are dropped so optional fields read as `None`.
#[cfg(any(feature = "storage-object", feature = "storage-telegram"))]
fn parse_config<T: DeserializeOwned>(config: &ProviderConfig) -> Result<T, ConfigError> {
    let cleaned: ProviderConfig = config
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(key, value)| (key.clone(), value.trim().to_string()))
        .collect();

    serde_json::to_value(cleaned)
        .and_then(serde_json::from_value)
        .map_err(|e| ConfigError::InvalidProviderConfig(e.to_string()))
}
