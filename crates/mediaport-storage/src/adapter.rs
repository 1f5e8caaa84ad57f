//! Closed set of storage adapters.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use async_trait::async_trait;
use mediaport_core::{ConnectionStatus, StorageType, StoredObject, UploadResult, UploadableFile};

#[cfg(feature = "storage-object")]
use crate::providers::{CosStorage, OssStorage, S3Storage};
#[cfg(feature = "storage-telegram")]
use crate::telegram::TelegramStorage;
use crate::traits::{Storage, StorageResult};

/// One constructed adapter. Dispatch is a `match`, so adding a backend means
/// adding a variant here and an arm in the factory.
pub enum StorageAdapter {
    #[cfg(feature = "storage-object")]
    S3(S3Storage),
    #[cfg(feature = "storage-object")]
    Oss(OssStorage),
    #[cfg(feature = "storage-object")]
    Cos(CosStorage),
    #[cfg(feature = "storage-telegram")]
    Telegram(TelegramStorage),
}

macro_rules! dispatch {
    ($self:ident, $adapter:ident => $call:expr) => {
        match $self {
            #[cfg(feature = "storage-object")]
            StorageAdapter::S3($adapter) => $call,
            #[cfg(feature = "storage-object")]
            StorageAdapter::Oss($adapter) => $call,
            #[cfg(feature = "storage-object")]
            StorageAdapter::Cos($adapter) => $call,
            #[cfg(feature = "storage-telegram")]
            StorageAdapter::Telegram($adapter) => $call,
            // No backend features: the enum is uninhabited
            #[cfg(not(any(feature = "storage-object", feature = "storage-telegram")))]
            _ => match *$self {},
        }
    };
}

impl Debug for StorageAdapter {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_tuple("StorageAdapter")
            .field(&self.backend_type())
            .finish()
    }
}

#[async_trait]
impl Storage for StorageAdapter {
    async fn upload(&self, file: &UploadableFile) -> StorageResult<UploadResult> {
        dispatch!(self, adapter => adapter.upload(file).await)
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        dispatch!(self, adapter => adapter.delete(key).await)
    }

    async fn list_objects(&self, prefix: Option<&str>) -> StorageResult<Vec<StoredObject>> {
        dispatch!(self, adapter => adapter.list_objects(prefix).await)
    }

    async fn test_connection(&self) -> ConnectionStatus {
        dispatch!(self, adapter => adapter.test_connection().await)
    }

    fn backend_type(&self) -> StorageType {
        dispatch!(self, adapter => adapter.backend_type())
    }
}
