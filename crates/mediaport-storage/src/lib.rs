//! Mediaport Storage Library
//!
//! This crate provides the storage contract and its four adapters: Amazon S3
//! (and S3-compatible services), Aliyun OSS, Tencent COS, and a Telegram bot
//! relay that emulates object storage on top of a chat.
//!
//! # Storage key format
//!
//! Keys are produced by [`mediaport_core::PathGenerator`]: the date-expanded
//! upload path template followed by the derived file name, e.g.
//! `2024/03/05/My-Photo.png`. Keys never start or end with `/`.
//!
//! Telegram has no native list or delete, so its adapter keeps a
//! [`LocalIndex`] of everything it uploaded.

pub mod adapter;
pub mod factory;
pub mod index;
#[cfg(feature = "storage-object")]
mod object_client;
#[cfg(feature = "storage-object")]
pub mod providers;
#[cfg(feature = "storage-telegram")]
pub mod telegram;
pub mod traits;

// Re-export commonly used types
pub use adapter::StorageAdapter;
pub use factory::create_storage;
pub use index::{
    FileIndexStore, IndexRecord, IndexStore, LocalIndex, MemoryIndexStore,
    TELEGRAM_INDEX_NAMESPACE,
};
pub use mediaport_core::StorageType;
#[cfg(feature = "storage-object")]
pub use providers::{CosConfig, CosStorage, OssConfig, OssStorage, S3Config, S3Storage};
#[cfg(feature = "storage-telegram")]
pub use telegram::{TelegramConfig, TelegramStorage};
pub use traits::{format_error, Storage, StorageError, StorageResult};
