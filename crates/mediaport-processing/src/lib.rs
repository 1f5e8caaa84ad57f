//! Mediaport Processing Library
//!
//! This crate prepares files for upload: validation against the manager's
//! size and type limits, optional image compression, and the [`FileManager`]
//! that ties those steps to a storage adapter.

pub mod compression;
pub mod manager;
pub mod validator;

// Re-export commonly used types
#[cfg(feature = "image")]
pub use compression::ImageCompressor;
pub use compression::{Compressor, NoopCompressor};
pub use manager::{FileManager, ProcessError};
pub use validator::{MediaValidator, ValidationError};
