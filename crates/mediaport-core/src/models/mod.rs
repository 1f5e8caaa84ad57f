//! Domain models shared by the file manager and the storage adapters.

pub mod file;
pub mod storage;

pub use file::{extension_of, file_name_of, UploadableFile};
pub use storage::{sort_newest_first, ConnectionStatus, StoredObject, UploadResult};
