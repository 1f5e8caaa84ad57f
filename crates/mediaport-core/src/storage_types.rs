use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::ConfigError;

/// Storage backend types
///
/// The closed set of backends an adapter can be constructed for. Dispatch
/// always goes through this tag, never through a free-form name lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    S3,
    Oss,
    Cos,
    Telegram,
}

impl StorageType {
    pub const ALL: [StorageType; 4] = [
        StorageType::S3,
        StorageType::Oss,
        StorageType::Cos,
        StorageType::Telegram,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StorageType::S3 => "s3",
            StorageType::Oss => "oss",
            StorageType::Cos => "cos",
            StorageType::Telegram => "telegram",
        }
    }

    /// Human-readable provider name
    pub fn display_name(self) -> &'static str {
        match self {
            StorageType::S3 => "Amazon S3 / S3-compatible",
            StorageType::Oss => "Aliyun OSS",
            StorageType::Cos => "Tencent COS",
            StorageType::Telegram => "Telegram",
        }
    }
}

impl FromStr for StorageType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s3" => Ok(StorageType::S3),
            "oss" => Ok(StorageType::Oss),
            "cos" => Ok(StorageType::Cos),
            "telegram" => Ok(StorageType::Telegram),
            _ => Err(ConfigError::UnknownStorageType(s.to_string())),
        }
    }
}

impl Display for StorageType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
