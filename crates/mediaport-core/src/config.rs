//! Configuration module
//!
//! Manager settings (destination path template, naming rule, accepted types,
//! size limit, compression options) and the string map used to configure a
//! storage provider. Settings can be read from the environment for the CLI.

use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::ProviderSchema;
use crate::error::ConfigError;
use crate::storage_types::StorageType;

const UPLOAD_PATH_TEMPLATE: &str = "{year}/{month}/{day}";
const MAX_FILE_SIZE_MB: f64 = 10.0;
const COMPRESS_QUALITY: u8 = 80;

const DEFAULT_ALLOWED_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/svg+xml",
    "image/x-icon",
    "image/bmp",
    "video/mp4",
    "video/webm",
    "audio/mpeg",
    "audio/wav",
    "audio/ogg",
    "application/pdf",
    "application/zip",
];

/// Backend-specific key/value settings (credentials, bucket, region, ...).
///
/// Keys use the camelCase field names listed in the provider schema.
pub type ProviderConfig = BTreeMap<String, String>;

/// Policy for deriving the destination base file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameRule {
    #[default]
    Original,
    Timestamp,
    Random,
}

impl NameRule {
    pub fn as_str(self) -> &'static str {
        match self {
            NameRule::Original => "original",
            NameRule::Timestamp => "timestamp",
            NameRule::Random => "random",
        }
    }
}

impl FromStr for NameRule {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "original" | "" => Ok(NameRule::Original),
            "timestamp" => Ok(NameRule::Timestamp),
            "random" => Ok(NameRule::Random),
            other => Err(ConfigError::InvalidSetting {
                name: "nameRule".to_string(),
                message: format!("unknown naming rule '{}'", other),
            }),
        }
    }
}

/// Output format for compressed images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Keep the input format
    #[default]
    Original,
    Jpeg,
    Png,
    Webp,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Original => "original",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
        }
    }

    /// MIME type produced by this format, `None` for `Original`.
    pub fn mime_type(self) -> Option<&'static str> {
        match self {
            OutputFormat::Original => None,
            OutputFormat::Jpeg => Some("image/jpeg"),
            OutputFormat::Png => Some("image/png"),
            OutputFormat::Webp => Some("image/webp"),
        }
    }

    pub fn extension(self) -> Option<&'static str> {
        match self {
            OutputFormat::Original => None,
            OutputFormat::Jpeg => Some("jpg"),
            OutputFormat::Png => Some("png"),
            OutputFormat::Webp => Some("webp"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "original" | "" => Ok(OutputFormat::Original),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::Webp),
            other => Err(ConfigError::InvalidSetting {
                name: "outputFormat".to_string(),
                message: format!("unknown output format '{}'", other),
            }),
        }
    }
}

/// Options handed through to the compression collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionConfig {
    pub enabled: bool,
    /// JPEG quality (1-100)
    pub quality: u8,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub output_format: OutputFormat,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            quality: COMPRESS_QUALITY,
            max_width: None,
            max_height: None,
            output_format: OutputFormat::Original,
        }
    }
}

/// File manager settings. Fixed for the lifetime of the adapter built from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerConfig {
    /// Directory template with `{year}`, `{month}` and `{day}` placeholders
    pub upload_path_template: String,
    pub name_rule: NameRule,
    pub allowed_types: BTreeSet<String>,
    pub max_file_size_mb: f64,
    pub compression: CompressionConfig,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            upload_path_template: UPLOAD_PATH_TEMPLATE.to_string(),
            name_rule: NameRule::Original,
            allowed_types: DEFAULT_ALLOWED_TYPES.iter().map(|t| t.to_string()).collect(),
            max_file_size_mb: MAX_FILE_SIZE_MB,
            compression: CompressionConfig::default(),
        }
    }
}

/// The default manager settings, returned by value.
pub fn default_settings() -> ManagerConfig {
    ManagerConfig::default()
}

impl ManagerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = ManagerConfig::default();

        let name_rule = match env::var("MEDIAPORT_NAME_RULE") {
            Ok(v) => v.parse()?,
            Err(_) => defaults.name_rule,
        };

        let allowed_types = env::var("MEDIAPORT_ALLOWED_TYPES")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|t| t.trim().to_lowercase())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.allowed_types);

        let output_format = match env::var("MEDIAPORT_OUTPUT_FORMAT") {
            Ok(v) => v.parse()?,
            Err(_) => OutputFormat::Original,
        };

        let config = ManagerConfig {
            upload_path_template: env::var("MEDIAPORT_UPLOAD_PATH")
                .unwrap_or(defaults.upload_path_template),
            name_rule,
            allowed_types,
            max_file_size_mb: env::var("MEDIAPORT_MAX_FILE_SIZE_MB")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_FILE_SIZE_MB),
            compression: CompressionConfig {
                enabled: env::var("MEDIAPORT_COMPRESS")
                    .unwrap_or_else(|_| "false".to_string())
                    .to_lowercase()
                    .parse()
                    .unwrap_or(false),
                quality: env::var("MEDIAPORT_COMPRESS_QUALITY")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(COMPRESS_QUALITY),
                max_width: env::var("MEDIAPORT_COMPRESS_MAX_WIDTH")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .filter(|&w| w > 0),
                max_height: env::var("MEDIAPORT_COMPRESS_MAX_HEIGHT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .filter(|&h| h > 0),
                output_format,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_file_size_mb.is_nan() || self.max_file_size_mb <= 0.0 {
            return Err(ConfigError::InvalidSetting {
                name: "maxFileSizeMB".to_string(),
                message: "must be a positive number".to_string(),
            });
        }

        if self.compression.quality == 0 || self.compression.quality > 100 {
            return Err(ConfigError::InvalidSetting {
                name: "quality".to_string(),
                message: "must be between 1 and 100".to_string(),
            });
        }

        Ok(())
    }

    /// Copy of these settings with the provider's `uploadPath` / `nameRule`
    /// overrides applied.
    pub fn scoped_to(&self, provider: &ProviderConfig) -> Result<ManagerConfig, ConfigError> {
        let mut scoped = self.clone();
        if let Some(path) = provider.get("uploadPath").filter(|p| !p.trim().is_empty()) {
            scoped.upload_path_template = path.trim().to_string();
        }
        if let Some(rule) = provider.get("nameRule").filter(|r| !r.trim().is_empty()) {
            scoped.name_rule = rule.parse()?;
        }
        Ok(scoped)
    }
}

/// Build a provider map from `MEDIAPORT_<FIELD>` environment variables.
///
/// `botToken` is read from `MEDIAPORT_BOT_TOKEN`, `accessKeyId` from
/// `MEDIAPORT_ACCESS_KEY_ID`, and so on for every schema field.
pub fn provider_config_from_env(kind: StorageType) -> ProviderConfig {
    dotenvy::dotenv().ok();

    let schema = ProviderSchema::for_type(kind);
    schema
        .required
        .iter()
        .chain(schema.optional.iter())
        .chain(["uploadPath", "nameRule"].iter())
        .filter_map(|field| {
            env::var(env_name(field))
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(|v| (field.to_string(), v))
        })
        .collect()
}

fn env_name(field: &str) -> String {
    let mut name = String::from("MEDIAPORT_");
    for c in field.chars() {
        if c.is_ascii_uppercase() {
            name.push('_');
        }
        name.push(c.to_ascii_uppercase());
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = default_settings();
        assert_eq!(config.upload_path_template, "{year}/{month}/{day}");
        assert_eq!(config.name_rule, NameRule::Original);
        assert!(config.allowed_types.contains("image/png"));
        assert!(!config.compression.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_settings_are_independent_copies() {
        let mut first = default_settings();
        first.allowed_types.clear();
        first.max_file_size_mb = 1.0;
        let second = default_settings();
        assert!(!second.allowed_types.is_empty());
        assert_eq!(second.max_file_size_mb, 10.0);
    }

    #[test]
    fn test_validate_rejects_non_positive_size() {
        let config = ManagerConfig {
            max_file_size_mb: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_name_rule_parse() {
        assert_eq!("timestamp".parse::<NameRule>().unwrap(), NameRule::Timestamp);
        assert_eq!("RANDOM".parse::<NameRule>().unwrap(), NameRule::Random);
        assert_eq!("".parse::<NameRule>().unwrap(), NameRule::Original);
        assert!("uuid".parse::<NameRule>().is_err());
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("jpg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::Webp.mime_type(), Some("image/webp"));
        assert_eq!(OutputFormat::Original.extension(), None);
        assert!("tiff".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_scoped_to_applies_overrides() {
        let base = ManagerConfig::default();
        let mut provider = ProviderConfig::new();
        provider.insert("uploadPath".to_string(), "img/{year}".to_string());
        provider.insert("nameRule".to_string(), "random".to_string());

        let scoped = base.scoped_to(&provider).unwrap();
        assert_eq!(scoped.upload_path_template, "img/{year}");
        assert_eq!(scoped.name_rule, NameRule::Random);
        assert_eq!(scoped.max_file_size_mb, base.max_file_size_mb);
    }

    #[test]
    fn test_scoped_to_ignores_blank_overrides() {
        let base = ManagerConfig::default();
        let mut provider = ProviderConfig::new();
        provider.insert("uploadPath".to_string(), "  ".to_string());
        let scoped = base.scoped_to(&provider).unwrap();
        assert_eq!(scoped.upload_path_template, base.upload_path_template);
    }

    #[test]
    fn test_env_name() {
        assert_eq!(env_name("botToken"), "MEDIAPORT_BOT_TOKEN");
        assert_eq!(env_name("accessKeyId"), "MEDIAPORT_ACCESS_KEY_ID");
        assert_eq!(env_name("bucket"), "MEDIAPORT_BUCKET");
    }
}
