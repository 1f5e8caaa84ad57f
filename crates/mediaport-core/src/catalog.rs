//! Static catalogs and provider-config validation
//!
//! The naming-rule, output-format and supported-storage tables are immutable
//! `'static` data, so callers can hand them around freely without copying.

use serde::Serialize;

use crate::config::{NameRule, OutputFormat, ProviderConfig};
use crate::storage_types::StorageType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NameRuleInfo {
    pub rule: NameRule,
    pub label: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutputFormatInfo {
    pub format: OutputFormat,
    pub label: &'static str,
}

/// Required and optional configuration fields of one storage provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProviderSchema {
    pub kind: StorageType,
    pub name: &'static str,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

pub static NAME_RULES: &[NameRuleInfo] = &[
    NameRuleInfo {
        rule: NameRule::Original,
        label: "Original name",
        description: "Sanitized original file name",
    },
    NameRuleInfo {
        rule: NameRule::Timestamp,
        label: "Timestamp",
        description: "Upload time in epoch milliseconds",
    },
    NameRuleInfo {
        rule: NameRule::Random,
        label: "Random",
        description: "8-character lowercase alphanumeric token",
    },
];

pub static OUTPUT_FORMATS: &[OutputFormatInfo] = &[
    OutputFormatInfo {
        format: OutputFormat::Original,
        label: "Keep original format",
    },
    OutputFormatInfo {
        format: OutputFormat::Jpeg,
        label: "JPEG",
    },
    OutputFormatInfo {
        format: OutputFormat::Png,
        label: "PNG",
    },
    OutputFormatInfo {
        format: OutputFormat::Webp,
        label: "WebP",
    },
];

pub static SUPPORTED_STORAGES: &[ProviderSchema] = &[
    ProviderSchema {
        kind: StorageType::S3,
        name: "Amazon S3 / S3-compatible",
        required: &["accessKeyId", "secretAccessKey", "bucket", "region"],
        optional: &["endpoint", "customDomain"],
    },
    ProviderSchema {
        kind: StorageType::Oss,
        name: "Aliyun OSS",
        required: &["accessKeyId", "accessKeySecret", "bucket", "region"],
        optional: &["customDomain"],
    },
    ProviderSchema {
        kind: StorageType::Cos,
        name: "Tencent COS",
        required: &["secretId", "secretKey", "bucket", "region"],
        optional: &["customDomain"],
    },
    ProviderSchema {
        kind: StorageType::Telegram,
        name: "Telegram",
        required: &["botToken", "chatId"],
        optional: &["proxyDomain"],
    },
];

impl ProviderSchema {
    pub fn for_type(kind: StorageType) -> &'static ProviderSchema {
        // SUPPORTED_STORAGES lists every StorageType variant in declaration order
        &SUPPORTED_STORAGES[kind as usize]
    }
}

/// Result of checking a provider map against its schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigValidation {
    pub is_valid: bool,
    pub message: String,
}

impl ConfigValidation {
    fn valid(message: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            message: message.into(),
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
        }
    }
}

/// Validate a provider map for the given type tag.
///
/// An empty map is valid (not configured yet). A map with some but not all
/// required fields is invalid, and so is any unrecognized type tag.
pub fn validate_provider_config(type_tag: &str, config: &ProviderConfig) -> ConfigValidation {
    let kind: StorageType = match type_tag.parse() {
        Ok(kind) => kind,
        Err(_) => return ConfigValidation::invalid(format!("Unsupported storage type: {}", type_tag)),
    };

    let schema = ProviderSchema::for_type(kind);
    let present = |field: &str| {
        config
            .get(field)
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false)
    };

    let filled = schema
        .required
        .iter()
        .filter(|field| present(field))
        .count();

    if filled == 0 {
        ConfigValidation::valid(format!("{} is not configured", schema.name))
    } else if filled < schema.required.len() {
        ConfigValidation::invalid("Please fill in all required fields or clear them all")
    } else {
        ConfigValidation::valid("Configuration is complete")
    }
}

/// True when every required field of the provider has a non-blank value.
pub fn is_fully_configured(kind: StorageType, config: &ProviderConfig) -> bool {
    ProviderSchema::for_type(kind)
        .required
        .iter()
        .all(|field| config.get(*field).map(|v| !v.trim().is_empty()).unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pairs: &[(&str, &str)]) -> ProviderConfig {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_schema_lookup_matches_kind() {
        for kind in StorageType::ALL {
            assert_eq!(ProviderSchema::for_type(kind).kind, kind);
        }
    }

    #[test]
    fn test_empty_config_is_valid_for_every_known_type() {
        for kind in StorageType::ALL {
            let result = validate_provider_config(kind.as_str(), &ProviderConfig::new());
            assert!(result.is_valid, "{} should accept an empty config", kind);
        }
    }

    #[test]
    fn test_partial_config_is_invalid() {
        let result = validate_provider_config("telegram", &config(&[("botToken", "123:abc")]));
        assert!(!result.is_valid);
        assert!(result.message.contains("fill in all required fields"));

        let result = validate_provider_config(
            "s3",
            &config(&[
                ("accessKeyId", "AK"),
                ("secretAccessKey", "SK"),
                ("bucket", "b"),
            ]),
        );
        assert!(!result.is_valid);
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let result = validate_provider_config(
            "telegram",
            &config(&[("botToken", "123:abc"), ("chatId", "  ")]),
        );
        assert!(!result.is_valid);
    }

    #[test]
    fn test_complete_config_is_valid() {
        let cfg = config(&[("botToken", "123:abc"), ("chatId", "-100")]);
        assert!(validate_provider_config("telegram", &cfg).is_valid);
        assert!(is_fully_configured(StorageType::Telegram, &cfg));
    }

    #[test]
    fn test_unknown_type_is_always_invalid() {
        assert!(!validate_provider_config("dropbox", &ProviderConfig::new()).is_valid);
        let cfg = config(&[("botToken", "123:abc"), ("chatId", "-100")]);
        assert!(!validate_provider_config("dropbox", &cfg).is_valid);
    }

    #[test]
    fn test_optional_fields_alone_do_not_count() {
        let cfg = config(&[("proxyDomain", "tg.example.com")]);
        assert!(validate_provider_config("telegram", &cfg).is_valid);
        assert!(!is_fully_configured(StorageType::Telegram, &cfg));
    }

    #[test]
    fn test_catalogs_cover_all_variants() {
        assert_eq!(NAME_RULES.len(), 3);
        assert_eq!(OUTPUT_FORMATS.len(), 4);
        assert_eq!(SUPPORTED_STORAGES.len(), StorageType::ALL.len());
    }
}
