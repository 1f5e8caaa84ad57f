//! Result shapes returned by every storage adapter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized result of a successful upload.
///
/// `key` is the canonical path used for later delete and list lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub url: String,
    pub key: String,
    /// Backend file id (Telegram `file_id`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_file_id: Option<String>,
    /// Backend storage path (Telegram `file_path`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_file_path: Option<String>,
}

impl UploadResult {
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key: key.into(),
            remote_file_id: None,
            remote_file_path: None,
        }
    }
}

/// One entry of a `list_objects` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredObject {
    pub key: String,
    pub url: String,
    pub last_modified: DateTime<Utc>,
    pub size_bytes: u64,
}

/// Outcome of a connection test, shared by all adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub ok: bool,
    pub message: String,
}

impl ConnectionStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Sort newest first, the order every `list_objects` result uses.
pub fn sort_newest_first(objects: &mut [StoredObject]) {
    objects.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn object(key: &str, day: u32) -> StoredObject {
        StoredObject {
            key: key.to_string(),
            url: format!("https://example.com/{}", key),
            last_modified: Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
            size_bytes: 1,
        }
    }

    #[test]
    fn test_sort_newest_first() {
        let mut objects = vec![object("a", 1), object("c", 3), object("b", 2)];
        sort_newest_first(&mut objects);
        let keys: Vec<_> = objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_upload_result_serializes_camel_case() {
        let mut result = UploadResult::new("https://x/y.png", "y.png");
        result.remote_file_id = Some("abc".to_string());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["remoteFileId"], "abc");
        assert!(json.get("remoteFilePath").is_none());
    }
}
