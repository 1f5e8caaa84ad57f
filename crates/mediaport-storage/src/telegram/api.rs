//! Bot API response shapes (only the fields the adapter reads).

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

/// One file in a sent message. Photos arrive as several of these, one per resolution.
#[derive(Debug, Clone, Deserialize)]
pub struct FileDescriptor {
    pub file_id: String,
    #[serde(default)]
    pub file_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub photo: Option<Vec<FileDescriptor>>,
    #[serde(default)]
    pub animation: Option<FileDescriptor>,
    #[serde(default)]
    pub video: Option<FileDescriptor>,
    #[serde(default)]
    pub audio: Option<FileDescriptor>,
    #[serde(default)]
    pub document: Option<FileDescriptor>,
}

impl Message {
    /// The file the message carries; for photos, the largest variant.
    pub fn file(&self) -> Option<&FileDescriptor> {
        if let Some(sizes) = &self.photo {
            if let Some(largest) = sizes.iter().max_by_key(|s| s.file_size.unwrap_or(0)) {
                return Some(largest);
            }
        }
        self.animation
            .as_ref()
            .or(self.video.as_ref())
            .or(self.audio.as_ref())
            .or(self.document.as_ref())
    }
}

/// Result of `getFile`.
#[derive(Debug, Deserialize)]
pub struct RemoteFile {
    #[serde(default)]
    pub file_path: Option<String>,
}

/// Result of `getMe`.
#[derive(Debug, Deserialize)]
pub struct BotUser {
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_picks_largest_variant() {
        let message: Message = serde_json::from_str(
            r#"{"message_id":1,"photo":[
                {"file_id":"small","file_size":100},
                {"file_id":"large","file_size":9000},
                {"file_id":"medium","file_size":1200}
            ]}"#,
        )
        .unwrap();
        assert_eq!(message.file().unwrap().file_id, "large");
    }

    #[test]
    fn test_single_descriptor_kinds() {
        let message: Message =
            serde_json::from_str(r#"{"document":{"file_id":"doc","file_size":5}}"#).unwrap();
        assert_eq!(message.file().unwrap().file_id, "doc");

        // Animations are also sent with a document thumbnail; the animation wins
        let message: Message = serde_json::from_str(
            r#"{"animation":{"file_id":"anim"},"document":{"file_id":"doc"}}"#,
        )
        .unwrap();
        assert_eq!(message.file().unwrap().file_id, "anim");
    }

    #[test]
    fn test_message_without_file() {
        let message: Message = serde_json::from_str(r#"{"text":"hello"}"#).unwrap();
        assert!(message.file().is_none());
    }

    #[test]
    fn test_error_response() {
        let response: ApiResponse<Message> = serde_json::from_str(
            r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#,
        )
        .unwrap();
        assert!(!response.ok);
        assert!(response.result.is_none());
        assert_eq!(response.error_code, Some(400));
    }
}
