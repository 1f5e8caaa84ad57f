//! Bot API send method selection.

use mediaport_core::models::extension_of;

/// The Bot API method a file is sent with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendMethod {
    Animation,
    Document,
    Photo,
    Video,
    Audio,
}

impl SendMethod {
    /// Pick the method for a file.
    ///
    /// Priority: animated formats first (`gif`/`webp` extension or
    /// `image/gif`), then image types Telegram would rasterize or reject as a
    /// photo (`svg`, `ico`) go out as documents, then the mime family.
    pub fn select(mime_type: &str, filename: &str) -> Self {
        let mime = mime_type.trim().to_ascii_lowercase();
        let ext = extension_of(filename);

        if matches!(ext.as_deref(), Some("gif") | Some("webp")) || mime == "image/gif" {
            SendMethod::Animation
        } else if mime == "image/svg+xml" || mime == "image/x-icon" {
            SendMethod::Document
        } else if mime.starts_with("image/") {
            SendMethod::Photo
        } else if mime.starts_with("video/") {
            SendMethod::Video
        } else if mime.starts_with("audio/") {
            SendMethod::Audio
        } else {
            SendMethod::Document
        }
    }

    pub fn api_method(&self) -> &'static str {
        match self {
            SendMethod::Animation => "sendAnimation",
            SendMethod::Document => "sendDocument",
            SendMethod::Photo => "sendPhoto",
            SendMethod::Video => "sendVideo",
            SendMethod::Audio => "sendAudio",
        }
    }

    /// Multipart field name carrying the file
    pub fn field_name(&self) -> &'static str {
        match self {
            SendMethod::Animation => "animation",
            SendMethod::Document => "document",
            SendMethod::Photo => "photo",
            SendMethod::Video => "video",
            SendMethod::Audio => "audio",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_by_priority() {
        assert_eq!(SendMethod::select("image/gif", "a.gif"), SendMethod::Animation);
        assert_eq!(SendMethod::select("image/svg+xml", "a.svg"), SendMethod::Document);
        assert_eq!(SendMethod::select("image/png", "a.png"), SendMethod::Photo);
        assert_eq!(SendMethod::select("video/mp4", "a.mp4"), SendMethod::Video);
        assert_eq!(SendMethod::select("application/zip", "a.zip"), SendMethod::Document);
    }

    #[test]
    fn test_extension_beats_mime() {
        assert_eq!(SendMethod::select("image/webp", "sticker.WEBP"), SendMethod::Animation);
        assert_eq!(
            SendMethod::select("application/octet-stream", "loop.gif"),
            SendMethod::Animation
        );
    }

    #[test]
    fn test_icon_and_audio() {
        assert_eq!(SendMethod::select("image/x-icon", "favicon.ico"), SendMethod::Document);
        assert_eq!(SendMethod::select("audio/mpeg", "song.mp3"), SendMethod::Audio);
        assert_eq!(SendMethod::select("", "noext"), SendMethod::Document);
    }

    #[test]
    fn test_dotted_directory_does_not_pick_animation() {
        assert_eq!(SendMethod::select("image/png", "clips.gif/frame"), SendMethod::Photo);
        assert_eq!(SendMethod::select("image/png", "a.webp\\shot.png"), SendMethod::Photo);
    }

    #[test]
    fn test_method_and_field_names() {
        assert_eq!(SendMethod::Photo.api_method(), "sendPhoto");
        assert_eq!(SendMethod::Photo.field_name(), "photo");
        assert_eq!(SendMethod::Animation.api_method(), "sendAnimation");
        assert_eq!(SendMethod::Document.field_name(), "document");
    }
}
