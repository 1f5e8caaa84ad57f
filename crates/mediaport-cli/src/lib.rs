//! Helpers shared by the `mediaport` binary.

use std::path::Path;

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Guess a mime type from a file extension, for files read from disk.
pub fn guess_mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        // Images
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        Some("ico") => "image/x-icon",
        // Videos
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mov") => "video/quicktime",
        // Audio
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("ogg") => "audio/ogg",
        // Documents
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("zip") => "application/zip",
        _ => FALLBACK_MIME_TYPE,
    }
}

/// Initialize tracing for the CLI. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mediaport=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guess_mime_type_known() {
        assert_eq!(guess_mime_type(Path::new("a/b/cat.PNG")), "image/png");
        assert_eq!(guess_mime_type(Path::new("clip.mp4")), "video/mp4");
        assert_eq!(guess_mime_type(Path::new("logo.svg")), "image/svg+xml");
    }

    #[test]
    fn guess_mime_type_fallback() {
        assert_eq!(guess_mime_type(Path::new("LICENSE")), "application/octet-stream");
        assert_eq!(guess_mime_type(Path::new("data.xyz")), "application/octet-stream");
    }
}
