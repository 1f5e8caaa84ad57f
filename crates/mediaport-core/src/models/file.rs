//! Uploadable file model: the binary payload plus the metadata adapters need.

use bytes::Bytes;

/// A file accepted for upload.
///
/// Once constructed the payload and metadata are not mutated; steps that
/// transform a file (compression) produce a new value instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadableFile {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub data: Bytes,
}

impl UploadableFile {
    /// Build a file whose reported size is the payload length.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes: data.len() as u64,
            data,
        }
    }

    /// Lower-cased substring after the final `.` of the name, if any.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.name)
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.trim().to_ascii_lowercase().starts_with("image/")
    }
}

/// The last path component of `name`, splitting on both `/` and `\`.
pub fn file_name_of(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Lower-cased extension of a file name: everything after the last `.` of
/// its final path component.
///
/// Names without a dot, or ending in a dot, have no extension.
pub fn extension_of(name: &str) -> Option<String> {
    let (_, ext) = file_name_of(name).rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sets_size_from_payload() {
        let file = UploadableFile::new("a.png", "image/png", vec![1u8, 2, 3]);
        assert_eq!(file.size_bytes, 3);
        assert!(file.is_image());
    }

    #[test]
    fn test_extension_is_lowercased() {
        assert_eq!(extension_of("Photo.JPEG").as_deref(), Some("jpeg"));
        assert_eq!(extension_of("archive.tar.GZ").as_deref(), Some("gz"));
    }

    #[test]
    fn test_extension_absent() {
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of("trailing."), None);
    }

    #[test]
    fn test_extension_ignores_dotted_directories() {
        assert_eq!(extension_of("photos.v2/IMG"), None);
        assert_eq!(extension_of("C:\\dir.v2\\pic"), None);
        assert_eq!(extension_of("photos.v2/IMG.Jpg").as_deref(), Some("jpg"));
        assert_eq!(file_name_of("a/b\\c.png"), "c.png");
    }

    #[test]
    fn test_is_image_ignores_case() {
        let file = UploadableFile::new("a.png", " IMAGE/PNG", vec![0u8]);
        assert!(file.is_image());
        assert!(!UploadableFile::new("a.mp4", "video/mp4", vec![0u8]).is_image());
    }
}
