//! Image compression collaborator.
//!
//! The file manager only sees the [`Compressor`] trait. [`ImageCompressor`]
//! is the bundled implementation; it runs decode and encode on the blocking
//! pool and returns its input untouched whenever it cannot do better.

use anyhow::Result;
use async_trait::async_trait;
use mediaport_core::UploadableFile;

#[cfg(feature = "image")]
pub use image_compressor::ImageCompressor;

/// Opaque `compress(file) -> file` step applied to image uploads.
#[async_trait]
pub trait Compressor: Send + Sync {
    async fn compress(&self, file: UploadableFile) -> Result<UploadableFile>;
}

/// Returns every file unchanged. Used when compression is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCompressor;

#[async_trait]
impl Compressor for NoopCompressor {
    async fn compress(&self, file: UploadableFile) -> Result<UploadableFile> {
        Ok(file)
    }
}

/// Whether a re-encoded payload should be discarded in favor of the input.
#[cfg_attr(not(feature = "image"), allow(dead_code))]
fn keep_original(resized: bool, original_len: usize, encoded_len: usize) -> bool {
    !resized && encoded_len >= original_len
}

#[cfg(feature = "image")]
mod image_compressor {
    use std::io::Cursor;

    use anyhow::{Context, Result};
    use async_trait::async_trait;
    use bytes::Bytes;
    use image::codecs::jpeg::JpegEncoder;
    use image::codecs::webp::WebPEncoder;
    use image::imageops::FilterType;
    use image::{DynamicImage, GenericImageView, ImageFormat};
    use mediaport_core::models::extension_of;
    use mediaport_core::{CompressionConfig, OutputFormat, UploadableFile};

    use super::{keep_original, Compressor};

    /// Formats that are never re-encoded
    const PASSTHROUGH_MIME_TYPES: &[&str] = &["image/gif", "image/svg+xml", "image/x-icon"];
    const PASSTHROUGH_EXTENSIONS: &[&str] = &["gif", "svg", "ico"];

    /// Main compression service
    #[derive(Debug, Clone)]
    pub struct ImageCompressor {
        config: CompressionConfig,
    }

    impl ImageCompressor {
        pub fn new(config: CompressionConfig) -> Self {
            Self { config }
        }

        fn compress_blocking(
            config: &CompressionConfig,
            file: UploadableFile,
        ) -> Result<UploadableFile> {
            let mime = file.mime_type.to_lowercase();
            let ext = file.extension();
            if PASSTHROUGH_MIME_TYPES.contains(&mime.as_str())
                || ext
                    .as_deref()
                    .map(|e| PASSTHROUGH_EXTENSIONS.contains(&e))
                    .unwrap_or(false)
            {
                return Ok(file);
            }

            let source_format = match ImageFormat::from_mime_type(&mime)
                .or_else(|| image::guess_format(&file.data).ok())
            {
                Some(
                    format @ (ImageFormat::Jpeg
                    | ImageFormat::Png
                    | ImageFormat::WebP
                    | ImageFormat::Bmp),
                ) => format,
                _ => return Ok(file),
            };

            let img = match image::load_from_memory_with_format(&file.data, source_format) {
                Ok(img) => img,
                Err(e) => {
                    tracing::debug!(
                        error = %e,
                        name = %file.name,
                        "Could not decode image, uploading it unchanged"
                    );
                    return Ok(file);
                }
            };

            let (width, height) = img.dimensions();
            let (img, resized) = Self::fit_within(img, config.max_width, config.max_height);

            let target = match config.output_format {
                OutputFormat::Original => source_format,
                OutputFormat::Jpeg => ImageFormat::Jpeg,
                OutputFormat::Png => ImageFormat::Png,
                OutputFormat::Webp => ImageFormat::WebP,
            };

            let encoded = Self::encode(&img, target, config.quality)?;

            if keep_original(resized, file.data.len(), encoded.len()) {
                tracing::debug!(
                    name = %file.name,
                    original_bytes = file.data.len(),
                    encoded_bytes = encoded.len(),
                    "Re-encoded image is not smaller, keeping original"
                );
                return Ok(file);
            }

            let format = config.output_format;
            let (name, mime_type) = match (format.extension(), format.mime_type()) {
                (Some(ext), Some(mime)) => (replace_extension(&file.name, ext), mime.to_string()),
                _ => (file.name.clone(), file.mime_type.clone()),
            };

            tracing::info!(
                name = %name,
                original_bytes = file.data.len(),
                compressed_bytes = encoded.len(),
                original_width = width,
                original_height = height,
                resized = resized,
                "Image compressed"
            );

            Ok(UploadableFile::new(name, mime_type, encoded))
        }

        /// Downscale to fit the bounds, preserving aspect ratio. Never upscales.
        fn fit_within(
            img: DynamicImage,
            max_width: Option<u32>,
            max_height: Option<u32>,
        ) -> (DynamicImage, bool) {
            let (width, height) = img.dimensions();
            let bound_w = max_width.unwrap_or(width);
            let bound_h = max_height.unwrap_or(height);
            if width <= bound_w && height <= bound_h {
                return (img, false);
            }
            (img.resize(bound_w, bound_h, FilterType::Lanczos3), true)
        }

        fn encode(img: &DynamicImage, format: ImageFormat, quality: u8) -> Result<Bytes> {
            let mut buffer = Vec::new();
            match format {
                ImageFormat::Jpeg => {
                    // JPEG has no alpha channel
                    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
                    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, quality))
                        .context("Failed to encode JPEG")?;
                }
                ImageFormat::WebP => {
                    let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
                    rgba.write_with_encoder(WebPEncoder::new_lossless(&mut buffer))
                        .context("Failed to encode WebP")?;
                }
                other => {
                    img.write_to(&mut Cursor::new(&mut buffer), other)
                        .with_context(|| format!("Failed to encode {:?}", other))?;
                }
            }
            Ok(Bytes::from(buffer))
        }
    }

    fn replace_extension(name: &str, ext: &str) -> String {
        match name.rsplit_once('.') {
            Some((base, _)) if extension_of(name).is_some() => format!("{}.{}", base, ext),
            _ => format!("{}.{}", name, ext),
        }
    }

    #[async_trait]
    impl Compressor for ImageCompressor {
        async fn compress(&self, file: UploadableFile) -> Result<UploadableFile> {
            let config = self.config.clone();
            tokio::task::spawn_blocking(move || Self::compress_blocking(&config, file))
                .await
                .context("Compression task failed")?
        }
    }

}
