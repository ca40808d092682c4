//! Thumbnail synthesis with JPEG output.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::sync::Arc;
use std::time::Duration;

use super::decode::ImageDecoder;
use super::placeholder::render_placeholder;
use super::preview::extract_embedded_preview;
use crate::config::{LimitsConfig, ThumbnailConfig};
use crate::error::PipelineError;
use crate::types::{Preview, PreviewSource};

/// Produces bounded-size previews for standard and RAW images.
#[derive(Debug, Clone)]
pub struct ThumbnailSynthesizer {
    config: ThumbnailConfig,
    decoder: ImageDecoder,
    timeout: Duration,
}

impl ThumbnailSynthesizer {
    /// Create a new synthesizer with the given configuration.
    pub fn new(config: ThumbnailConfig, limits: LimitsConfig) -> Self {
        let timeout = Duration::from_millis(limits.decode_timeout_ms);
        Self {
            config,
            decoder: ImageDecoder::new(limits),
            timeout,
        }
    }

    /// Check if thumbnail generation is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Produce a preview for one asset. Never fails.
    ///
    /// Standard images yield `None` when they cannot be decoded. RAW images
    /// fall back to the embedded preview, then to a placeholder card.
    pub fn synthesize(&self, bytes: &[u8], file_name: &str, is_raw: bool) -> Option<Preview> {
        if !self.config.enabled {
            return None;
        }

        if !is_raw {
            return match self.preview_from_image(bytes, file_name, PreviewSource::Decoded) {
                Ok(preview) => Some(preview),
                Err(e) => {
                    tracing::warn!("No thumbnail for {}: {}", file_name, e);
                    None
                }
            };
        }

        if let Some(embedded) = extract_embedded_preview(bytes) {
            match self.preview_from_jpeg(&embedded, file_name) {
                Ok(preview) => return Some(preview),
                Err(e) => tracing::debug!("Embedded preview of {} unusable: {}", file_name, e),
            }
        } else {
            tracing::debug!("No embedded preview in {}", file_name);
        }

        self.placeholder(file_name)
    }

    /// Run [`Self::synthesize`] on the blocking pool under the decode timeout.
    ///
    /// A timeout degrades to the same result as a decode failure.
    pub async fn synthesize_async(
        &self,
        bytes: Arc<Vec<u8>>,
        file_name: String,
        is_raw: bool,
    ) -> Option<Preview> {
        if !self.config.enabled {
            return None;
        }

        let worker = self.clone();
        let name = file_name.clone();
        let task = tokio::task::spawn_blocking(move || worker.synthesize(&bytes, &name, is_raw));

        let failure = match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(preview)) => return preview,
            Ok(Err(join_err)) => format!("thumbnail task failed: {}", join_err),
            Err(_) => PipelineError::Timeout {
                name: file_name.clone(),
                stage: "thumbnail".to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            }
            .to_string(),
        };

        tracing::warn!("{}", failure);
        if is_raw {
            self.placeholder(&file_name)
        } else {
            None
        }
    }

    /// The placeholder preview for a RAW file name.
    pub fn placeholder(&self, file_name: &str) -> Option<Preview> {
        let card = render_placeholder(
            file_name,
            self.config.placeholder_width,
            self.config.placeholder_height,
        );
        match self.encode(&DynamicImage::ImageRgb8(card), PreviewSource::Placeholder) {
            Ok(preview) => Some(preview),
            Err(e) => {
                tracing::warn!("Placeholder for {} failed to encode: {}", file_name, e);
                None
            }
        }
    }

    fn preview_from_image(
        &self,
        bytes: &[u8],
        file_name: &str,
        source: PreviewSource,
    ) -> Result<Preview, PipelineError> {
        let decoded = self.decoder.decode(bytes, file_name)?;
        self.encode(&decoded.image, source)
            .map_err(|e| PipelineError::Decode {
                name: file_name.to_string(),
                message: e.to_string(),
            })
    }

    fn preview_from_jpeg(&self, bytes: &[u8], file_name: &str) -> Result<Preview, PipelineError> {
        let decoded = self.decoder.decode_as(bytes, file_name, ImageFormat::Jpeg)?;
        self.encode(&decoded.image, PreviewSource::Embedded)
            .map_err(|e| PipelineError::Decode {
                name: file_name.to_string(),
                message: e.to_string(),
            })
    }

    fn encode(&self, image: &DynamicImage, source: PreviewSource) -> image::ImageResult<Preview> {
        let (width, height) = bounded_dimensions(image.width(), image.height(), self.config.size);
        let resized = if (width, height) == (image.width(), image.height()) {
            image.to_rgb8()
        } else {
            image
                .resize_exact(width, height, FilterType::Lanczos3)
                .to_rgb8()
        };

        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, self.config.quality).encode_image(&resized)?;

        Ok(Preview {
            data: BASE64.encode(buffer),
            width,
            height,
            source,
        })
    }
}

/// Fit `width` x `height` inside a `max` bounding box.
///
/// Portrait and square images are clamped on height, landscape images on
/// width; the other edge keeps the aspect ratio. Never upscales and never
/// returns a zero edge.
pub fn bounded_dimensions(width: u32, height: u32, max: u32) -> (u32, u32) {
    let width = width.max(1);
    let height = height.max(1);
    let max = max.max(1);

    if width.max(height) <= max {
        return (width, height);
    }

    let scale = |edge: u32, long: u32| -> u32 {
        let scaled = (u64::from(edge) * u64::from(max) + u64::from(long) / 2) / u64::from(long);
        (scaled as u32).clamp(1, max)
    };

    if width <= height {
        (scale(width, height), max)
    } else {
        (max, scale(height, width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::decode::tests::encoded_image;

    fn synthesizer(size: u32) -> ThumbnailSynthesizer {
        let config = ThumbnailConfig {
            size,
            ..ThumbnailConfig::default()
        };
        ThumbnailSynthesizer::new(config, LimitsConfig::default())
    }

    fn decode_preview(preview: &Preview) -> DynamicImage {
        let bytes = BASE64.decode(&preview.data).unwrap();
        image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).unwrap()
    }

    #[test]
    fn test_bounded_dimensions() {
        assert_eq!(bounded_dimensions(4000, 3000, 400), (400, 300));
        assert_eq!(bounded_dimensions(3000, 4000, 400), (300, 400));
        assert_eq!(bounded_dimensions(1000, 1000, 400), (400, 400));
        // Never upscale.
        assert_eq!(bounded_dimensions(120, 80, 400), (120, 80));
        // Extreme panoramas keep a visible edge.
        assert_eq!(bounded_dimensions(100_000, 10, 400), (400, 1));
        assert_eq!(bounded_dimensions(0, 0, 400), (1, 1));
    }

    #[test]
    fn test_bounded_dimensions_preserve_aspect() {
        for (w, h) in [(1920, 1080), (1080, 1920), (333, 777), (6000, 4000)] {
            let (tw, th) = bounded_dimensions(w, h, 256);
            assert!(tw.max(th) <= 256);
            // Cross products differ by at most half a pixel of the long edge.
            let skew = (u64::from(tw) * u64::from(h)).abs_diff(u64::from(th) * u64::from(w));
            assert!(skew <= u64::from(w.max(h)), "{}x{} -> {}x{}", w, h, tw, th);
        }
    }

    #[test]
    fn test_standard_thumbnail_is_bounded_jpeg() {
        let bytes = encoded_image(800, 400, ImageFormat::Png);
        let preview = synthesizer(200).synthesize(&bytes, "wide.png", false).unwrap();
        assert_eq!((preview.width, preview.height), (200, 100));
        assert_eq!(preview.source, PreviewSource::Decoded);

        let img = decode_preview(&preview);
        assert_eq!((img.width(), img.height()), (200, 100));
    }

    #[test]
    fn test_standard_decode_failure_yields_none() {
        assert!(synthesizer(200)
            .synthesize(b"not an image", "broken.jpg", false)
            .is_none());
    }

    #[test]
    fn test_raw_uses_embedded_preview() {
        let mut raw = vec![0u8; 512];
        raw.extend(encoded_image(640, 480, ImageFormat::Jpeg));
        let preview = synthesizer(320).synthesize(&raw, "DSC_0001.NEF", true).unwrap();
        assert_eq!(preview.source, PreviewSource::Embedded);
        assert_eq!((preview.width, preview.height), (320, 240));
    }

    #[test]
    fn test_raw_without_preview_gets_deterministic_placeholder() {
        let synth = synthesizer(400);
        let a = synth.synthesize(&[0u8; 256], "IMG_0001.CR2", true).unwrap();
        let b = synth.synthesize(&[1u8; 64], "IMG_0001.CR2", true).unwrap();
        assert_eq!(a.source, PreviewSource::Placeholder);
        assert_eq!((a.width, a.height), (400, 300));
        assert_eq!(a, b);
    }

    /// A JPEG cut right after its frame header: the dimensions read, the
    /// pixels never decode.
    fn headers_only_jpeg(width: u32, height: u32) -> Vec<u8> {
        let jpeg = encoded_image(width, height, ImageFormat::Jpeg);
        let sof = jpeg.windows(2).position(|w| w == [0xFF, 0xC0]).unwrap();
        let len = usize::from(u16::from_be_bytes([jpeg[sof + 2], jpeg[sof + 3]]));
        jpeg[..sof + 2 + len].to_vec()
    }

    #[test]
    fn test_raw_with_truncated_preview_gets_placeholder() {
        let synth = synthesizer(320);
        let mut raw = vec![0u8; 512];
        raw.extend(headers_only_jpeg(640, 480));
        raw.extend([0u8; 128]);

        let preview = synth.synthesize(&raw, "DSC_0002.NEF", true).unwrap();
        assert_eq!(preview.source, PreviewSource::Placeholder);
        assert_eq!(Some(preview), synth.placeholder("DSC_0002.NEF"));
    }

    #[test]
    fn test_raw_with_oversized_preview_gets_placeholder() {
        let limits = LimitsConfig {
            max_image_dimension: 256,
            ..LimitsConfig::default()
        };
        let synth = ThumbnailSynthesizer::new(ThumbnailConfig::default(), limits);
        let mut raw = vec![0u8; 512];
        raw.extend(encoded_image(640, 480, ImageFormat::Jpeg));

        // The embedded stream is found but refused by the decoder.
        assert!(extract_embedded_preview(&raw).is_some());
        let preview = synth.synthesize(&raw, "DSC_0003.NEF", true).unwrap();
        assert_eq!(preview.source, PreviewSource::Placeholder);
    }

    #[test]
    fn test_disabled_returns_none() {
        let config = ThumbnailConfig {
            enabled: false,
            ..ThumbnailConfig::default()
        };
        let synth = ThumbnailSynthesizer::new(config, LimitsConfig::default());
        assert!(!synth.is_enabled());
        assert!(synth.synthesize(&[], "IMG_0001.CR2", true).is_none());
    }

    #[tokio::test]
    async fn test_synthesize_async_matches_sync() {
        let bytes = Arc::new(encoded_image(300, 600, ImageFormat::Png));
        let synth = synthesizer(100);
        let preview = synth
            .synthesize_async(bytes.clone(), "tall.png".to_string(), false)
            .await
            .unwrap();
        assert_eq!((preview.width, preview.height), (50, 100));
        assert_eq!(Some(preview), synth.synthesize(&bytes, "tall.png", false));
    }
}
