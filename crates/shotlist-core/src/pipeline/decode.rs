//! Image decoding with format detection and dimension limits.

use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

/// Image decoder with configurable limits.
#[derive(Debug, Clone)]
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// Result of decoding an image.
pub struct DecodedImage {
    /// The decoded image data
    pub image: DynamicImage,
    /// Detected image format
    pub format: ImageFormat,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Decode an image from an in-memory buffer.
    ///
    /// The format is detected from the content first and from the name's
    /// extension second. Dimensions are checked before the pixels are decoded.
    pub fn decode(&self, bytes: &[u8], name: &str) -> Result<DecodedImage, PipelineError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                name: name.to_string(),
                message: format!("Cannot detect image format: {}", e),
            })?;
        let format = match reader.format() {
            Some(f) => f,
            None => ImageFormat::from_path(Path::new(name)).map_err(|_| PipelineError::Decode {
                name: name.to_string(),
                message: "Unrecognized image format".to_string(),
            })?,
        };
        self.decode_as(bytes, name, format)
    }

    /// Decode an image whose format is already known.
    pub fn decode_as(
        &self,
        bytes: &[u8],
        name: &str,
        format: ImageFormat,
    ) -> Result<DecodedImage, PipelineError> {
        let decode_err = |e: image::ImageError| PipelineError::Decode {
            name: name.to_string(),
            message: e.to_string(),
        };

        let (width, height) = ImageReader::with_format(Cursor::new(bytes), format)
            .into_dimensions()
            .map_err(decode_err)?;
        self.check_dimensions(name, width, height)?;

        let image = ImageReader::with_format(Cursor::new(bytes), format)
            .decode()
            .map_err(decode_err)?;
        let (width, height) = image.dimensions();

        Ok(DecodedImage {
            image,
            format,
            width,
            height,
        })
    }

    fn check_dimensions(&self, name: &str, width: u32, height: u32) -> Result<(), PipelineError> {
        let max_dim = self.limits.max_image_dimension;
        if width > max_dim || height > max_dim {
            return Err(PipelineError::ImageTooLarge {
                name: name.to_string(),
                width,
                height,
                max_dim,
            });
        }
        Ok(())
    }
}
