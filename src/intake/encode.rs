use image::{ExtendedColorType, ImageEncoder, codecs::jpeg::JpegEncoder, imageops::FilterType};

use super::{IntakeConfig, IntakeError, data_url::encode_data_url};

/// The format every accepted image is re-encoded to.
pub const OUTPUT_MIME_TYPE: &str = "image/jpeg";

/// A re-encoded image ready to embed in a JSON request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// `data:image/jpeg;base64,...`
    pub data_url: String,
    pub width: u32,
    pub height: u32,
    /// Size of the JPEG before base64.
    pub encoded_bytes: usize,
}

impl EncodedImage {
    pub fn as_str(&self) -> &str {
        &self.data_url
    }
}

/// Fits `width`×`height` inside a `max`×`max` box, preserving aspect ratio.
///
/// Only the longer side is compared against `max`; images already inside the
/// bound are returned unchanged, never enlarged. Fractional results are
/// truncated, and neither side drops below one pixel.
pub fn target_dimensions(width: u32, height: u32, max: u32) -> (u32, u32) {
    let scale = |short: u32, long: u32| -> u32 {
        let scaled = u64::from(short) * u64::from(max) / u64::from(long);
        u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
    };

    if width > height {
        if width > max {
            return (max, scale(height, width));
        }
    } else if height > max {
        return (scale(width, height), max);
    }

    (width, height)
}

/// Decodes `bytes`, downscales to the configured bound and re-encodes as JPEG.
///
/// CPU bound; callers on an async runtime should run it on a blocking
/// thread.
pub fn downscale_and_encode(bytes: &[u8], config: &IntakeConfig) -> Result<EncodedImage, IntakeError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| IntakeError::Decode(e.to_string()))?;

    let (width, height) = target_dimensions(decoded.width(), decoded.height(), config.max_dimension);
    let resized = if (width, height) == (decoded.width(), decoded.height()) {
        decoded
    } else {
        decoded.resize_exact(width, height, FilterType::Triangle)
    };

    let rgb = resized.to_rgb8();
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, config.jpeg_quality())
        .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
        .map_err(|e| IntakeError::Encode(e.to_string()))?;

    tracing::debug!(
        "🖼️ Re-encoded image to {}x{} ({} bytes JPEG)",
        width,
        height,
        jpeg.len()
    );

    Ok(EncodedImage {
        data_url: encode_data_url(OUTPUT_MIME_TYPE, &jpeg),
        width,
        height,
        encoded_bytes: jpeg.len(),
    })
}
