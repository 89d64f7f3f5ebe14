use crate::{CardDetectionResult, CardDetector, ScanError, ScanParams};
use ::image::{DynamicImage, RgbImage};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the high-level facade helpers.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("invalid RGB image buffer length (expected {expected} bytes, got {got})")]
    InvalidRgbBuffer { expected: usize, got: usize },

    #[error("invalid RGB image dimensions (width={width}, height={height})")]
    InvalidRgbDimensions { width: u32, height: u32 },

    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Scan any decoded image; non-RGB inputs are converted to 8-bit RGB first.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, params), fields(width = img.width(), height = img.height()))
)]
pub fn scan_image(img: &DynamicImage, params: &ScanParams) -> Result<CardDetectionResult, DetectError> {
    let rgb = match img {
        DynamicImage::ImageRgb8(rgb) => std::borrow::Cow::Borrowed(rgb),
        other => std::borrow::Cow::Owned(other.to_rgb8()),
    };
    scan_rgb(&rgb, params)
}

/// Scan an RGB image with the given parameters.
pub fn scan_rgb(img: &RgbImage, params: &ScanParams) -> Result<CardDetectionResult, DetectError> {
    let result = CardDetector::new(params.clone()).scan(img)?;
    log::info!("{} card(s) found", result.len());
    Ok(result)
}

/// Scan with [`ScanParams::default`].
pub fn scan_rgb_default(img: &RgbImage) -> Result<CardDetectionResult, DetectError> {
    scan_rgb(img, &ScanParams::default())
}

/// Wrap a tightly packed RGB8 buffer (`width * height * 3` bytes, row-major).
pub fn rgb_image_from_slice(width: u32, height: u32, pixels: &[u8]) -> Result<RgbImage, DetectError> {
    let w = usize::try_from(width).ok();
    let h = usize::try_from(height).ok();
    let Some((w, h)) = w.zip(h) else {
        return Err(DetectError::InvalidRgbDimensions { width, height });
    };
    let Some(expected) = w.checked_mul(h).and_then(|n| n.checked_mul(3)) else {
        return Err(DetectError::InvalidRgbDimensions { width, height });
    };
    if pixels.len() != expected {
        return Err(DetectError::InvalidRgbBuffer {
            expected,
            got: pixels.len(),
        });
    }
    RgbImage::from_raw(width, height, pixels.to_vec())
        .ok_or(DetectError::InvalidRgbDimensions { width, height })
}

/// Scan a raw RGB8 buffer.
pub fn scan_rgb_u8(
    width: u32,
    height: u32,
    pixels: &[u8],
    params: &ScanParams,
) -> Result<CardDetectionResult, DetectError> {
    let img = rgb_image_from_slice(width, height, pixels)?;
    scan_rgb(&img, params)
}
