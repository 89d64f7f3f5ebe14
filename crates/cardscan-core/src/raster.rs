use crate::InvalidImageError;
use image::{ImageBuffer, Pixel};

/// Reject rasters with no pixels.
pub fn ensure_non_empty(width: u32, height: u32) -> Result<(), InvalidImageError> {
    if width == 0 || height == 0 {
        return Err(InvalidImageError::ZeroSized { width, height });
    }
    Ok(())
}

// Out-of-bounds reads return 0 (constant black border).
#[inline]
fn get_channel(raw: &[u8], width: u32, height: u32, channels: usize, x: i64, y: i64, c: usize) -> f32 {
    if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
        return 0.0;
    }
    raw[(y as usize * width as usize + x as usize) * channels + c] as f32
}

/// Bilinear sample of an 8-bit image at `(x, y)`.
///
/// Integer coordinates address pixel centers, so sampling at `(3.0, 4.0)`
/// returns pixel `(3, 4)` exactly. Channels are interpolated independently
/// and rounded to the nearest integer.
#[inline]
pub fn sample_bilinear<P>(src: &ImageBuffer<P, Vec<u8>>, x: f32, y: f32) -> P
where
    P: Pixel<Subpixel = u8>,
{
    let channels = P::CHANNEL_COUNT as usize;
    let (w, h) = src.dimensions();
    let raw = src.as_raw();

    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (xi, yi) = (x0 as i64, y0 as i64);

    let mut out = [0u8; 4];
    for (c, slot) in out.iter_mut().enumerate().take(channels) {
        let p00 = get_channel(raw, w, h, channels, xi, yi, c);
        let p10 = get_channel(raw, w, h, channels, xi + 1, yi, c);
        let p01 = get_channel(raw, w, h, channels, xi, yi + 1, c);
        let p11 = get_channel(raw, w, h, channels, xi + 1, yi + 1, c);

        let a = p00 + fx * (p10 - p00);
        let b = p01 + fx * (p11 - p01);
        *slot = (a + fy * (b - a)).round().clamp(0.0, 255.0) as u8;
    }
    *P::from_slice(&out[..channels])
}
