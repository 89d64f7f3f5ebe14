//! Grayscale, smoothing, thresholding and 3×3 binary morphology.

use crate::threshold::BinarizeParams;
use cardscan_core::{ensure_non_empty, InvalidImageError};
use image::{GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Luminance conversion (Rec. 709 weights).
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(image), fields(width = image.width(), height = image.height()))
)]
pub fn to_grayscale(image: &RgbImage) -> Result<GrayImage, InvalidImageError> {
    ensure_non_empty(image.width(), image.height())?;
    Ok(image::imageops::grayscale(image))
}

/// Median filter with a `(2r+1)×(2r+1)` square window.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip(image)))]
pub fn median_blur(image: &GrayImage, radius: u32) -> Result<GrayImage, InvalidImageError> {
    ensure_non_empty(image.width(), image.height())?;
    if radius == 0 {
        return Err(InvalidImageError::InvalidParameter {
            name: "blur_radius",
            reason: "median window radius must be positive".to_string(),
        });
    }
    Ok(imageproc::filter::median_filter(image, radius, radius))
}

/// Threshold to a `{0, 255}` mask.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip(image)))]
pub fn binarize(image: &GrayImage, params: &BinarizeParams) -> Result<GrayImage, InvalidImageError> {
    ensure_non_empty(image.width(), image.height())?;
    params.validate()?;

    let threshold = params.threshold_for(image);
    log::trace!("binarize threshold={threshold} ({:?})", params.selection);

    let mut out = GrayImage::new(image.width(), image.height());
    for (dst, src) in out.pixels_mut().zip(image.pixels()) {
        *dst = Luma([if params.is_foreground(src[0], threshold) {
            255
        } else {
            0
        }]);
    }
    Ok(out)
}

/// 8-connected erosion with a 3×3 structuring element.
pub fn erode(mask: &GrayImage) -> Result<GrayImage, InvalidImageError> {
    ensure_non_empty(mask.width(), mask.height())?;
    Ok(imageproc::morphology::erode(mask, Norm::LInf, 1))
}

/// 8-connected dilation with a 3×3 structuring element.
pub fn dilate(mask: &GrayImage) -> Result<GrayImage, InvalidImageError> {
    ensure_non_empty(mask.width(), mask.height())?;
    Ok(imageproc::morphology::dilate(mask, Norm::LInf, 1))
}

/// Opening: erosion followed by dilation. Removes isolated specks while
/// keeping card-sized blobs.
pub fn open(mask: &GrayImage) -> Result<GrayImage, InvalidImageError> {
    dilate(&erode(mask)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ThresholdPolarity, ThresholdSelection};
    use image::Rgb;

    fn count_set(mask: &GrayImage) -> usize {
        mask.pixels().filter(|p| p[0] != 0).count()
    }

    fn square_mask(size: u32, x0: u32, y0: u32, side: u32) -> GrayImage {
        GrayImage::from_fn(size, size, |x, y| {
            let inside = x >= x0 && x < x0 + side && y >= y0 && y < y0 + side;
            Luma([if inside { 255 } else { 0 }])
        })
    }

    #[test]
    fn grayscale_of_extremes() {
        let mut img = RgbImage::from_pixel(4, 6, Rgb([0, 0, 0]));
        img.put_pixel(1, 2, Rgb([255, 255, 255]));
        let gray = to_grayscale(&img).expect("gray");
        assert_eq!(gray.dimensions(), (4, 6));
        assert_eq!(gray.get_pixel(1, 2)[0], 255);
        assert_eq!(gray.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn zero_sized_inputs_fail() {
        assert!(to_grayscale(&RgbImage::new(0, 4)).is_err());
        assert!(median_blur(&GrayImage::new(3, 0), 1).is_err());
        assert!(binarize(&GrayImage::new(0, 0), &BinarizeParams::default()).is_err());
        assert!(erode(&GrayImage::new(0, 2)).is_err());
        assert!(dilate(&GrayImage::new(2, 0)).is_err());
    }

    #[test]
    fn zero_blur_radius_is_rejected() {
        let img = GrayImage::from_pixel(5, 5, Luma([10]));
        assert!(matches!(
            median_blur(&img, 0),
            Err(InvalidImageError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn median_removes_salt_noise() {
        let mut img = GrayImage::from_pixel(9, 9, Luma([20]));
        img.put_pixel(4, 4, Luma([250]));
        img.put_pixel(2, 6, Luma([250]));
        let out = median_blur(&img, 1).expect("blur");
        assert!(out.pixels().all(|p| p[0] == 20));
    }

    #[test]
    fn binarize_polarity() {
        let img = GrayImage::from_fn(4, 1, |x, _| Luma([x as u8 * 60]));
        let above = BinarizeParams {
            selection: ThresholdSelection::Fixed(60),
            polarity: ThresholdPolarity::Above,
        };
        let below = BinarizeParams {
            polarity: ThresholdPolarity::Below,
            ..above
        };
        let a = binarize(&img, &above).expect("above");
        let b = binarize(&img, &below).expect("below");
        assert_eq!(a.as_raw(), &vec![0, 0, 255, 255]);
        assert_eq!(b.as_raw(), &vec![255, 255, 0, 0]);
    }

    #[test]
    fn erode_and_dilate_use_3x3_neighbourhood() {
        let mask = square_mask(11, 3, 3, 5);
        assert_eq!(count_set(&erode(&mask).expect("erode")), 9);

        let dot = square_mask(11, 5, 5, 1);
        assert_eq!(count_set(&dilate(&dot).expect("dilate")), 9);
    }

    #[test]
    fn opening_removes_speck_and_keeps_blob() {
        let mut mask = square_mask(20, 6, 6, 8);
        mask.put_pixel(1, 1, Luma([255]));
        let out = open(&mask).expect("open");
        assert_eq!(out.get_pixel(1, 1)[0], 0);
        assert_eq!(count_set(&out), 64);
    }
}
