use super::ScanError;
use cardscan_imgproc::{BinarizeParams, PolygonParams};
use serde::{Deserialize, Serialize};

/// Output size of a rectified card, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSize {
    pub width: u32,
    pub height: u32,
}

impl CardSize {
    /// Poker-size card width.
    pub const WIDTH_MM: f32 = 57.0;
    /// Poker-size card height.
    pub const HEIGHT_MM: f32 = 89.0;
    /// Default output resolution.
    pub const DEFAULT_PX_PER_MM: f32 = 3.0;

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size for a physical card of `width_mm × height_mm` at `px_per_mm`.
    pub fn from_mm(width_mm: f32, height_mm: f32, px_per_mm: f32) -> Self {
        Self {
            width: (width_mm * px_per_mm).round().max(0.0) as u32,
            height: (height_mm * px_per_mm).round().max(0.0) as u32,
        }
    }
}

impl Default for CardSize {
    /// 171 × 267 px.
    fn default() -> Self {
        Self::from_mm(Self::WIDTH_MM, Self::HEIGHT_MM, Self::DEFAULT_PX_PER_MM)
    }
}

/// Configuration for [`CardDetector`](super::CardDetector).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanParams {
    /// Median filter radius; the window is `2r + 1` pixels wide.
    pub blur_radius: u32,
    /// Threshold selection for the blurred grayscale image.
    pub binarize: BinarizeParams,
    /// Contour simplification tolerances.
    pub polygon: PolygonParams,
    /// Accepted deviation from the mean candidate area, in percent.
    pub area_tolerance_percent: f64,
    /// Rectified card size.
    pub card_size: CardSize,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            blur_radius: 16,
            binarize: BinarizeParams::default(),
            polygon: PolygonParams::default(),
            area_tolerance_percent: 20.0,
            card_size: CardSize::default(),
        }
    }
}

impl ScanParams {
    pub(crate) fn validate(&self) -> Result<(), ScanError> {
        if self.blur_radius == 0 {
            return Err(ScanError::InvalidParams {
                name: "blur_radius",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.area_tolerance_percent.is_finite() || self.area_tolerance_percent < 0.0 {
            return Err(ScanError::InvalidParams {
                name: "area_tolerance_percent",
                reason: format!("{} is not a non-negative number", self.area_tolerance_percent),
            });
        }
        if self.card_size.width == 0 || self.card_size.height == 0 {
            return Err(ScanError::InvalidParams {
                name: "card_size",
                reason: format!("{}x{} has zero area", self.card_size.width, self.card_size.height),
            });
        }
        let p = &self.polygon;
        if !(p.split_fraction.is_finite() && p.split_fraction > 0.0)
            || !(p.merge_fraction.is_finite() && p.merge_fraction >= 0.0)
        {
            return Err(ScanError::InvalidParams {
                name: "polygon",
                reason: format!(
                    "split_fraction={} merge_fraction={}",
                    p.split_fraction, p.merge_fraction
                ),
            });
        }
        Ok(())
    }
}
