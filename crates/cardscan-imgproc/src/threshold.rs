//! Threshold selection for card/background separation.

use cardscan_core::InvalidImageError;
use image::GrayImage;
use serde::{Deserialize, Serialize};

/// How the binarization threshold is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdSelection {
    /// Otsu's method over the histogram bins in `[low, high]` (inclusive).
    ///
    /// Pixels outside the range do not vote but are still binarized against
    /// the selected threshold. `{ low: 0, high: 255 }` uses the full range.
    Otsu { low: u8, high: u8 },
    /// Static threshold.
    Fixed(u8),
}

/// Which side of the threshold is foreground.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdPolarity {
    /// Foreground iff `value > threshold` (bright cards on a dark background).
    #[default]
    Above,
    /// Foreground iff `value <= threshold`.
    Below,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinarizeParams {
    pub selection: ThresholdSelection,
    #[serde(default)]
    pub polarity: ThresholdPolarity,
}

impl Default for BinarizeParams {
    fn default() -> Self {
        Self {
            selection: ThresholdSelection::Otsu { low: 0, high: 255 },
            polarity: ThresholdPolarity::Above,
        }
    }
}

impl BinarizeParams {
    pub(crate) fn validate(&self) -> Result<(), InvalidImageError> {
        if let ThresholdSelection::Otsu { low, high } = self.selection {
            if low > high {
                return Err(InvalidImageError::InvalidParameter {
                    name: "binarize.selection",
                    reason: format!("otsu range is empty (low={low} > high={high})"),
                });
            }
        }
        Ok(())
    }

    /// Resolve the threshold for `image`.
    pub(crate) fn threshold_for(&self, image: &GrayImage) -> u8 {
        match self.selection {
            ThresholdSelection::Otsu { low, high } => otsu_threshold(image, low, high),
            ThresholdSelection::Fixed(t) => t,
        }
    }

    #[inline]
    pub(crate) fn is_foreground(&self, value: u8, threshold: u8) -> bool {
        match self.polarity {
            ThresholdPolarity::Above => value > threshold,
            ThresholdPolarity::Below => value <= threshold,
        }
    }
}

/// Otsu threshold computed from the histogram bins in `[low, high]`.
///
/// Degenerate histograms fall back to simple rules: no samples in range gives
/// the range midpoint, a single occupied value gives that value, and two
/// occupied values give their midpoint.
pub fn otsu_threshold(image: &GrayImage, low: u8, high: u8) -> u8 {
    let mut hist = [0u32; 256];
    for &v in image.as_raw() {
        if v >= low && v <= high {
            hist[v as usize] += 1;
        }
    }
    otsu_from_histogram(&hist).unwrap_or(((low as u16 + high as u16) / 2) as u8)
}

fn otsu_from_histogram(hist: &[u32; 256]) -> Option<u8> {
    let min_v = hist.iter().position(|&h| h > 0)? as u8;
    let max_v = hist.iter().rposition(|&h| h > 0)? as u8;
    if min_v == max_v {
        return Some(min_v);
    }
    let nonzero_bins = hist.iter().filter(|&&h| h > 0).count();
    if nonzero_bins <= 2 {
        return Some(((min_v as u16 + max_v as u16) / 2) as u8);
    }

    let total: f64 = hist.iter().map(|&h| h as f64).sum();
    let mut sum_total = 0f64;
    for (i, &h) in hist.iter().enumerate() {
        sum_total += (i as f64) * (h as f64);
    }

    let mut sum_b = 0f64;
    let mut w_b = 0f64;
    let mut best_var = -1f64;
    let mut best_t = min_v;

    for (t, &h) in hist.iter().enumerate() {
        w_b += h as f64;
        if w_b < 1.0 {
            continue;
        }
        let w_f = total - w_b;
        if w_f < 1.0 {
            break;
        }

        sum_b += (t as f64) * (h as f64);
        let m_b = sum_b / w_b;
        let m_f = (sum_total - sum_b) / w_f;

        let var_between = w_b * w_f * (m_b - m_f) * (m_b - m_f);
        if var_between > best_var {
            best_var = var_between;
            best_t = t as u8;
        }
    }

    Some(best_t)
}
