use cardscan_core::{Homography, Quadrilateral};
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// One card warped to the canonical upright size.
#[derive(Clone, Debug)]
pub struct RectifiedCard {
    pub image: RgbImage,
    /// Source quadrilateral with vertices in output-corner order:
    /// top-left, top-right, bottom-right, bottom-left of `image`.
    pub quad: Quadrilateral,
    /// Maps card pixel coordinates into the source photo.
    pub h_img_from_card: Homography,
}

/// Candidate counts after each pipeline stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub contours: usize,
    pub polygons: usize,
    pub quadrilaterals: usize,
    pub area_filtered: usize,
    /// Candidates rejected as degenerate (duplicate, collinear or concave
    /// vertices) or that could not be rectified.
    pub degenerate_dropped: usize,
}

/// Output of a scan: cards in row-major reading order.
#[derive(Clone, Debug, Default)]
pub struct CardDetectionResult {
    pub cards: Vec<RectifiedCard>,
    pub stats: ScanStats,
}

impl CardDetectionResult {
    #[inline]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Rectified images in reading order.
    pub fn images(&self) -> impl Iterator<Item = &RgbImage> + '_ {
        self.cards.iter().map(|c| &c.image)
    }

    pub fn into_images(self) -> Vec<RgbImage> {
        self.cards.into_iter().map(|c| c.image).collect()
    }
}
