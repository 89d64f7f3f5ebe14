//! Playing-card detector.
//!
//! Pipeline, in order:
//! 1. grayscale → median blur → binarize → erode → dilate,
//! 2. external contours → polygon approximation → 4-vertex polygons,
//! 3. keep quadrilaterals whose area is within a band around the mean area,
//! 4. order them row by row (top to bottom, then left to right),
//! 5. rectify each one into a fixed-size card image.
//!
//! ## Quickstart
//!
//! ```
//! use cardscan_detector::{CardDetector, ScanParams};
//! use image::RgbImage;
//!
//! let detector = CardDetector::new(ScanParams::default());
//! let photo = RgbImage::new(300, 400); // blank portrait photo
//! let result = detector.scan(&photo).expect("valid input");
//! assert!(result.is_empty());
//! ```

mod arrange;
mod detector;
mod io;
mod rectify;

pub use arrange::{filter_by_area, group_rows, sort_row_wise};
pub use detector::{
    CardDetectionResult, CardDetector, CardSize, DebugRecorder, DebugSink, NoDebug,
    RectifiedCard, ScanError, ScanParams, ScanStats,
};
pub use io::{CardReport, ScanConfig, ScanConfigError, ScanReport};
pub use rectify::{canonical_corners, rectify_card, remove_perspective_distortion};

pub use cardscan_core::{GeometryError, InvalidImageError, Polygon, Quadrilateral};
