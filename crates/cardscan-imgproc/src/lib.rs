//! Raster stages of the card localization pipeline.
//!
//! - [`binarize`]: grayscale conversion, median smoothing, thresholding and
//!   3×3 binary morphology,
//! - [`contour`]: external border tracing of foreground components,
//! - [`polygon`]: split-and-merge polygon approximation and quadrilateral
//!   selection.
//!
//! Every function takes an immutable raster and returns a new one. Binary
//! masks are `GrayImage`s holding only `0` and `255`.

pub mod binarize;
pub mod contour;
pub mod polygon;
mod threshold;

pub use binarize::{binarize, dilate, erode, median_blur, open, to_grayscale};
pub use contour::{find_external_contours, Contour};
pub use polygon::{approximate_polygon, approximate_polygons, filter_quadrilaterals, PolygonParams};
pub use threshold::{otsu_threshold, BinarizeParams, ThresholdPolarity, ThresholdSelection};
