//! High-level facade crate for the `cardscan-*` workspace.
//!
//! This crate provides:
//! - re-exports of the underlying crates,
//! - (feature-gated) end-to-end helpers that decode-agnostic callers can use
//!   with an `image::DynamicImage` or a raw RGB buffer.
//!
//! ## Quickstart
//!
//! ```no_run
//! use cardscan::detect;
//! use cardscan::ScanParams;
//! use image::ImageReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = ImageReader::open("table.jpg")?.decode()?;
//! let result = detect::scan_image(&img, &ScanParams::default())?;
//! for (i, card) in result.images().enumerate() {
//!     card.save(format!("card_{i:02}.png"))?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `cardscan::core`: polygons, quadrilaterals, homographies, bilinear sampling.
//! - `cardscan::imgproc`: grayscale, median blur, Otsu binarization,
//!   morphology, contour tracing, polygon approximation.
//! - `cardscan::detector`: area filtering, row-wise ordering, rectification
//!   and the [`CardDetector`] pipeline.
//! - `cardscan::detect` (feature `image`): end-to-end helpers.

pub use cardscan_core as core;
pub use cardscan_detector as detector;
pub use cardscan_imgproc as imgproc;

pub use cardscan_core::{GeometryError, Polygon, Quadrilateral};
pub use cardscan_detector::{
    CardDetectionResult, CardDetector, CardSize, RectifiedCard, ScanConfig, ScanError,
    ScanParams,
};

#[cfg(feature = "image")]
pub mod detect;

#[cfg(feature = "tracing")]
mod trace;

#[cfg(feature = "tracing")]
pub use trace::init_tracing;
