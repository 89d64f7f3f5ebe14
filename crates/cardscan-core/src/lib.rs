//! Core types and utilities for playing-card localization.
//!
//! This crate is intentionally small and purely geometric. It holds the
//! shared raster helpers (validation, bilinear sampling), the polygon and
//! quadrilateral types produced by contour analysis, the 4-point homography
//! used for rectification, and the logging setup shared by the workspace.

mod error;
mod geometry;
mod homography;
mod logger;
mod raster;

pub use error::{GeometryError, InvalidImageError};
pub use geometry::{polygon_area, Polygon, Quadrilateral};
pub use homography::{homography_from_4pt, warp_perspective, Homography};
pub use raster::{ensure_non_empty, sample_bilinear};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
