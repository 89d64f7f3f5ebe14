//! External border tracing of foreground components.

use cardscan_core::{ensure_non_empty, InvalidImageError};
use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::geometry::arc_length;
use imageproc::point::Point;
use nalgebra::Point2;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Closed pixel-level outline of one foreground component.
#[derive(Clone, Debug, PartialEq)]
pub struct Contour {
    /// Border pixels in tracing order (pixel-center coordinates).
    pub points: Vec<Point2<f32>>,
}

impl Contour {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Length of the closed outline, including the closing segment.
    pub fn perimeter(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        arc_length(&as_curve(&self.points), true)
    }
}

pub(crate) fn as_curve(points: &[Point2<f32>]) -> Vec<Point<f32>> {
    points.iter().map(|p| Point::new(p.x, p.y)).collect()
}

/// Trace the outer borders of all 8-connected foreground components.
///
/// Hole borders are skipped; components nested inside a hole still produce
/// their own outer border. Contours come out in raster order of their
/// starting pixel, which is stable for a given mask.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(mask), fields(width = mask.width(), height = mask.height()))
)]
pub fn find_external_contours(mask: &GrayImage) -> Result<Vec<Contour>, InvalidImageError> {
    ensure_non_empty(mask.width(), mask.height())?;
    let contours = find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer)
        .map(|c| Contour {
            points: c
                .points
                .iter()
                .map(|p| Point2::new(p.x as f32, p.y as f32))
                .collect(),
        })
        .collect();
    Ok(contours)
}
