//! Split-and-merge polygon approximation of closed contours.
//!
//! Split: the closed loop is cut at two mutually far contour points and each
//! half is simplified with `imageproc`'s Douglas–Peucker, using
//! `split_fraction × perimeter` as the tolerance.
//!
//! Merge: while some vertex lies closer than `merge_fraction × span` to the
//! line through its two neighbours (`span` = neighbour distance), the one
//! with the smallest relative deviation is dropped.

use crate::contour::as_curve;
use crate::Contour;
use cardscan_core::{Polygon, Quadrilateral};
use imageproc::geometry::approximate_polygon_dp;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

// Floor for the split tolerance on tiny contours.
const MIN_SPLIT_TOLERANCE_PX: f64 = 0.5;

/// Tolerances for [`approximate_polygon`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolygonParams {
    /// Split tolerance as a fraction of the contour perimeter.
    pub split_fraction: f64,
    /// Merge tolerance as a fraction of the neighbour span.
    pub merge_fraction: f64,
    /// Contours with fewer traced points are skipped.
    #[serde(default = "default_min_contour_points")]
    pub min_contour_points: usize,
}

fn default_min_contour_points() -> usize {
    8
}

impl Default for PolygonParams {
    /// Card-outline tolerances.
    fn default() -> Self {
        Self {
            split_fraction: 0.05,
            merge_fraction: 0.1,
            min_contour_points: default_min_contour_points(),
        }
    }
}

impl PolygonParams {
    /// Finer tolerances suited to the symbol outlines printed on a card.
    pub fn shape_outline() -> Self {
        Self {
            split_fraction: 0.05,
            merge_fraction: 0.05,
            ..Self::default()
        }
    }
}

#[inline]
fn line_distance(p: Point2<f32>, a: Point2<f32>, b: Point2<f32>) -> f64 {
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (dx, dy) = (b.x as f64 - ax, b.y as f64 - ay);
    let (px, py) = (p.x as f64 - ax, p.y as f64 - ay);
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1e-12 {
        return (px * px + py * py).sqrt();
    }
    (dx * py - dy * px).abs() / len
}

fn farthest_from(points: &[Point2<f32>], origin: Point2<f32>) -> usize {
    let mut best = 0;
    let mut best_d = -1.0_f32;
    for (i, p) in points.iter().enumerate() {
        let d = (p - origin).norm_squared();
        if d > best_d {
            best_d = d;
            best = i;
        }
    }
    best
}

/// Douglas–Peucker on an open chain; keeps both endpoints.
fn douglas_peucker(chain: &[Point2<f32>], tolerance: f64) -> Vec<Point2<f32>> {
    if chain.len() <= 2 {
        return chain.to_vec();
    }
    approximate_polygon_dp(&as_curve(chain), tolerance, false)
        .into_iter()
        .map(|p| Point2::new(p.x, p.y))
        .collect()
}

fn split_closed(points: &[Point2<f32>], tolerance: f64) -> Vec<Point2<f32>> {
    let a = farthest_from(points, points[0]);
    let b = farthest_from(points, points[a]);
    if a == b {
        return Vec::new();
    }
    let (start, end) = (a.min(b), a.max(b));

    let forward = &points[start..=end];
    let backward: Vec<Point2<f32>> = points[end..]
        .iter()
        .chain(points[..=start].iter())
        .copied()
        .collect();

    let mut out = douglas_peucker(forward, tolerance);
    out.pop();
    let mut back = douglas_peucker(&backward, tolerance);
    back.pop();
    out.extend(back);
    out
}

fn merge_collinear(mut vertices: Vec<Point2<f32>>, fraction: f64) -> Vec<Point2<f32>> {
    while vertices.len() > 3 {
        let n = vertices.len();
        let mut best: Option<(usize, f64)> = None;
        for i in 0..n {
            let prev = vertices[(i + n - 1) % n];
            let next = vertices[(i + 1) % n];
            let span = (next - prev).norm() as f64;
            let rel = if span < 1e-12 {
                0.0
            } else {
                line_distance(vertices[i], prev, next) / span
            };
            if rel < fraction && best.is_none_or(|(_, b)| rel < b) {
                best = Some((i, rel));
            }
        }
        match best {
            Some((i, _)) => {
                vertices.remove(i);
            }
            None => break,
        }
    }
    vertices
}

/// Simplify a closed contour; `None` if fewer than 3 vertices survive or the
/// contour is shorter than `min_contour_points`.
pub fn approximate_polygon(contour: &Contour, params: &PolygonParams) -> Option<Polygon> {
    if contour.len() < params.min_contour_points.max(3) {
        return None;
    }
    let tolerance = (params.split_fraction * contour.perimeter()).max(MIN_SPLIT_TOLERANCE_PX);
    let split = split_closed(&contour.points, tolerance);
    let merged = merge_collinear(split, params.merge_fraction);
    Polygon::new(merged)
}

/// Approximate every contour, dropping those that collapse.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(contours, params), fields(contours = contours.len()))
)]
pub fn approximate_polygons(contours: &[Contour], params: &PolygonParams) -> Vec<Polygon> {
    contours
        .iter()
        .filter_map(|c| approximate_polygon(c, params))
        .collect()
}

/// Keep polygons with exactly four vertices, in input order.
pub fn filter_quadrilaterals(polygons: &[Polygon]) -> Vec<Quadrilateral> {
    polygons.iter().filter_map(Polygon::to_quadrilateral).collect()
}
