//! Polygon and quadrilateral types produced by contour analysis.

use crate::GeometryError;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

const DUPLICATE_EPS: f32 = 1e-3;
const COLLINEAR_AREA_EPS: f64 = 1e-3;

/// Absolute shoelace area of a closed polygon.
pub fn polygon_area(vertices: &[Point2<f32>]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0_f64;
    for (i, a) in vertices.iter().enumerate() {
        let b = vertices[(i + 1) % vertices.len()];
        twice += a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64;
    }
    (twice * 0.5).abs()
}

#[inline]
fn cross(o: Point2<f32>, a: Point2<f32>, b: Point2<f32>) -> f64 {
    let (ox, oy) = (o.x as f64, o.y as f64);
    (a.x as f64 - ox) * (b.y as f64 - oy) - (a.y as f64 - oy) * (b.x as f64 - ox)
}

fn compute_convexity(vertices: &[Point2<f32>]) -> bool {
    let n = vertices.len();
    let mut sign = 0.0_f64;
    for i in 0..n {
        let z = cross(vertices[i], vertices[(i + 1) % n], vertices[(i + 2) % n]);
        if z == 0.0 {
            continue;
        }
        if sign == 0.0 {
            sign = z.signum();
        } else if z.signum() != sign {
            return false;
        }
    }
    true
}

/// Simplified closed outline with at least 3 vertices.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<Point2<f32>>,
    convex: bool,
}

impl Polygon {
    /// Build a polygon; `None` if fewer than 3 vertices are given.
    pub fn new(vertices: Vec<Point2<f32>>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let convex = compute_convexity(&vertices);
        Some(Self { vertices, convex })
    }

    #[inline]
    pub fn vertices(&self) -> &[Point2<f32>] {
        &self.vertices
    }

    /// Number of sides (equal to the vertex count).
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Whether every turn along the outline has the same orientation.
    #[inline]
    pub fn is_convex(&self) -> bool {
        self.convex
    }

    pub fn area(&self) -> f64 {
        polygon_area(&self.vertices)
    }

    /// Convert to a quadrilateral when the polygon has exactly 4 vertices.
    pub fn to_quadrilateral(&self) -> Option<Quadrilateral> {
        let vertices: [Point2<f32>; 4] = self.vertices.as_slice().try_into().ok()?;
        Some(Quadrilateral::new(vertices))
    }
}

/// Four-vertex outline of a card candidate in image coordinates.
///
/// Vertex order is not normalized; rectification establishes the corner
/// correspondence.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quadrilateral {
    pub vertices: [Point2<f32>; 4],
}

impl Quadrilateral {
    pub fn new(vertices: [Point2<f32>; 4]) -> Self {
        Self { vertices }
    }

    pub fn area(&self) -> f64 {
        polygon_area(&self.vertices)
    }

    /// Mean of the four vertices.
    pub fn centroid(&self) -> Point2<f32> {
        let (sx, sy) = self
            .vertices
            .iter()
            .fold((0.0_f32, 0.0_f32), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point2::new(sx / 4.0, sy / 4.0)
    }

    /// Axis-aligned bounding box as `(min, max)`.
    pub fn bounds(&self) -> (Point2<f32>, Point2<f32>) {
        let mut min = self.vertices[0];
        let mut max = self.vertices[0];
        for p in &self.vertices[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        (min, max)
    }

    /// Bounding-box height.
    pub fn height(&self) -> f32 {
        let (min, max) = self.bounds();
        max.y - min.y
    }

    /// Reject duplicate, collinear or concave vertex sets.
    ///
    /// Convexity is checked along the given vertex order.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let v = &self.vertices;
        for i in 0..4 {
            for j in (i + 1)..4 {
                if (v[i] - v[j]).norm() < DUPLICATE_EPS {
                    return Err(GeometryError::DuplicateVertices);
                }
            }
        }
        for (a, b, c) in [(0, 1, 2), (0, 1, 3), (0, 2, 3), (1, 2, 3)] {
            if cross(v[a], v[b], v[c]).abs() * 0.5 < COLLINEAR_AREA_EPS {
                return Err(GeometryError::CollinearVertices);
            }
        }
        if !compute_convexity(v) {
            return Err(GeometryError::NonConvex);
        }
        Ok(())
    }
}

impl From<Quadrilateral> for Polygon {
    fn from(q: Quadrilateral) -> Self {
        let vertices = q.vertices.to_vec();
        let convex = compute_convexity(&vertices);
        Self { vertices, convex }
    }
}
