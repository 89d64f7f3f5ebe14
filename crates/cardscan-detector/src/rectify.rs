//! Perspective rectification of a single card quadrilateral.

use crate::RectifiedCard;
use cardscan_core::{
    homography_from_4pt, warp_perspective, GeometryError, Homography, Quadrilateral,
};
use image::{ImageBuffer, Pixel, RgbImage};
use nalgebra::Point2;

fn edge(a: Point2<f32>, b: Point2<f32>) -> f32 {
    (b - a).norm()
}

/// Order the quadrilateral's vertices as the source positions of the output
/// corners `(0,0)`, `(w,0)`, `(w,h)`, `(0,h)`.
///
/// Vertices are sorted by angle around the centroid and rotated so the one
/// with the smallest `x + y` comes first (ties keep the angular order). With
/// `portrait` set, a quadrilateral whose horizontal edges are longer than its
/// vertical ones is rotated by one more step, so the card's long side always
/// maps onto the output height.
///
/// A card turned close to 45° has two vertices with nearly equal `x + y`;
/// small changes in the outline can then flip the start vertex and the card
/// comes out upright or turned by 180°.
pub fn canonical_corners(quad: &Quadrilateral, portrait: bool) -> [Point2<f32>; 4] {
    let c = quad.centroid();
    let mut v = quad.vertices;
    v.sort_by(|a, b| {
        let ta = (a.y - c.y).atan2(a.x - c.x);
        let tb = (b.y - c.y).atan2(b.x - c.x);
        ta.total_cmp(&tb)
    });

    let start = (1..4).fold(0, |best, i| {
        if v[i].x + v[i].y < v[best].x + v[best].y {
            i
        } else {
            best
        }
    });
    v.rotate_left(start);

    if portrait {
        let horizontal = 0.5 * (edge(v[0], v[1]) + edge(v[3], v[2]));
        let vertical = 0.5 * (edge(v[0], v[3]) + edge(v[1], v[2]));
        if horizontal > vertical {
            v.rotate_left(1);
        }
    }
    v
}

// Image-from-card homography for a `width × height` output.
fn solve_card_homography(
    quad: &Quadrilateral,
    width: u32,
    height: u32,
) -> Result<([Point2<f32>; 4], Homography), GeometryError> {
    quad.validate()?;
    let corners = canonical_corners(quad, height >= width);
    let (w, h) = (width as f32, height as f32);
    let rect = [
        Point2::new(0.0, 0.0),
        Point2::new(w, 0.0),
        Point2::new(w, h),
        Point2::new(0.0, h),
    ];
    let h_img_from_card =
        homography_from_4pt(&rect, &corners).ok_or(GeometryError::HomographyFailed)?;
    Ok((corners, h_img_from_card))
}

/// Rectify `quad` into a `width × height` card.
///
/// Fails for degenerate quadrilaterals (coincident or collinear vertices) and
/// when no homography can be solved.
pub fn rectify_card(
    image: &RgbImage,
    quad: &Quadrilateral,
    width: u32,
    height: u32,
) -> Result<RectifiedCard, GeometryError> {
    let (corners, h_img_from_card) = solve_card_homography(quad, width, height)?;
    Ok(RectifiedCard {
        image: warp_perspective(image, h_img_from_card, width, height),
        quad: Quadrilateral::new(corners),
        h_img_from_card,
    })
}

/// Warp the region bounded by `quad` into an upright `width × height` image.
pub fn remove_perspective_distortion<P>(
    image: &ImageBuffer<P, Vec<u8>>,
    quad: &Quadrilateral,
    width: u32,
    height: u32,
) -> Result<ImageBuffer<P, Vec<u8>>, GeometryError>
where
    P: Pixel<Subpixel = u8>,
{
    let (_, h_img_from_rect) = solve_card_homography(quad, width, height)?;
    Ok(warp_perspective(image, h_img_from_rect, width, height))
}
