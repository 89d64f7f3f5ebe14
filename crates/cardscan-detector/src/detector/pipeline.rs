use super::{
    CardDetectionResult, CardSize, DebugSink, NoDebug, RectifiedCard, ScanError, ScanParams,
    ScanStats,
};
use crate::{filter_by_area, rectify_card, sort_row_wise};
use cardscan_core::{ensure_non_empty, GeometryError, Polygon, Quadrilateral};
use cardscan_imgproc::{
    approximate_polygons, binarize, dilate, erode, filter_quadrilaterals, find_external_contours,
    median_blur, to_grayscale,
};
use image::RgbImage;
use log::debug;

#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Finds playing cards in a portrait photo and rectifies them.
#[derive(Clone, Debug, Default)]
pub struct CardDetector {
    params: ScanParams,
}

impl CardDetector {
    pub fn new(params: ScanParams) -> Self {
        Self { params }
    }

    /// Detector parameters.
    #[inline]
    pub fn params(&self) -> &ScanParams {
        &self.params
    }

    /// Scan a photo and return its cards in reading order.
    pub fn scan(&self, image: &RgbImage) -> Result<CardDetectionResult, ScanError> {
        self.scan_with_debug(image, &mut NoDebug)
    }

    /// Like [`scan`](Self::scan), also reporting intermediate artifacts to
    /// `sink`.
    ///
    /// Stage rasters are reported as `"gray"`, `"blurred"`, `"binary"`,
    /// `"eroded"` and `"dilated"`; quadrilateral sets as `"candidates"`,
    /// `"area_filtered"` and `"sorted"`.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, image, sink),
            fields(width = image.width(), height = image.height())
        )
    )]
    pub fn scan_with_debug(
        &self,
        image: &RgbImage,
        sink: &mut dyn DebugSink,
    ) -> Result<CardDetectionResult, ScanError> {
        self.check_input(image)?;

        let mut stats = ScanStats::default();
        let polygons = self.extract_polygons(image, sink, &mut stats)?;
        let quads = filter_quadrilaterals(&polygons);
        stats.quadrilaterals = quads.len();
        sink.quadrilaterals("candidates", &quads);
        debug!(
            "contours={} polygons={} quadrilaterals={}",
            stats.contours, stats.polygons, stats.quadrilaterals
        );

        Ok(self.arrange_and_rectify(image, &quads, stats, sink))
    }

    /// Closed outlines of all external foreground components, simplified to
    /// polygons. Non-quadrilateral shapes are kept.
    pub fn find_polygons(&self, image: &RgbImage) -> Result<Vec<Polygon>, ScanError> {
        self.check_input(image)?;
        self.extract_polygons(image, &mut NoDebug, &mut ScanStats::default())
    }

    /// Four-vertex candidates before area filtering, in contour order.
    pub fn find_quadrilaterals(&self, image: &RgbImage) -> Result<Vec<Quadrilateral>, ScanError> {
        Ok(filter_quadrilaterals(&self.find_polygons(image)?))
    }

    /// Run area filtering, ordering and rectification on externally supplied
    /// candidates.
    pub fn detect_from_quads(
        &self,
        image: &RgbImage,
        quads: &[Quadrilateral],
    ) -> Result<CardDetectionResult, ScanError> {
        self.check_input(image)?;
        let stats = ScanStats {
            quadrilaterals: quads.len(),
            ..ScanStats::default()
        };
        Ok(self.arrange_and_rectify(image, quads, stats, &mut NoDebug))
    }

    fn check_input(&self, image: &RgbImage) -> Result<(), ScanError> {
        let (width, height) = image.dimensions();
        ensure_non_empty(width, height)?;
        if width > height {
            return Err(ScanError::InvalidInput { width, height });
        }
        self.params.validate()
    }

    fn extract_polygons(
        &self,
        image: &RgbImage,
        sink: &mut dyn DebugSink,
        stats: &mut ScanStats,
    ) -> Result<Vec<Polygon>, ScanError> {
        let gray = to_grayscale(image)?;
        sink.stage("gray", &gray);
        let blurred = median_blur(&gray, self.params.blur_radius)?;
        sink.stage("blurred", &blurred);
        let binary = binarize(&blurred, &self.params.binarize)?;
        sink.stage("binary", &binary);
        let eroded = erode(&binary)?;
        sink.stage("eroded", &eroded);
        let dilated = dilate(&eroded)?;
        sink.stage("dilated", &dilated);

        let contours = find_external_contours(&dilated)?;
        stats.contours = contours.len();
        let polygons = approximate_polygons(&contours, &self.params.polygon);
        stats.polygons = polygons.len();
        Ok(polygons)
    }

    fn arrange_and_rectify(
        &self,
        image: &RgbImage,
        quads: &[Quadrilateral],
        mut stats: ScanStats,
        sink: &mut dyn DebugSink,
    ) -> CardDetectionResult {
        let mut valid = Vec::with_capacity(quads.len());
        for (idx, quad) in quads.iter().enumerate() {
            match quad.validate() {
                Ok(()) => valid.push(*quad),
                Err(err) => {
                    debug!("dropping degenerate candidate {idx}: {err}");
                    stats.degenerate_dropped += 1;
                }
            }
        }

        let kept = filter_by_area(&valid, self.params.area_tolerance_percent);
        stats.area_filtered = kept.len();
        sink.quadrilaterals("area_filtered", &kept);

        let ordered = sort_row_wise(&kept);
        sink.quadrilaterals("sorted", &ordered);

        let mut cards = Vec::with_capacity(ordered.len());
        for (idx, rectified) in self.rectify_all(image, &ordered).into_iter().enumerate() {
            match rectified {
                Ok(card) => {
                    sink.card(cards.len(), &card);
                    cards.push(card);
                }
                Err(err) => {
                    debug!("dropping card candidate {idx}: {err}");
                    stats.degenerate_dropped += 1;
                }
            }
        }
        debug!(
            "area_filtered={} cards={} dropped={}",
            stats.area_filtered,
            cards.len(),
            stats.degenerate_dropped
        );

        CardDetectionResult { cards, stats }
    }

    fn rectify_all(
        &self,
        image: &RgbImage,
        quads: &[Quadrilateral],
    ) -> Vec<Result<RectifiedCard, GeometryError>> {
        let CardSize { width, height } = self.params.card_size;

        #[cfg(feature = "rayon")]
        let rectified = quads
            .par_iter()
            .map(|q| rectify_card(image, q, width, height))
            .collect();
        #[cfg(not(feature = "rayon"))]
        let rectified = quads
            .iter()
            .map(|q| rectify_card(image, q, width, height))
            .collect();

        rectified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DebugRecorder;
    use image::Rgb;
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;
    use nalgebra::Point2;

    fn small_params() -> ScanParams {
        ScanParams {
            blur_radius: 1,
            card_size: CardSize::new(30, 45),
            ..ScanParams::default()
        }
    }

    fn photo_with_cards(cards: &[(i32, i32)]) -> RgbImage {
        let mut img = RgbImage::from_pixel(200, 260, Rgb([20, 30, 25]));
        for &(x, y) in cards {
            draw_filled_rect_mut(&mut img, Rect::at(x, y).of_size(40, 60), Rgb([235, 235, 230]));
        }
        img
    }

    #[test]
    fn landscape_input_is_rejected() {
        let detector = CardDetector::default();
        let err = detector.scan(&RgbImage::new(40, 30)).unwrap_err();
        assert_eq!(err, ScanError::InvalidInput { width: 40, height: 30 });
        assert!(matches!(
            detector.scan(&RgbImage::new(0, 0)),
            Err(ScanError::InvalidImage(_))
        ));
    }

    #[test]
    fn square_input_is_accepted() {
        let detector = CardDetector::new(small_params());
        assert!(detector.scan(&RgbImage::new(50, 50)).expect("scan").is_empty());
    }

    #[test]
    fn finds_two_cards_in_reading_order() {
        let detector = CardDetector::new(small_params());
        let photo = photo_with_cards(&[(120, 30), (20, 32)]);
        let result = detector.scan(&photo).expect("scan");

        assert_eq!(result.len(), 2);
        assert_eq!(result.stats.degenerate_dropped, 0);
        assert!(result.cards[0].quad.centroid().x < result.cards[1].quad.centroid().x);
        for card in &result.cards {
            assert_eq!(card.image.dimensions(), (30, 45));
            let center = card.image.get_pixel(15, 22);
            assert!(center[0] > 200, "card center should be bright: {center:?}");
        }
    }

    #[test]
    fn debug_sink_sees_every_stage() {
        let detector = CardDetector::new(small_params());
        let photo = photo_with_cards(&[(30, 40)]);
        let mut recorder = DebugRecorder::new();
        let with_debug = detector.scan_with_debug(&photo, &mut recorder).expect("scan");
        let plain = detector.scan(&photo).expect("scan");

        assert_eq!(
            recorder.stage_names(),
            vec!["gray", "blurred", "binary", "eroded", "dilated"]
        );
        let names: Vec<_> = recorder.quadrilaterals.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["candidates", "area_filtered", "sorted"]);
        assert_eq!(recorder.cards.len(), with_debug.len());
        assert_eq!(with_debug.stats, plain.stats);
        assert_eq!(with_debug.cards[0].image, plain.cards[0].image);
    }

    #[test]
    fn degenerate_candidate_is_dropped() {
        let detector = CardDetector::new(small_params());
        let photo = photo_with_cards(&[(20, 30)]);
        let good = Quadrilateral::new([
            Point2::new(20.0, 30.0),
            Point2::new(59.0, 30.0),
            Point2::new(59.0, 89.0),
            Point2::new(20.0, 89.0),
        ]);
        // same area as `good`, but one vertex is repeated
        let bad = Quadrilateral::new([
            Point2::new(100.0, 30.0),
            Point2::new(178.0, 30.0),
            Point2::new(100.0, 89.0),
            Point2::new(100.0, 89.0),
        ]);
        let result = detector.detect_from_quads(&photo, &[bad, good]).expect("scan");
        assert_eq!(result.len(), 1);
        assert_eq!(result.stats.area_filtered, 1);
        assert_eq!(result.stats.degenerate_dropped, 1);
        assert_eq!(result.cards[0].quad.vertices[0], Point2::new(20.0, 30.0));
    }

    fn card_quad(x: f32, y: f32) -> Quadrilateral {
        Quadrilateral::new([
            Point2::new(x, y),
            Point2::new(x + 39.0, y),
            Point2::new(x + 39.0, y + 59.0),
            Point2::new(x, y + 59.0),
        ])
    }

    #[test]
    fn small_degenerate_candidate_does_not_skew_area_filter() {
        let detector = CardDetector::new(small_params());
        let photo = photo_with_cards(&[(20, 30), (120, 30)]);
        let expected = detector
            .detect_from_quads(&photo, &[card_quad(20.0, 30.0), card_quad(120.0, 30.0)])
            .expect("scan");
        assert_eq!(expected.len(), 2);

        // three distinct vertices plus a repeat, far smaller than a card
        let sliver = Quadrilateral::new([
            Point2::new(100.0, 150.0),
            Point2::new(130.0, 150.0),
            Point2::new(100.0, 180.0),
            Point2::new(100.0, 180.0),
        ]);
        let result = detector
            .detect_from_quads(&photo, &[card_quad(20.0, 30.0), sliver, card_quad(120.0, 30.0)])
            .expect("scan");

        assert_eq!(
            result.stats,
            ScanStats {
                quadrilaterals: 3,
                area_filtered: 2,
                degenerate_dropped: 1,
                ..ScanStats::default()
            }
        );
        assert_eq!(result.len(), 2);
        for (a, b) in result.cards.iter().zip(&expected.cards) {
            assert_eq!(a.quad, b.quad);
            assert_eq!(a.image, b.image);
        }
    }

    #[test]
    fn concave_candidate_is_counted_as_degenerate() {
        let detector = CardDetector::new(small_params());
        let photo = photo_with_cards(&[(20, 30)]);
        let dart = Quadrilateral::new([
            Point2::new(120.0, 30.0),
            Point2::new(160.0, 60.0),
            Point2::new(120.0, 90.0),
            Point2::new(135.0, 60.0),
        ]);
        let result = detector
            .detect_from_quads(&photo, &[dart, card_quad(20.0, 30.0)])
            .expect("scan");
        assert_eq!(result.len(), 1);
        assert_eq!(result.stats.degenerate_dropped, 1);
    }
}
