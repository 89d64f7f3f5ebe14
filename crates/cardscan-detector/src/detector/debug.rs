//! Optional side channel for intermediate pipeline artifacts.

use super::RectifiedCard;
use cardscan_core::Quadrilateral;
use image::GrayImage;

/// Receives intermediate results while a scan runs.
///
/// All methods default to no-ops. Sinks observe the pipeline and never
/// influence its output.
pub trait DebugSink {
    /// A grayscale or binary raster after the named stage.
    fn stage(&mut self, _name: &'static str, _image: &GrayImage) {}

    /// Candidate quadrilaterals after the named stage.
    fn quadrilaterals(&mut self, _name: &'static str, _quads: &[Quadrilateral]) {}

    /// A rectified card at its position in the output order.
    fn card(&mut self, _index: usize, _card: &RectifiedCard) {}
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDebug;

impl DebugSink for NoDebug {}

/// Keeps copies of every artifact in memory, in arrival order.
#[derive(Clone, Debug, Default)]
pub struct DebugRecorder {
    pub stages: Vec<(&'static str, GrayImage)>,
    pub quadrilaterals: Vec<(&'static str, Vec<Quadrilateral>)>,
    pub cards: Vec<RectifiedCard>,
}

impl DebugRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raster recorded for `name`, if any.
    pub fn stage_image(&self, name: &str) -> Option<&GrayImage> {
        self.stages.iter().find(|(n, _)| *n == name).map(|(_, img)| img)
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|(n, _)| *n).collect()
    }
}

impl DebugSink for DebugRecorder {
    fn stage(&mut self, name: &'static str, image: &GrayImage) {
        self.stages.push((name, image.clone()));
    }

    fn quadrilaterals(&mut self, name: &'static str, quads: &[Quadrilateral]) {
        self.quadrilaterals.push((name, quads.to_vec()));
    }

    fn card(&mut self, _index: usize, card: &RectifiedCard) {
        self.cards.push(card.clone());
    }
}
