//! Card scanning pipeline.
//!
//! This module wires together binarization, quadrilateral extraction, area
//! filtering, row-wise ordering and per-card rectification.

mod debug;
mod error;
mod params;
mod pipeline;
mod result;

pub use debug::{DebugRecorder, DebugSink, NoDebug};
pub use error::ScanError;
pub use params::{CardSize, ScanParams};
pub use pipeline::CardDetector;
pub use result::{CardDetectionResult, RectifiedCard, ScanStats};
