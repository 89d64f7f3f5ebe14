use cardscan_core::InvalidImageError;

/// Errors returned by the card detector.
///
/// Per-card geometry failures are not errors: degenerate candidates are
/// dropped and counted in [`ScanStats`](super::ScanStats).
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    #[error("expected a portrait image, got {width}x{height}")]
    InvalidInput { width: u32, height: u32 },
    #[error(transparent)]
    InvalidImage(#[from] InvalidImageError),
    #[error("invalid scan parameter `{name}`: {reason}")]
    InvalidParams { name: &'static str, reason: String },
}
