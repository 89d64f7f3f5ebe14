/// Errors for rasters or stage parameters that cannot be processed at all.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidImageError {
    #[error("image has zero area (width={width}, height={height})")]
    ZeroSized { width: u32, height: u32 },
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Errors for a single quadrilateral that cannot be rectified.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    #[error("quadrilateral has duplicate vertices")]
    DuplicateVertices,
    #[error("quadrilateral has three collinear vertices")]
    CollinearVertices,
    #[error("quadrilateral is not convex")]
    NonConvex,
    #[error("homography estimation failed")]
    HomographyFailed,
}
