//! Render and export errors.

/// A frame could not be produced or encoded.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("surface {width}×{height} exceeds the {max}px canvas limit")]
    SurfaceTooLarge { width: u32, height: u32, max: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}
