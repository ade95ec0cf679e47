//! Error types for the render crate

use thiserror::Error;

/// Result type alias using the render Error type
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors that can occur while preparing or producing a frame
#[derive(Error, Debug)]
pub enum RenderError {
    /// Invalid camera, viewport or scene data
    #[error(transparent)]
    Core(#[from] metaball_core::Error),

    /// `render` was called before a scene or camera was submitted
    #[error("Backend not ready: no {0} submitted")]
    NotReady(&'static str),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
