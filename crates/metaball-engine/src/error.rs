use thiserror::Error;

/// Result type alias using the engine Error type
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while configuring or driving frames
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] metaball_core::Error),

    #[error(transparent)]
    Render(#[from] metaball_render::RenderError),

    /// Settings file could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid JSON for [`crate::RenderSettings`]
    #[error("Settings error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,
}
