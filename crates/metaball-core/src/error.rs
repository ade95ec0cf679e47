//! Error types for the metaball core

use metaball_math::MathError;
use thiserror::Error;

/// Result type alias using the core Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the render core.
///
/// None of these are fatal to a render loop: callers fall back to an identity
/// matrix, a zero vector or the background color and keep going.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A camera or projection matrix could not be inverted
    #[error("Invalid matrix: {0}")]
    InvalidMatrix(#[from] MathError),

    /// A direction or normal had zero length
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
