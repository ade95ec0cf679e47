//! Metaball Math - linear algebra for camera and ray generation
//!
//! A small, pure matrix library built around [`Matrix4`], a row-major 4x4
//! matrix using the column-vector convention (`v' = M * v`, translation in the
//! last column). Vectors are `glam` double-precision types.
//!
//! Everything here is stateless. The only fallible operation is
//! [`Matrix4::inverse`], which refuses singular matrices instead of dividing
//! by a zero determinant.
//!
//! # Example
//!
//! ```rust
//! use glam::{DVec3, DVec4};
//! use metaball_math::Matrix4;
//!
//! let m = Matrix4::translation(DVec3::new(1.0, 2.0, 3.0)).rotate_y(0.5);
//! let inv = m.inverse()?;
//! let p = DVec4::new(4.0, 5.0, 6.0, 1.0);
//! let back = inv.transform(m.transform(p));
//! assert!((back - p).length() < 1e-9);
//! # Ok::<(), metaball_math::MathError>(())
//! ```

mod matrix;
mod vector;

pub use matrix::{Matrix4, SINGULAR_EPSILON};
pub use vector::{NORMALIZE_EPSILON, deg_to_rad, mix, rad_to_deg, reflect, safe_normalize};

use thiserror::Error;

/// Errors produced by the math library
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MathError {
    /// The matrix determinant is too close to zero to invert
    #[error("matrix is not invertible (determinant {determinant:e})")]
    Singular { determinant: f64 },
}
