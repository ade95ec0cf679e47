//! Row-major 4x4 matrices
//!
//! Storage is `rows[row][column]`. Vectors are columns, so a matrix applies
//! to a point as `M * v` and `A * B` applies `B` first. [`Matrix4::multiply`],
//! [`Matrix4::transform`] and [`Matrix4::inverse`] all share this convention.

// Matrix code reads best with the textbook single-letter names
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]

use crate::MathError;
use crate::vector::safe_normalize;
use glam::{DMat4, DVec3, DVec4};
use std::ops::Mul;

/// Determinants with a magnitude below this are treated as singular
pub const SINGULAR_EPSILON: f64 = 1e-12;

/// A 4x4 matrix of `f64`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4 {
    pub rows: [[f64; 4]; 4],
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4 {
    pub const IDENTITY: Self = Self {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub const ZERO: Self = Self {
        rows: [[0.0; 4]; 4],
    };

    pub const fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        Self { rows }
    }

    /// Build a matrix whose columns are the given vectors
    pub fn from_columns(c0: DVec4, c1: DVec4, c2: DVec4, c3: DVec4) -> Self {
        Self::from_rows([
            [c0.x, c1.x, c2.x, c3.x],
            [c0.y, c1.y, c2.y, c3.y],
            [c0.z, c1.z, c2.z, c3.z],
            [c0.w, c1.w, c2.w, c3.w],
        ])
    }

    pub fn row(&self, index: usize) -> DVec4 {
        DVec4::from_array(self.rows[index])
    }

    pub fn column(&self, index: usize) -> DVec4 {
        DVec4::new(
            self.rows[0][index],
            self.rows[1][index],
            self.rows[2][index],
            self.rows[3][index],
        )
    }

    pub fn transpose(&self) -> Self {
        Self::from_columns(self.row(0), self.row(1), self.row(2), self.row(3))
    }

    // ========================================================================
    // Construction
    // ========================================================================

    pub fn translation(offset: DVec3) -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, offset.x],
            [0.0, 1.0, 0.0, offset.y],
            [0.0, 0.0, 1.0, offset.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Right-handed rotation about the X axis (angle in radians)
    pub fn x_rotation(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Right-handed rotation about the Y axis (angle in radians)
    pub fn y_rotation(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Right-handed rotation about the Z axis (angle in radians)
    pub fn z_rotation(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn scaling(factors: DVec3) -> Self {
        Self::from_rows([
            [factors.x, 0.0, 0.0, 0.0],
            [0.0, factors.y, 0.0, 0.0],
            [0.0, 0.0, factors.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Camera-to-world matrix for a camera at `eye` looking at `target`.
    ///
    /// The columns are the camera's right, up and backward axes followed by the
    /// eye position. The basis comes from cross products and is never checked:
    /// when `target == eye` or `up` is parallel to the view direction, one or
    /// more axes collapse to zero length. Use [`Matrix4::has_degenerate_basis`]
    /// to detect that before inverting.
    pub fn look_at(eye: DVec3, target: DVec3, up: DVec3) -> Self {
        let z_axis = safe_normalize(eye - target);
        let x_axis = safe_normalize(up.cross(z_axis));
        let y_axis = safe_normalize(z_axis.cross(x_axis));

        Self::from_columns(
            x_axis.extend(0.0),
            y_axis.extend(0.0),
            z_axis.extend(0.0),
            eye.extend(1.0),
        )
    }

    /// Symmetric OpenGL-style perspective frustum (clip z in `[-1, 1]`).
    ///
    /// Expects `0 < near < far` and `0 < fov_y < PI`. Out-of-range inputs give
    /// meaningless or non-finite entries; validate before calling.
    pub fn perspective(fov_y: f64, aspect: f64, near: f64, far: f64) -> Self {
        let f = (std::f64::consts::FRAC_PI_2 - 0.5 * fov_y).tan();
        let range_inv = 1.0 / (near - far);

        Self::from_rows([
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, (near + far) * range_inv, near * far * range_inv * 2.0],
            [0.0, 0.0, -1.0, 0.0],
        ])
    }

    /// Map pixel coordinates to clip space with the Y axis flipped so that
    /// row 0 is at the top.
    pub fn screen_projection(width: f64, height: f64, depth: f64) -> Self {
        Self::from_rows([
            [2.0 / width, 0.0, 0.0, -1.0],
            [0.0, -2.0 / height, 0.0, 1.0],
            [0.0, 0.0, 2.0 / depth, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    // ========================================================================
    // Composition
    // ========================================================================

    /// Standard matrix product `self * rhs`
    pub fn multiply(&self, rhs: &Self) -> Self {
        let mut out = Self::ZERO;
        for r in 0..4 {
            for c in 0..4 {
                out.rows[r][c] = (0..4).map(|k| self.rows[r][k] * rhs.rows[k][c]).sum();
            }
        }
        out
    }

    /// Apply the matrix to a homogeneous vector (`self * v`)
    pub fn transform(&self, v: DVec4) -> DVec4 {
        DVec4::new(
            self.row(0).dot(v),
            self.row(1).dot(v),
            self.row(2).dot(v),
            self.row(3).dot(v),
        )
    }

    pub fn translate(&self, offset: DVec3) -> Self {
        self.multiply(&Self::translation(offset))
    }

    pub fn rotate_x(&self, angle: f64) -> Self {
        self.multiply(&Self::x_rotation(angle))
    }

    pub fn rotate_y(&self, angle: f64) -> Self {
        self.multiply(&Self::y_rotation(angle))
    }

    pub fn rotate_z(&self, angle: f64) -> Self {
        self.multiply(&Self::z_rotation(angle))
    }

    pub fn scale(&self, factors: DVec3) -> Self {
        self.multiply(&Self::scaling(factors))
    }

    // ========================================================================
    // Inversion
    // ========================================================================

    /// Determinant by Laplace expansion over 2x2 minors
    pub fn determinant(&self) -> f64 {
        Minors::of(self).determinant()
    }

    /// Inverse via the adjugate (transposed cofactor matrix).
    ///
    /// Returns [`MathError::Singular`] when `|det| < SINGULAR_EPSILON`.
    pub fn inverse(&self) -> Result<Self, MathError> {
        let a = &self.rows;
        let minors = Minors::of(self);
        let determinant = minors.determinant();
        if !determinant.is_finite() || determinant.abs() < SINGULAR_EPSILON {
            return Err(MathError::Singular { determinant });
        }
        let d = 1.0 / determinant;
        let Minors { s, c } = minors;

        Ok(Self::from_rows([
            [
                (a[1][1] * c[5] - a[1][2] * c[4] + a[1][3] * c[3]) * d,
                (-a[0][1] * c[5] + a[0][2] * c[4] - a[0][3] * c[3]) * d,
                (a[3][1] * s[5] - a[3][2] * s[4] + a[3][3] * s[3]) * d,
                (-a[2][1] * s[5] + a[2][2] * s[4] - a[2][3] * s[3]) * d,
            ],
            [
                (-a[1][0] * c[5] + a[1][2] * c[2] - a[1][3] * c[1]) * d,
                (a[0][0] * c[5] - a[0][2] * c[2] + a[0][3] * c[1]) * d,
                (-a[3][0] * s[5] + a[3][2] * s[2] - a[3][3] * s[1]) * d,
                (a[2][0] * s[5] - a[2][2] * s[2] + a[2][3] * s[1]) * d,
            ],
            [
                (a[1][0] * c[4] - a[1][1] * c[2] + a[1][3] * c[0]) * d,
                (-a[0][0] * c[4] + a[0][1] * c[2] - a[0][3] * c[0]) * d,
                (a[3][0] * s[4] - a[3][1] * s[2] + a[3][3] * s[0]) * d,
                (-a[2][0] * s[4] + a[2][1] * s[2] - a[2][3] * s[0]) * d,
            ],
            [
                (-a[1][0] * c[3] + a[1][1] * c[1] - a[1][2] * c[0]) * d,
                (a[0][0] * c[3] - a[0][1] * c[1] + a[0][2] * c[0]) * d,
                (-a[3][0] * s[3] + a[3][1] * s[1] - a[3][2] * s[0]) * d,
                (a[2][0] * s[3] - a[2][1] * s[1] + a[2][2] * s[0]) * d,
            ],
        ]))
    }

    /// True when any of the three basis columns has (near) zero length,
    /// which is what [`Matrix4::look_at`] produces for degenerate input.
    pub fn has_degenerate_basis(&self) -> bool {
        (0..3).any(|i| self.column(i).truncate().length() < crate::NORMALIZE_EPSILON)
    }

    pub fn is_finite(&self) -> bool {
        self.rows.iter().flatten().all(|v| v.is_finite())
    }

    pub fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.rows
            .iter()
            .flatten()
            .zip(other.rows.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

/// 2x2 minors of the top two rows (`s`) and bottom two rows (`c`)
struct Minors {
    s: [f64; 6],
    c: [f64; 6],
}

impl Minors {
    fn of(m: &Matrix4) -> Self {
        let a = &m.rows;
        Self {
            s: [
                a[0][0] * a[1][1] - a[1][0] * a[0][1],
                a[0][0] * a[1][2] - a[1][0] * a[0][2],
                a[0][0] * a[1][3] - a[1][0] * a[0][3],
                a[0][1] * a[1][2] - a[1][1] * a[0][2],
                a[0][1] * a[1][3] - a[1][1] * a[0][3],
                a[0][2] * a[1][3] - a[1][2] * a[0][3],
            ],
            c: [
                a[2][0] * a[3][1] - a[3][0] * a[2][1],
                a[2][0] * a[3][2] - a[3][0] * a[2][2],
                a[2][0] * a[3][3] - a[3][0] * a[2][3],
                a[2][1] * a[3][2] - a[3][1] * a[2][2],
                a[2][1] * a[3][3] - a[3][1] * a[2][3],
                a[2][2] * a[3][3] - a[3][2] * a[2][3],
            ],
        }
    }

    /// Laplace expansion over the top and bottom row pairs
    fn determinant(&self) -> f64 {
        let Self { s, c } = self;
        s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0]
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        self.multiply(&rhs)
    }
}

impl Mul<DVec4> for Matrix4 {
    type Output = DVec4;

    fn mul(self, rhs: DVec4) -> DVec4 {
        self.transform(rhs)
    }
}

impl From<Matrix4> for DMat4 {
    fn from(m: Matrix4) -> Self {
        DMat4::from_cols(m.column(0), m.column(1), m.column(2), m.column(3))
    }
}

impl From<DMat4> for Matrix4 {
    fn from(m: DMat4) -> Self {
        Matrix4::from_columns(m.x_axis, m.y_axis, m.z_axis, m.w_axis)
    }
}
