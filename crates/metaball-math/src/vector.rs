//! Vector helpers shared by the camera and the field code

use glam::{DVec3, DVec4};

/// Vectors shorter than this normalize to zero instead of blowing up
pub const NORMALIZE_EPSILON: f64 = 1e-5;

/// Normalize `v`, returning the zero vector when its length is below
/// [`NORMALIZE_EPSILON`].
///
/// Degenerate inputs (coincident look-at points, flat gradients) therefore
/// propagate as zero-length results that callers can detect.
pub fn safe_normalize(v: DVec3) -> DVec3 {
    let length = v.length();
    if length > NORMALIZE_EPSILON {
        v / length
    } else {
        DVec3::ZERO
    }
}

/// Linear blend `a * (1 - t) + b * t`.
///
/// Written in this form so that `t == 0` returns `a` and `t == 1` returns `b`
/// bit-for-bit.
pub fn mix(a: DVec4, b: DVec4, t: f64) -> DVec4 {
    a * (1.0 - t) + b * t
}

/// Reflect incident direction `i` about normal `n` (GLSL `reflect`)
pub fn reflect(i: DVec3, n: DVec3) -> DVec3 {
    i - 2.0 * n.dot(i) * n
}

pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees * (std::f64::consts::PI / 180.0)
}

pub fn rad_to_deg(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}
