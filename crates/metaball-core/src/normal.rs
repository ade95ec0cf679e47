//! Surface normals from the field gradient

use crate::field::{DistanceField, THRESHOLD};
use glam::DVec3;
use metaball_math::safe_normalize;

/// Offset used for the central differences
pub const NORMAL_OFFSET: f64 = THRESHOLD;

/// Central-difference gradient of the step field at `p`, normalized.
///
/// Takes six field samples. Returns the zero vector when the gradient
/// vanishes (for example at a point of perfect symmetry between blobs).
pub fn estimate_normal<F: DistanceField + ?Sized>(field: &F, p: DVec3) -> DVec3 {
    let dx = DVec3::X * NORMAL_OFFSET;
    let dy = DVec3::Y * NORMAL_OFFSET;
    let dz = DVec3::Z * NORMAL_OFFSET;

    safe_normalize(DVec3::new(
        field.step(p + dx) - field.step(p - dx),
        field.step(p + dy) - field.step(p - dy),
        field.step(p + dz) - field.step(p - dz),
    ))
}
