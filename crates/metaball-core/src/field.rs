//! The fused metaball field
//!
//! Each blob contributes a quintic falloff `1 - x³(x(6x - 15) + 10)` inside
//! its bounding sphere (`x = distance / radius`), which is 1 at the center,
//! 0 at the boundary and C² continuous. The surface is where the summed
//! potential reaches [`THRESHOLD`].
//!
//! Sphere tracing needs a step length rather than a potential, so the field
//! reports one of two things:
//!
//! - inside at least one bounding sphere: `h * (THRESHOLD - potential)`, where
//!   `h` is a Lipschitz bound grown from the largest influencing radius;
//! - outside every bounding sphere: the distance to the nearest sphere plus a
//!   small overshoot that carries the ray across the boundary.

use crate::scene::Blob;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Iso-value of the rendered surface
pub const THRESHOLD: f64 = 0.9;

/// Starting value of the Lipschitz bound
pub const LIPSCHITZ_SEED: f64 = 1.0;

/// Per-radius growth of the Lipschitz bound
pub const LIPSCHITZ_FACTOR: f64 = 0.133;

/// Added to the bounding-sphere distance so the next sample lands inside
pub const BOUNDARY_OVERSHOOT: f64 = 0.1;

/// Distance reported when there is nothing at all to march towards
pub const FAR_BOUND: f64 = 1e20;

/// Quintic falloff for a normalized distance `x` in `[0, 1]`
pub fn falloff(x: f64) -> f64 {
    1.0 - x * x * x * (x * (x * 6.0 - 15.0) + 10.0)
}

/// One evaluation of the field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSample {
    /// How far a ray may safely advance from the sample point
    pub step: f64,
    /// Number of blobs whose bounding sphere contains the point
    pub influence: u32,
    /// Blob contributing the most potential, if any influences the point
    pub dominant: Option<usize>,
}

impl FieldSample {
    /// A sample that has not looked at any blob yet
    pub fn empty(step: f64) -> Self {
        Self {
            step,
            influence: 0,
            dominant: None,
        }
    }
}

/// How the out-of-range step picks its bounding sphere
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundPolicy {
    /// Nearest bounding sphere over all out-of-range blobs
    #[default]
    Nearest,
    /// Bounding sphere of the last out-of-range blob in scene order.
    ///
    /// Can step straight through earlier blobs.
    LastChecked,
}

/// Anything the sphere tracer can march through
pub trait DistanceField: Send + Sync {
    fn sample(&self, p: DVec3) -> FieldSample;

    fn step(&self, p: DVec3) -> f64 {
        self.sample(p).step
    }
}

/// The field produced by a slice of blobs
#[derive(Debug, Clone, Copy)]
pub struct MetaballField<'a> {
    blobs: &'a [Blob],
    policy: BoundPolicy,
}

impl<'a> MetaballField<'a> {
    pub fn new(blobs: &'a [Blob], policy: BoundPolicy) -> Self {
        Self { blobs, policy }
    }

    pub fn blobs(&self) -> &'a [Blob] {
        self.blobs
    }

    /// Summed potential at `p`, ignoring the step logic
    pub fn potential(&self, p: DVec3) -> f64 {
        self.blobs
            .iter()
            .filter_map(|b| {
                let d = (b.center - p).length();
                (d < b.radius).then(|| falloff(d / b.radius))
            })
            .sum()
    }
}

impl DistanceField for MetaballField<'_> {
    fn sample(&self, p: DVec3) -> FieldSample {
        let mut potential = 0.0;
        let mut influence = 0u32;
        let mut lipschitz = LIPSCHITZ_SEED;
        let mut bound = FAR_BOUND;
        let mut dominant: Option<(usize, f64)> = None;

        for (index, blob) in self.blobs.iter().enumerate() {
            let d = (blob.center - p).length();

            if d < blob.radius {
                let contribution = falloff(d / blob.radius);
                potential += contribution;
                influence += 1;
                lipschitz = lipschitz.max(LIPSCHITZ_FACTOR * blob.radius);

                if dominant.is_none_or(|(_, best)| contribution > best) {
                    dominant = Some((index, contribution));
                }
            } else {
                let gap = d - blob.radius;
                bound = match self.policy {
                    BoundPolicy::Nearest => bound.min(gap),
                    BoundPolicy::LastChecked => gap,
                };
            }
        }

        let step = if influence > 0 {
            lipschitz * (THRESHOLD - potential)
        } else {
            bound + BOUNDARY_OVERSHOOT
        };

        FieldSample {
            step,
            influence,
            dominant: dominant.map(|(index, _)| index),
        }
    }
}
