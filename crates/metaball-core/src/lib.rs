//! # Metaball Core
//!
//! The CPU render core for a field of moving metaballs.
//!
//! A [`Scene`] holds a fixed set of [`Blob`]s and a light. The
//! [`MetaballField`] fuses the blobs into one implicit surface, [`intersect`]
//! sphere-traces a [`Ray`] against it, [`estimate_normal`] and [`shade`] turn a
//! hit into a color, and [`Tracer`] strings the steps together for one pixel.
//! [`Integrator`] moves the blobs between frames.
//!
//! ## Example
//!
//! ```rust
//! use glam::DVec3;
//! use metaball_core::prelude::*;
//!
//! let blob = Blob::new(DVec3::new(0.0, 0.0, -10.0), 5.0, DVec3::new(1.0, 0.0, 0.0));
//! let scene = Scene::new(vec![blob], DVec3::ZERO)?;
//! let tracer = Tracer::new(&scene, BoundPolicy::Nearest, MarchSettings::default());
//!
//! let ray = Ray::new(DVec3::ZERO, DVec3::NEG_Z)?;
//! let shaded = tracer.trace(&ray);
//! assert!(shaded.outcome.is_hit());
//! assert!(shaded.color.x > 0.0);
//! # Ok::<(), metaball_core::Error>(())
//! ```
//!
//! ## Conventions
//!
//! - All geometry is `f64`. Marching converges to `1e-7` at distances up to
//!   `1000`, which single precision cannot resolve.
//! - Colors are linear RGB and are never clamped here.

pub mod animation;
pub mod field;
pub mod march;
pub mod normal;
pub mod ray;
pub mod scene;
pub mod shading;
pub mod trace;

mod error;

pub use animation::{Integrator, WallResponse, Walls};
pub use error::{Error, Result};
pub use field::{BoundPolicy, DistanceField, FieldSample, MetaballField, THRESHOLD};
pub use march::{March, MarchSettings, Termination, intersect};
pub use normal::estimate_normal;
pub use ray::Ray;
pub use scene::{Blob, Scene, SpawnConfig};
pub use shading::{Lighting, shade};
pub use trace::{Hit, Outcome, Shaded, Tracer};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::animation::{Integrator, WallResponse, Walls};
    pub use crate::field::{BoundPolicy, DistanceField, FieldSample, MetaballField};
    pub use crate::march::{March, MarchSettings, Termination, intersect};
    pub use crate::normal::estimate_normal;
    pub use crate::ray::Ray;
    pub use crate::scene::{Blob, Scene, SpawnConfig};
    pub use crate::shading::shade;
    pub use crate::trace::{Hit, Outcome, Shaded, Tracer};

    pub use crate::{Error, Result};
}
