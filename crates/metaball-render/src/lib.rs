//! # Metaball Render
//!
//! Turns a [`metaball_core::Scene`] and a [`Camera`] into pixels.
//!
//! ## Pipeline
//!
//! 1. [`SceneUpload`] flattens the scene into per-blob position/radius and
//!    color records.
//! 2. [`CameraRays`] inverts the view and projection matrices and unprojects
//!    the four near-plane corners; pixel rays are bilinear blends of those.
//! 3. A [`RenderBackend`] traces every pixel into a [`Framebuffer`] of
//!    unclamped RGB. [`CpuRaymarcher`] is the rayon implementation.
//!
//! ## Example
//!
//! ```rust
//! use glam::DVec3;
//! use metaball_core::{Blob, Scene};
//! use metaball_render::{Camera, CpuRaymarcher, RenderBackend, SceneUpload, Viewport};
//!
//! let blob = Blob::new(DVec3::new(43.0, 42.0, 80.0), 8.0, DVec3::X);
//! let scene = Scene::new(vec![blob], DVec3::new(43.0, 42.0, -110.0))?;
//! let viewport = Viewport::new(16, 16)?;
//!
//! let mut backend = CpuRaymarcher::new(viewport);
//! backend.submit_scene(&SceneUpload::from_scene(&scene))?;
//! backend.submit_camera(&Camera::default(), viewport)?;
//! let frame = backend.render()?;
//! assert_eq!(frame.pixels().len(), 256);
//! # Ok::<(), metaball_render::RenderError>(())
//! ```

pub mod backend;
pub mod camera;
pub mod framebuffer;
pub mod rays;
pub mod raymarcher;
pub mod upload;

mod error;

pub use backend::{RenderBackend, RenderStats};
pub use camera::{Camera, NUDGE_STEP, Nudge};
pub use error::{RenderError, Result};
pub use framebuffer::Framebuffer;
pub use rays::{CameraRays, Viewport};
pub use raymarcher::CpuRaymarcher;
pub use upload::{BlobRecord, ColorRecord, SceneUpload};
