//! Primary ray generation
//!
//! Four corner rays are built once per frame by unprojecting the corners of
//! the near plane. Every pixel direction is then a bilinear blend of the
//! corners, which matches direct unprojection because the mapping from NDC to
//! the (rescaled) near plane is affine.

use crate::camera::Camera;
use glam::{DVec3, DVec4};
use metaball_core::{Error, Ray, Result};
use metaball_math::{Matrix4, mix};

/// Output size in pixels; both sides are non-zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidParameter(format!(
                "viewport must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width divided by height
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Per-frame ray setup derived from a camera and viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRays {
    pub eye: DVec3,
    pub inverse_view: Matrix4,
    pub inverse_projection: Matrix4,
    /// NDC (-1, -1)
    pub ray00: DVec4,
    /// NDC (-1, +1)
    pub ray01: DVec4,
    /// NDC (+1, -1)
    pub ray10: DVec4,
    /// NDC (+1, +1)
    pub ray11: DVec4,
    viewport: Viewport,
}

impl CameraRays {
    /// Build the inverse matrices and corner rays.
    ///
    /// Fails with [`Error::InvalidMatrix`] when the camera basis is
    /// degenerate or the projection cannot be inverted.
    pub fn new(camera: &Camera, viewport: Viewport) -> Result<Self> {
        let view = camera.view()?;
        let inverse_view = view.inverse()?;
        let inverse_projection = camera.projection(viewport.aspect()).inverse()?;

        Ok(Self::from_matrices(
            camera.eye,
            inverse_view,
            inverse_projection,
            viewport,
        ))
    }

    /// Like [`CameraRays::new`], but substitutes identity matrices when the
    /// camera cannot be inverted so the frame still renders.
    pub fn or_identity(camera: &Camera, viewport: Viewport) -> Self {
        Self::new(camera, viewport).unwrap_or_else(|err| {
            tracing::warn!(%err, eye = %camera.eye, "camera matrices not invertible, using identity");
            Self::from_matrices(camera.eye, Matrix4::IDENTITY, Matrix4::IDENTITY, viewport)
        })
    }

    pub fn from_matrices(
        eye: DVec3,
        inverse_view: Matrix4,
        inverse_projection: Matrix4,
        viewport: Viewport,
    ) -> Self {
        let corner = |x, y| unproject_ndc(&inverse_view, &inverse_projection, x, y);
        Self {
            eye,
            inverse_view,
            inverse_projection,
            ray00: corner(-1.0, -1.0),
            ray01: corner(-1.0, 1.0),
            ray10: corner(1.0, -1.0),
            ray11: corner(1.0, 1.0),
            viewport,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Interpolated direction at pixel coordinates `(px, py)`, where
    /// `(0, 0)` is the bottom-left corner and `(width, height)` the top-right.
    /// The result has `w = 0` and is not normalized.
    pub fn direction_at(&self, px: f64, py: f64) -> DVec4 {
        let u = px / f64::from(self.viewport.width);
        let v = py / f64::from(self.viewport.height);
        mix(
            mix(self.ray00, self.ray01, v),
            mix(self.ray10, self.ray11, v),
            u,
        )
    }

    /// Direction at `(px, py)` computed by unprojecting its NDC coordinate
    pub fn unproject(&self, px: f64, py: f64) -> DVec4 {
        let x = 2.0 * px / f64::from(self.viewport.width) - 1.0;
        let y = 2.0 * py / f64::from(self.viewport.height) - 1.0;
        unproject_ndc(&self.inverse_view, &self.inverse_projection, x, y)
    }

    /// Primary ray through `(px, py)`, starting at the eye
    pub fn ray_at(&self, px: f64, py: f64) -> Result<Ray> {
        Ray::new(self.eye, self.direction_at(px, py).truncate())
    }

    /// Pixel-center coordinates for framebuffer `(column, row)`, with row 0 at
    /// the top of the image.
    pub fn pixel_center(&self, column: u32, row: u32) -> (f64, f64) {
        (
            f64::from(column) + 0.5,
            f64::from(self.viewport.height) - f64::from(row) - 0.5,
        )
    }
}

/// Near-plane point for NDC `(x, y)` in camera space, rescaled to unit depth
/// and rotated into world space as a direction.
fn unproject_ndc(inverse_view: &Matrix4, inverse_projection: &Matrix4, x: f64, y: f64) -> DVec4 {
    let clip = inverse_projection.transform(DVec4::new(x, y, -1.0, 1.0));
    let point = clip.truncate() / clip.w;
    // The near plane sits at 1e-5; directions that short fall under the
    // normalization epsilon.
    let point = if point.z == 0.0 { point } else { point / -point.z };
    inverse_view.transform(point.extend(0.0))
}
