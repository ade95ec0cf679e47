//! CPU raymarching backend
//!
//! Rows are traced in parallel with rayon. Each pixel is independent and only
//! reads the submitted scene and camera rays.

use crate::backend::{RenderBackend, RenderStats};
use crate::camera::Camera;
use crate::framebuffer::Framebuffer;
use crate::rays::{CameraRays, Viewport};
use crate::upload::SceneUpload;
use crate::{RenderError, Result};
use metaball_core::{BoundPolicy, MarchSettings, Scene, Tracer};
use rayon::prelude::*;
use std::time::Instant;

/// Renders the metaball field on the CPU
#[derive(Debug)]
pub struct CpuRaymarcher {
    policy: BoundPolicy,
    march: MarchSettings,
    scene: Option<Scene>,
    rays: Option<CameraRays>,
    framebuffer: Framebuffer,
    stats: RenderStats,
}

impl CpuRaymarcher {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            policy: BoundPolicy::default(),
            march: MarchSettings::default(),
            scene: None,
            rays: None,
            framebuffer: Framebuffer::new(viewport),
            stats: RenderStats::default(),
        }
    }

    pub fn with_policy(mut self, policy: BoundPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_march_settings(mut self, march: MarchSettings) -> Self {
        self.march = march;
        self
    }

    pub fn camera_rays(&self) -> Option<&CameraRays> {
        self.rays.as_ref()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }
}

impl RenderBackend for CpuRaymarcher {
    fn name(&self) -> &str {
        "cpu"
    }

    fn submit_scene(&mut self, scene: &SceneUpload) -> Result<()> {
        self.scene = Some(scene.to_scene()?);
        Ok(())
    }

    fn submit_camera(&mut self, camera: &Camera, viewport: Viewport) -> Result<()> {
        camera.validate()?;
        self.rays = Some(CameraRays::or_identity(camera, viewport));
        self.framebuffer.resize(viewport);
        Ok(())
    }

    fn render(&mut self) -> Result<&Framebuffer> {
        let scene = self.scene.as_ref().ok_or(RenderError::NotReady("scene"))?;
        let rays = self.rays.as_ref().ok_or(RenderError::NotReady("camera"))?;
        let tracer = Tracer::new(scene, self.policy, self.march);
        let width = rays.viewport().width() as usize;
        let background = scene.background.as_vec3();

        let start = Instant::now();
        let stats = self
            .framebuffer
            .pixels_mut()
            .par_chunks_mut(width)
            .enumerate()
            .map(|(row, pixels)| {
                let mut stats = RenderStats::default();
                for (column, pixel) in pixels.iter_mut().enumerate() {
                    let (px, py) = rays.pixel_center(column as u32, row as u32);
                    *pixel = match rays.ray_at(px, py) {
                        Ok(ray) => {
                            let shaded = tracer.trace(&ray);
                            stats.record(&shaded.outcome);
                            shaded.color.as_vec3()
                        }
                        Err(_) => {
                            stats.degenerate_rays += 1;
                            background
                        }
                    };
                }
                stats
            })
            .reduce(RenderStats::default, RenderStats::merge);

        if stats.degenerate_normals > 0 || stats.degenerate_rays > 0 {
            tracing::warn!(
                normals = stats.degenerate_normals,
                rays = stats.degenerate_rays,
                "degenerate vectors replaced with zero"
            );
        }
        tracing::debug!(
            hits = stats.hits,
            escaped = stats.escaped,
            exhausted = stats.exhausted,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "frame traced"
        );

        self.stats = stats;
        Ok(&self.framebuffer)
    }

    fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    fn last_stats(&self) -> RenderStats {
        self.stats
    }
}
