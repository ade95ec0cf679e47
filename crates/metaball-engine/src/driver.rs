//! The frame loop
//!
//! Each frame runs the same phases in order:
//!
//! 1. drain the control queue and apply every command;
//! 2. advance the blobs when playing;
//! 3. derive the light from the eye;
//! 4. upload the scene and camera to the backend;
//! 5. render and tick the FPS counter.
//!
//! Nothing mutates the scene while the backend is rendering.

use crate::controls::{Command, ControlQueue};
use crate::settings::RenderSettings;
use crate::{FpsCounter, Result};
use metaball_core::{Integrator, Scene};
use metaball_render::{Camera, Framebuffer, RenderBackend, RenderStats, SceneUpload, Viewport};
use std::time::Duration;

/// What one call to [`FrameDriver::frame`] produced
#[derive(Debug)]
pub struct Frame<'a> {
    /// Zero-based frame number since the driver was created
    pub index: u64,
    pub stats: RenderStats,
    pub framebuffer: &'a Framebuffer,
}

/// Owns the scene and camera and drives a backend frame by frame
#[derive(Debug)]
pub struct FrameDriver<B: RenderBackend> {
    settings: RenderSettings,
    viewport: Viewport,
    scene: Scene,
    camera: Camera,
    integrator: Integrator,
    backend: B,
    controls: ControlQueue,
    playing: bool,
    speed_slider: f64,
    fps: FpsCounter,
    frame_index: u64,
}

impl<B: RenderBackend> FrameDriver<B> {
    /// Validate the settings, spawn the scene and take ownership of `backend`
    pub fn new(settings: RenderSettings, backend: B) -> Result<Self> {
        settings.validate()?;
        let viewport = settings.viewport()?;
        let scene = Scene::spawn_seeded(&settings.spawn, settings.seed)?;
        let integrator = Integrator::new(settings.walls(), settings.wall_response);

        tracing::info!(
            blobs = scene.len(),
            seed = settings.seed,
            width = viewport.width(),
            height = viewport.height(),
            backend = backend.name(),
            "frame driver ready"
        );

        Ok(Self {
            viewport,
            scene,
            camera: settings.camera,
            integrator,
            backend,
            controls: ControlQueue::new(),
            playing: settings.playing,
            speed_slider: settings.speed_slider,
            fps: FpsCounter::new(),
            frame_index: 0,
            settings,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// A handle for pushing commands, usable from any thread
    pub fn controls(&self) -> ControlQueue {
        self.controls.clone()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Current speed factor (`slider * 0.1`)
    pub fn speed(&self) -> f64 {
        RenderSettings::speed_for(self.speed_slider)
    }

    pub fn fps(&self) -> &FpsCounter {
        &self.fps
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    // ========================================================================
    // Frame loop
    // ========================================================================

    /// Apply pending input, advance by `elapsed` when playing, then render
    pub fn frame(&mut self, elapsed: Duration) -> Result<Frame<'_>> {
        for command in self.controls.drain() {
            self.apply(command);
        }

        if self.playing {
            let scale = RenderSettings::time_scale_for(self.speed_slider);
            self.integrator.advance(&mut self.scene, elapsed.as_secs_f64(), scale);
        }

        self.scene.light = self.settings.light.position(self.camera.eye);

        self.backend.submit_scene(&SceneUpload::from_scene(&self.scene))?;
        self.backend.submit_camera(&self.camera, self.viewport)?;
        self.fps.tick();

        let index = self.frame_index;
        self.frame_index += 1;
        tracing::debug!(frame = index, eye = %self.camera.eye, playing = self.playing, "rendering frame");

        self.backend.render()?;
        Ok(Frame {
            index,
            stats: self.backend.last_stats(),
            framebuffer: self.backend.framebuffer(),
        })
    }

    /// Respawn the blobs with the configured seed and restore the camera
    pub fn reset(&mut self) -> Result<()> {
        self.scene = Scene::spawn_seeded(&self.settings.spawn, self.settings.seed)?;
        self.camera = self.settings.camera;
        tracing::info!(seed = self.settings.seed, "scene reset");
        Ok(())
    }

    fn apply(&mut self, command: Command) {
        tracing::debug!(?command, "applying command");
        match command {
            Command::Play => self.playing = true,
            Command::Pause => self.playing = false,
            Command::TogglePlay => self.playing = !self.playing,
            Command::SetSpeed(slider) if slider.is_finite() && slider >= 0.0 => {
                self.speed_slider = slider;
            }
            Command::SetSpeed(slider) => {
                tracing::warn!(slider, "ignoring invalid speed");
            }
            Command::Reset => {
                if let Err(err) = self.reset() {
                    tracing::warn!(%err, "reset failed");
                }
            }
            Command::Nudge(nudge) => self.camera.nudge(nudge, self.settings.nudge_step),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LightRig;
    use approx::assert_relative_eq;
    use metaball_core::WallResponse;
    use metaball_render::{CpuRaymarcher, Nudge};

    fn small_settings() -> RenderSettings {
        RenderSettings {
            width: 8,
            height: 6,
            ..Default::default()
        }
    }

    fn driver(settings: RenderSettings) -> FrameDriver<CpuRaymarcher> {
        let backend = CpuRaymarcher::new(settings.viewport().unwrap());
        FrameDriver::new(settings, backend).unwrap()
    }

    #[test]
    fn frames_are_numbered_and_sized() {
        let mut driver = driver(small_settings());
        let first = driver.frame(Duration::ZERO).unwrap();
        assert_eq!(first.index, 0);
        assert_eq!(first.framebuffer.pixels().len(), 48);
        assert_eq!(first.stats.total(), 48);

        assert_eq!(driver.frame(Duration::ZERO).unwrap().index, 1);
        assert_eq!(driver.frame_index(), 2);
    }

    #[test]
    fn playing_moves_blobs_by_velocity_times_scaled_time() {
        let mut driver = driver(small_settings());
        let before = driver.scene().blobs().to_vec();

        driver.frame(Duration::from_millis(500)).unwrap();

        // slider 2 -> speed 0.2 -> time scale 1.0
        for (old, new) in before.iter().zip(driver.scene().blobs()) {
            let expected = old.center + old.velocity * 0.5;
            assert_relative_eq!(new.center.x, expected.x, epsilon = 1e-12);
            assert_relative_eq!(new.center.y, expected.y, epsilon = 1e-12);
            assert_relative_eq!(new.center.z, expected.z, epsilon = 1e-12);
        }
    }

    #[test]
    fn pause_freezes_and_play_resumes() {
        let mut driver = driver(small_settings());
        let controls = driver.controls();
        let start = driver.scene().clone();

        controls.push(Command::Pause);
        driver.frame(Duration::from_secs(1)).unwrap();
        assert!(!driver.is_playing());
        assert_eq!(driver.scene().blobs(), start.blobs());

        controls.push(Command::TogglePlay);
        controls.push(Command::SetSpeed(0.0));
        driver.frame(Duration::from_secs(1)).unwrap();
        assert!(driver.is_playing());
        assert_eq!(driver.speed(), 0.0);
        assert_eq!(driver.scene().blobs(), start.blobs());
    }

    #[test]
    fn light_follows_eye_after_nudges() {
        let mut driver = driver(small_settings());
        let controls = driver.controls();
        controls.push(Command::Nudge(Nudge::Forward));
        controls.push(Command::Nudge(Nudge::Right));
        driver.frame(Duration::ZERO).unwrap();

        let eye = driver.camera().eye;
        assert_eq!(eye, Camera::default().eye + glam::DVec3::new(0.5, 0.0, -0.5));
        assert_eq!(driver.scene().light, eye);
    }

    #[test]
    fn mirrored_rig_flips_eye_depth() {
        let settings = RenderSettings {
            light: LightRig::MirroredEye,
            ..small_settings()
        };
        let mut driver = driver(settings);
        driver.controls().push(Command::Nudge(Nudge::Up));
        driver.frame(Duration::ZERO).unwrap();

        let eye = driver.camera().eye;
        assert_eq!(driver.scene().light, glam::DVec3::new(eye.x, eye.y, -eye.z));
    }

    #[test]
    fn default_settings_render_lit_blobs() {
        let settings = RenderSettings {
            width: 160,
            height: 120,
            ..Default::default()
        };
        let mut driver = driver(settings);
        let frame = driver.frame(Duration::ZERO).unwrap();

        let lit = frame
            .framebuffer
            .pixels()
            .iter()
            .filter(|p| p.max_element() > 1e-3)
            .count() as u64;
        assert!(frame.stats.hits > 0);
        assert!(lit > 0, "{} hits but no lit pixels", frame.stats.hits);
        assert!(lit * 2 >= frame.stats.hits);
    }

    #[test]
    fn reset_restores_spawn_and_camera() {
        let settings = RenderSettings {
            wall_response: WallResponse::Coupled,
            ..small_settings()
        };
        let mut driver = driver(settings);
        let spawned = driver.scene().clone();
        let controls = driver.controls();

        controls.push(Command::Nudge(Nudge::Up));
        driver.frame(Duration::from_secs(3)).unwrap();
        assert_ne!(driver.camera().eye, Camera::default().eye);

        controls.push(Command::Pause);
        controls.push(Command::Reset);
        driver.frame(Duration::from_secs(3)).unwrap();
        assert_eq!(driver.scene().blobs(), spawned.blobs());
        assert_eq!(driver.camera().eye, Camera::default().eye);
    }

    #[test]
    fn invalid_speed_is_ignored() {
        let mut driver = driver(small_settings());
        driver.controls().push(Command::SetSpeed(f64::NAN));
        driver.frame(Duration::ZERO).unwrap();
        assert_relative_eq!(driver.speed(), 0.2);
    }

    #[test]
    fn invalid_settings_fail_construction() {
        let settings = RenderSettings {
            height: 0,
            ..Default::default()
        };
        let backend = CpuRaymarcher::new(Viewport::new(1, 1).unwrap());
        assert!(FrameDriver::new(settings, backend).is_err());
    }
}
