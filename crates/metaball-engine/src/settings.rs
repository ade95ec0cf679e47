//! Render settings
//!
//! Everything the frame driver needs to start: resolution, spawn rules, motion,
//! camera and lighting. Settings are stored as JSON, by default in
//! `{config_dir}/metaballs/settings.json`.

use crate::controls::{SPEED_PER_SLIDER_STEP, TIME_SCALE};
use crate::light::LightRig;
use crate::{EngineError, Result};
use metaball_core::animation::WALL_MARGIN;
use metaball_core::{BoundPolicy, Error, MarchSettings, SpawnConfig, WallResponse, Walls};
use metaball_render::{Camera, NUDGE_STEP, Viewport};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Seed for spawning and resetting the blobs
    pub seed: u64,
    pub spawn: SpawnConfig,
    /// Distance between the spawn box and the walls
    pub wall_margin: f64,
    pub wall_response: WallResponse,
    /// Speed slider position; the blobs move at `slider * 0.1 * 5` units/s
    pub speed_slider: f64,
    /// Whether the animation runs from the first frame
    pub playing: bool,
    pub camera: Camera,
    pub nudge_step: f64,
    pub light: LightRig,
    pub bound_policy: BoundPolicy,
    pub march: MarchSettings,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            seed: 1,
            spawn: SpawnConfig::default(),
            wall_margin: WALL_MARGIN,
            wall_response: WallResponse::default(),
            speed_slider: 2.0,
            playing: true,
            camera: Camera::default(),
            nudge_step: NUDGE_STEP,
            light: LightRig::default(),
            bound_policy: BoundPolicy::default(),
            march: MarchSettings::default(),
        }
    }
}

impl RenderSettings {
    /// Default settings file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("metaballs").join("settings.json"))
    }

    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&contents)?;
        tracing::info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Load from the default location, falling back to defaults when there
    /// is no file. A file that exists but fails to parse is an error.
    pub fn load_or_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Save to the default location
    pub fn save_default(&self) -> Result<PathBuf> {
        let path = Self::default_path().ok_or(EngineError::NoConfigDir)?;
        self.save(&path)?;
        Ok(path)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings that cannot produce a frame
    pub fn validate(&self) -> Result<()> {
        self.viewport()?;
        self.spawn.validate()?;
        self.camera.validate()?;

        let invalid = |message: String| Err(EngineError::Core(Error::InvalidParameter(message)));
        if !(self.wall_margin.is_finite() && self.wall_margin >= 0.0) {
            return invalid(format!("wall margin must be >= 0, got {}", self.wall_margin));
        }
        if !(self.speed_slider.is_finite() && self.speed_slider >= 0.0) {
            return invalid(format!("speed slider must be >= 0, got {}", self.speed_slider));
        }
        if !(self.nudge_step.is_finite() && self.nudge_step > 0.0) {
            return invalid(format!("nudge step must be > 0, got {}", self.nudge_step));
        }
        if self.march.max_steps == 0 || !(self.march.epsilon > 0.0 && self.march.max_distance > 0.0) {
            return invalid("march settings need epsilon, max_steps and max_distance > 0".to_string());
        }
        Ok(())
    }

    pub fn viewport(&self) -> metaball_core::Result<Viewport> {
        Viewport::new(self.width, self.height)
    }

    pub fn walls(&self) -> Walls {
        Walls::around(&self.spawn, self.wall_margin)
    }

    /// Speed factor for a slider position
    pub fn speed_for(slider: f64) -> f64 {
        slider * SPEED_PER_SLIDER_STEP
    }

    /// Multiplier applied to wall-clock time for a slider position
    pub fn time_scale_for(slider: f64) -> f64 {
        Self::speed_for(slider) * TIME_SCALE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_are_valid() {
        let settings = RenderSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.walls(), Walls::new(10.0, 70.0));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings: RenderSettings =
            serde_json::from_str(r#"{ "width": 64, "light": "mirrored_eye", "camera": { "fov_y": 90.0 } }"#)
                .unwrap();
        assert_eq!(settings.width, 64);
        assert_eq!(settings.height, 600);
        assert_eq!(settings.light, LightRig::MirroredEye);
        assert_eq!(settings.camera.fov_y, 90.0);
        assert_eq!(settings.camera.eye, Camera::default().eye);
    }

    #[test]
    fn json_round_trip_through_file() {
        let path = std::env::temp_dir().join(format!("metaball_settings_{}.json", std::process::id()));
        let settings = RenderSettings {
            seed: 99,
            wall_response: WallResponse::Coupled,
            bound_policy: BoundPolicy::LastChecked,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        let loaded = RenderSettings::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let zero = RenderSettings {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero.validate(),
            Err(EngineError::Core(Error::InvalidParameter(_)))
        ));

        let negative = RenderSettings {
            speed_slider: -1.0,
            ..Default::default()
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn speed_scaling() {
        assert_relative_eq!(RenderSettings::speed_for(2.0), 0.2);
        assert_relative_eq!(RenderSettings::time_scale_for(2.0), 1.0);
    }
}
