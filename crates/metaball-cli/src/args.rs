//! Shared command-line options and value parsers

use clap::{Args, ValueEnum};
use glam::DVec3;
use metaball_core::{BoundPolicy, WallResponse};
use metaball_engine::{LightRig, RenderSettings};
use metaball_render::Nudge;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LightArg {
    MirroredEye,
    Headlight,
}

impl From<LightArg> for LightRig {
    fn from(arg: LightArg) -> Self {
        match arg {
            LightArg::MirroredEye => Self::MirroredEye,
            LightArg::Headlight => Self::Headlight,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum WallArg {
    Reflect,
    Coupled,
}

impl From<WallArg> for WallResponse {
    fn from(arg: WallArg) -> Self {
        match arg {
            WallArg::Reflect => Self::Reflect,
            WallArg::Coupled => Self::Coupled,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BoundArg {
    Nearest,
    LastChecked,
}

impl From<BoundArg> for BoundPolicy {
    fn from(arg: BoundArg) -> Self {
        match arg {
            BoundArg::Nearest => Self::Nearest,
            BoundArg::LastChecked => Self::LastChecked,
        }
    }
}

/// Flags that override the loaded settings
#[derive(Args, Clone, Debug, Default)]
pub struct Overrides {
    /// Image width
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height
    #[arg(long)]
    pub height: Option<u32>,

    /// Spawn seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of blobs
    #[arg(long)]
    pub blobs: Option<usize>,

    /// Speed slider (speed = slider * 0.1)
    #[arg(long)]
    pub speed: Option<f64>,

    /// Start paused
    #[arg(long)]
    pub paused: bool,

    /// Eye position as X,Y,Z
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    pub eye: Option<DVec3>,

    /// Light placement
    #[arg(long, value_enum)]
    pub light: Option<LightArg>,

    /// Velocity response at the walls
    #[arg(long, value_enum)]
    pub walls: Option<WallArg>,

    /// Which bounding sphere the out-of-range step uses
    #[arg(long, value_enum)]
    pub bound: Option<BoundArg>,
}

impl Overrides {
    pub fn apply(&self, mut settings: RenderSettings) -> RenderSettings {
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }
        if let Some(blobs) = self.blobs {
            settings.spawn.count = blobs;
        }
        if let Some(speed) = self.speed {
            settings.speed_slider = speed;
        }
        if self.paused {
            settings.playing = false;
        }
        if let Some(eye) = self.eye {
            settings.camera.eye = eye;
        }
        if let Some(light) = self.light {
            settings.light = light.into();
        }
        if let Some(walls) = self.walls {
            settings.wall_response = walls.into();
        }
        if let Some(bound) = self.bound {
            settings.bound_policy = bound.into();
        }
        settings
    }
}

/// Parse `X,Y,Z`
pub fn parse_vec3(s: &str) -> Result<DVec3, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("'{p}': {e}")))
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        &[x, y, z] => Ok(DVec3::new(x, y, z)),
        _ => Err(format!("expected X,Y,Z, got '{s}'")),
    }
}

/// Parse `COLUMN,ROW`
pub fn parse_pixel(s: &str) -> Result<(u32, u32), String> {
    let (column, row) = s
        .split_once(',')
        .ok_or_else(|| format!("expected COLUMN,ROW, got '{s}'"))?;
    let parse = |v: &str| v.trim().parse::<u32>().map_err(|e| format!("'{v}': {e}"));
    Ok((parse(column)?, parse(row)?))
}

pub fn parse_nudge(s: &str) -> Result<Nudge, String> {
    match s.to_ascii_lowercase().as_str() {
        "forward" | "w" => Ok(Nudge::Forward),
        "back" | "s" => Ok(Nudge::Back),
        "left" | "a" => Ok(Nudge::Left),
        "right" | "d" => Ok(Nudge::Right),
        "up" => Ok(Nudge::Up),
        "down" => Ok(Nudge::Down),
        _ => Err(format!(
            "unknown nudge '{s}' (expected forward, back, left, right, up or down)"
        )),
    }
}
