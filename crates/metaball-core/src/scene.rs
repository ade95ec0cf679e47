//! Scene state: the blobs, the light and the background
//!
//! The blob count is fixed when a scene is created. Positions and velocities
//! change every frame; nothing else does.

use crate::{Error, Result};
use glam::DVec3;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

/// Reflectance stored on every blob. Not used by the lighting model.
pub const REFLECTANCE: f64 = 0.2;

/// Color written for rays that miss every blob
pub const BACKGROUND: DVec3 = DVec3::ZERO;

/// One metaball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blob {
    pub center: DVec3,
    /// Radius of the influence (bounding) sphere
    pub radius: f64,
    /// Linear RGB in `[0, 1]`
    pub diffuse: DVec3,
    pub reflectance: f64,
    /// Units per second before the speed factor is applied
    pub velocity: DVec3,
}

impl Blob {
    pub fn new(center: DVec3, radius: f64, diffuse: DVec3) -> Self {
        Self {
            center,
            radius,
            diffuse,
            reflectance: REFLECTANCE,
            velocity: DVec3::ZERO,
        }
    }

    pub fn with_velocity(mut self, velocity: DVec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Distance from `p` to the bounding sphere surface (negative inside)
    pub fn boundary_distance(&self, p: DVec3) -> f64 {
        (p - self.center).length() - self.radius
    }
}

/// Where and how blobs are spawned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Number of blobs; fixed for the life of the scene
    pub count: usize,
    /// Lower corner of the spawn cube (same on every axis)
    pub low: i32,
    /// Upper corner of the spawn cube (same on every axis)
    pub high: i32,
    pub min_radius: i32,
    pub max_radius: i32,
    /// Velocity components are drawn from `-max_speed..=max_speed`
    pub max_speed: i32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            count: 5,
            low: 30,
            high: 50,
            min_radius: 1,
            max_radius: 10,
            max_speed: 1,
        }
    }
}

impl SpawnConfig {
    pub fn validate(&self) -> Result<()> {
        if self.low > self.high {
            return Err(Error::InvalidParameter(format!(
                "spawn box low ({}) is above high ({})",
                self.low, self.high
            )));
        }
        if self.min_radius < 1 || self.min_radius > self.max_radius {
            return Err(Error::InvalidParameter(format!(
                "blob radius range {}..={} is empty or not positive",
                self.min_radius, self.max_radius
            )));
        }
        if self.max_speed < 0 {
            return Err(Error::InvalidParameter(format!(
                "max_speed must not be negative, got {}",
                self.max_speed
            )));
        }
        Ok(())
    }
}

/// The blobs plus the light that illuminates them
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    blobs: Vec<Blob>,
    pub light: DVec3,
    pub background: DVec3,
}

impl Scene {
    /// Create a scene from explicit blobs.
    ///
    /// Every radius must be finite and positive.
    pub fn new(blobs: Vec<Blob>, light: DVec3) -> Result<Self> {
        if let Some((index, blob)) = blobs
            .iter()
            .enumerate()
            .find(|(_, b)| !(b.radius.is_finite() && b.radius > 0.0))
        {
            return Err(Error::InvalidParameter(format!(
                "blob {index} has radius {}",
                blob.radius
            )));
        }
        if let Some(index) = blobs.iter().position(|b| !b.center.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "blob {index} has a non-finite center"
            )));
        }

        Ok(Self {
            blobs,
            light,
            background: BACKGROUND,
        })
    }

    /// Spawn `config.count` random blobs.
    ///
    /// Positions, radii and velocity components are integers; color channels
    /// are multiples of `0.01`.
    pub fn spawn<R: Rng>(config: &SpawnConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;

        let blobs = (0..config.count)
            .map(|_| {
                let radius = rng.gen_range(config.min_radius..=config.max_radius);
                let mut coord = || f64::from(rng.gen_range(config.low..=config.high));
                let center = DVec3::new(coord(), coord(), coord());

                let mut speed = || f64::from(rng.gen_range(-config.max_speed..=config.max_speed));
                let velocity = DVec3::new(speed(), speed(), speed());

                let mut channel = || f64::from(rng.gen_range(0..=100_u8)) / 100.0;
                let diffuse = DVec3::new(channel(), channel(), channel());

                Blob::new(center, f64::from(radius), diffuse).with_velocity(velocity)
            })
            .collect();

        Self::new(blobs, DVec3::ZERO)
    }

    /// Spawn with a deterministic generator
    pub fn spawn_seeded(config: &SpawnConfig, seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::spawn(config, &mut rng)
    }

    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    /// Mutable access to the blobs. The slice cannot grow or shrink.
    pub fn blobs_mut(&mut self) -> &mut [Blob] {
        &mut self.blobs
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Diffuse color of blob `index`, if it exists
    pub fn diffuse(&self, index: usize) -> Option<DVec3> {
        self.blobs.get(index).map(|b| b.diffuse)
    }
}
