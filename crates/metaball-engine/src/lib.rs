//! # Metaball Engine
//!
//! Drives the metaball raymarcher one frame at a time.
//!
//! [`FrameDriver`] owns the [`Scene`](metaball_core::Scene) and
//! [`Camera`](metaball_render::Camera), applies host [`Command`]s queued on a
//! [`ControlQueue`], advances the blobs, derives the light and hands the
//! result to a [`RenderBackend`](metaball_render::RenderBackend).
//! [`RenderSettings`] holds everything needed to start.
//!
//! ## Example
//!
//! ```rust
//! use metaball_engine::{Command, FrameDriver, RenderSettings};
//! use metaball_render::{CpuRaymarcher, Nudge};
//! use std::time::Duration;
//!
//! let settings = RenderSettings { width: 32, height: 24, ..Default::default() };
//! let backend = CpuRaymarcher::new(settings.viewport()?);
//! let mut driver = FrameDriver::new(settings, backend)?;
//!
//! driver.controls().push(Command::Nudge(Nudge::Forward));
//! let frame = driver.frame(Duration::from_millis(16))?;
//! assert_eq!(frame.framebuffer.width(), 32);
//! # Ok::<(), metaball_engine::EngineError>(())
//! ```

pub mod controls;
pub mod driver;
pub mod fps;
pub mod light;
pub mod settings;

mod error;

pub use controls::{Command, ControlQueue};
pub use driver::{Frame, FrameDriver};
pub use error::{EngineError, Result};
pub use fps::FpsCounter;
pub use light::LightRig;
pub use settings::RenderSettings;
