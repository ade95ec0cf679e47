//! Metaballs CLI - render, animate and probe the metaball raymarcher

mod args;

use anyhow::{Context, Result, bail};
use args::{Overrides, parse_nudge};
use clap::{Parser, Subcommand};
use glam::DVec3;
use metaball_core::{March, MarchSettings, Ray, Scene, Tracer, intersect};
use metaball_engine::{Command, FrameDriver, RenderSettings};
use metaball_render::{CameraRays, CpuRaymarcher, Nudge};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "metaballs")]
#[command(about = "Sphere-traced metaballs on the CPU", long_about = None)]
#[command(version)]
struct Cli {
    /// Settings file (JSON); defaults to the user config directory
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace); overrides RUST_LOG
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a single frame to a PNG file
    Render {
        /// Output image file (.png)
        #[arg(short, long, default_value = "metaballs.png")]
        output: PathBuf,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Simulate a fixed-timestep animation and write a numbered PNG sequence
    Animate {
        /// Output directory
        #[arg(short, long, default_value = "frames")]
        output: PathBuf,

        /// Number of frames to render
        #[arg(short = 'n', long, default_value = "60")]
        frames: u32,

        /// Simulated frames per second (timestep = 1 / fps)
        #[arg(long, default_value = "30")]
        fps: u32,

        /// Camera nudge applied before the first frame (repeatable):
        /// forward, back, left, right, up, down
        #[arg(long, value_parser = parse_nudge)]
        nudge: Vec<Nudge>,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// March a single ray and print what it hits
    Probe {
        /// Pixel to trace as COLUMN,ROW (row 0 at the top)
        #[arg(long, value_parser = args::parse_pixel, conflicts_with_all = ["origin", "direction"])]
        pixel: Option<(u32, u32)>,

        /// Ray origin as X,Y,Z (defaults to the camera eye)
        #[arg(long, value_parser = args::parse_vec3, allow_hyphen_values = true)]
        origin: Option<DVec3>,

        /// Ray direction as X,Y,Z (defaults to the camera direction)
        #[arg(long, value_parser = args::parse_vec3, allow_hyphen_values = true)]
        direction: Option<DVec3>,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Print the effective settings as JSON
    Config {
        /// Also write them to the default settings file
        #[arg(long)]
        save: bool,

        #[command(flatten)]
        overrides: Overrides,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let base = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Render { output, overrides } => {
            run_render(overrides.apply(base), &output)?;
        }
        Commands::Animate {
            output,
            frames,
            fps,
            nudge,
            overrides,
        } => {
            run_animate(overrides.apply(base), &output, frames, fps, &nudge)?;
        }
        Commands::Probe {
            pixel,
            origin,
            direction,
            overrides,
        } => {
            run_probe(&overrides.apply(base), pixel, origin, direction)?;
        }
        Commands::Config { save, overrides } => {
            run_config(&overrides.apply(base), save)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_settings(path: Option<&Path>) -> Result<RenderSettings> {
    match path {
        Some(path) => RenderSettings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => RenderSettings::load_or_default().context("Failed to load default settings"),
    }
}

fn new_driver(settings: RenderSettings) -> Result<FrameDriver<CpuRaymarcher>> {
    let backend = CpuRaymarcher::new(settings.viewport()?)
        .with_policy(settings.bound_policy)
        .with_march_settings(settings.march);
    Ok(FrameDriver::new(settings, backend)?)
}

fn run_render(settings: RenderSettings, output: &Path) -> Result<()> {
    println!(
        "Rendering to {} ({}x{})...",
        output.display(),
        settings.width,
        settings.height
    );

    let mut driver = new_driver(settings)?;
    let start = Instant::now();
    let frame = driver.frame(Duration::ZERO)?;
    let elapsed = start.elapsed();

    frame.framebuffer.save_png(output)?;
    println!(
        "Saved to: {} in {:.1}ms ({} hits, {} escaped, {} exhausted)",
        output.display(),
        elapsed.as_secs_f64() * 1000.0,
        frame.stats.hits,
        frame.stats.escaped,
        frame.stats.exhausted
    );

    Ok(())
}

fn run_animate(
    settings: RenderSettings,
    output: &Path,
    frames: u32,
    fps: u32,
    nudges: &[Nudge],
) -> Result<()> {
    if frames == 0 {
        bail!("Nothing to render: --frames must be at least 1");
    }
    if fps == 0 {
        bail!("--fps must be at least 1");
    }

    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    println!(
        "Animating {} frames at {} fps into {}...",
        frames,
        fps,
        output.display()
    );

    let mut driver = new_driver(settings)?;
    let controls = driver.controls();
    for &nudge in nudges {
        controls.push(Command::Nudge(nudge));
    }

    let timestep = Duration::from_secs_f64(1.0 / f64::from(fps));
    for _ in 0..frames {
        let frame = driver.frame(timestep)?;
        let path = output.join(format!("frame_{:04}.png", frame.index));
        frame.framebuffer.save_png(&path)?;
    }

    println!(
        "Done: {} frames, {}",
        driver.frame_index(),
        driver.fps().display_string()
    );

    Ok(())
}

fn run_probe(
    settings: &RenderSettings,
    pixel: Option<(u32, u32)>,
    origin: Option<DVec3>,
    direction: Option<DVec3>,
) -> Result<()> {
    settings.validate()?;

    let mut scene = Scene::spawn_seeded(&settings.spawn, settings.seed)?;
    let camera = settings.camera;
    scene.light = settings.light.position(camera.eye);

    let ray = match pixel {
        Some((column, row)) => {
            let viewport = settings.viewport()?;
            if column >= viewport.width() || row >= viewport.height() {
                bail!(
                    "Pixel {column},{row} is outside the {}x{} viewport",
                    viewport.width(),
                    viewport.height()
                );
            }
            let rays = CameraRays::new(&camera, viewport)?;
            let (px, py) = rays.pixel_center(column, row);
            rays.ray_at(px, py)?
        }
        None => Ray::new(
            origin.unwrap_or(camera.eye),
            direction.unwrap_or(camera.direction),
        )?,
    };

    let tracer = Tracer::new(&scene, settings.bound_policy, settings.march);
    let march = intersect(tracer.field(), &ray, &settings.march);
    let shaded = tracer.trace(&ray);

    println!("Ray:       {} -> {}", ray.origin, ray.direction);
    print_march(&march, &settings.march);
    if let Some(hit) = shaded.outcome.hit() {
        println!("Position:  {}", hit.position);
        println!("Normal:    {}", hit.normal);
        match hit.dominant {
            Some(index) => println!("Dominant:  blob {index}"),
            None => println!("Dominant:  none (fallback color)"),
        }
    }
    println!("Color:     {}", shaded.color);

    Ok(())
}

fn print_march(march: &March, settings: &MarchSettings) {
    println!(
        "Result:    {:?} after {} of {} steps",
        march.termination, march.steps, settings.max_steps
    );
    println!("Distance:  {}", march.t);
    println!("Influence: {} blob(s)", march.sample.influence);
}

fn run_config(settings: &RenderSettings, save: bool) -> Result<()> {
    settings.validate()?;
    println!("{}", settings.to_json()?);

    if save {
        let path = settings.save_default()?;
        println!("Saved to: {}", path.display());
    }

    Ok(())
}
