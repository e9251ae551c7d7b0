//! `rtw` - render one of the built-in scenes to an image file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rtw_tracer::{save_image, Camera, SeedMode, Vec3};

mod scenes;

use scenes::SceneKind;

/// Render a sphere scene with a stochastic ray tracer
#[derive(Debug, Parser)]
#[command(name = "rtw", version, about)]
struct Args {
    /// Scene to render
    #[arg(long, value_enum, default_value_t = SceneKind::Spheres)]
    scene: SceneKind,

    /// Output file; the format follows the extension (png, ppm)
    #[arg(short, long, default_value = "results/render.png")]
    output: PathBuf,

    /// Image width in pixels
    #[arg(short, long, default_value_t = 400)]
    width: usize,

    /// Aspect ratio (width / height)
    #[arg(long, default_value_t = 16.0 / 9.0)]
    aspect: f64,

    /// Samples per pixel
    #[arg(short, long, default_value_t = 100)]
    samples: u32,

    /// Maximum number of bounces per ray
    #[arg(long, default_value_t = 50)]
    max_depth: u32,

    /// Vertical field of view in degrees (scene default if omitted)
    #[arg(long)]
    vfov: Option<f32>,

    /// Defocus angle in degrees; 0 disables depth of field (scene default if omitted)
    #[arg(long)]
    defocus_angle: Option<f32>,

    /// Distance to the plane of perfect focus (scene default if omitted)
    #[arg(long)]
    focus_dist: Option<f32>,

    /// Fixed seed for reproducible renders; random if omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads (defaults to available parallelism)
    #[arg(short = 'j', long)]
    threads: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let (scene, view) = scenes::build(args.scene, args.seed.unwrap_or(0));
    log::info!("Built {:?} scene with {} objects", args.scene, scene.len());

    let defocus_angle = args.defocus_angle.unwrap_or(view.defocus_angle);
    let focus_dist = args
        .focus_dist
        .or(view.focus_dist)
        .unwrap_or_else(|| (view.look_at - view.look_from).length());

    let mut camera = Camera::new()
        .with_image(args.width, args.aspect)
        .with_quality(args.samples, args.max_depth)
        .with_position(view.look_from, view.look_at, Vec3::Y)
        .with_fov(args.vfov.unwrap_or(view.vfov))
        .with_defocus(defocus_angle, focus_dist)
        .with_seed(args.seed.map_or(SeedMode::Entropy, SeedMode::Fixed));

    if let Some(threads) = args.threads {
        camera = camera.with_threads(threads);
    }

    let image = camera.render(&scene).context("render failed")?;
    save_image(image, &args.output)
        .with_context(|| format!("could not write {}", args.output.display()))?;

    Ok(())
}
