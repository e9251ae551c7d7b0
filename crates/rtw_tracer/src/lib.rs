//! RTW Tracer - CPU ray tracing engine.
//!
//! Renders a static scene of spheres with diffuse, metal and glass
//! materials. Each pixel averages many jittered camera rays; image rows are
//! split across worker threads, each with its own random generator.
//!
//! ```no_run
//! use std::sync::Arc;
//! use rtw_tracer::{save_image, Camera, Color, Lambertian, Material, Scene, Sphere, Vec3};
//!
//! let grey = Arc::new(Material::from(Lambertian::new(Color::splat(0.5))));
//! let mut scene = Scene::new();
//! scene.add(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey));
//!
//! let mut camera = Camera::new().with_image(400, 16.0 / 9.0).with_quality(100, 50);
//! let image = camera.render(&scene)?;
//! save_image(image, "sphere.png")?;
//! # Ok::<(), rtw_tracer::RenderError>(())
//! ```

mod camera;
mod error;
mod hittable;
mod image_buffer;
mod material;
mod output;
mod renderer;
pub mod sampling;
mod scene;
mod sphere;

pub use camera::Camera;
pub use error::{ConfigError, RenderError, RenderResult};
pub use hittable::{Geometry, HitRecord};
pub use image_buffer::{linear_to_gamma, ImageBuffer, Rgb8};
pub use material::{reflect, refract, Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use output::save_image;
pub use renderer::{
    ray_color, render_into, render_pixel, row_ranges, sky_color, SeedMode, HIT_EPSILON,
};
pub use scene::Scene;
pub use sphere::Sphere;

/// Re-export Vec3 and common math types from rtw_math
pub use rtw_math::{Color, Interval, Ray, Vec3};
