//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Iterative bounce loop with a running attenuation product
//! - Anti-aliasing via jittered multi-sampling
//! - Row-partitioned parallel rendering, one random generator per worker

use std::ops::Range;
use std::time::Instant;

use crate::error::RenderResult;
use crate::image_buffer::{ImageBuffer, Rgb8};
use crate::{Camera, Color, Ray, Scene};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use rtw_math::Interval;

/// Intersections closer than this to the ray origin are ignored, so a
/// scattered ray cannot re-hit the surface it leaves (shadow acne).
pub const HIT_EPSILON: f32 = 0.001;

/// How each render worker's random generator is seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedMode {
    /// Fresh OS entropy per worker.
    #[default]
    Entropy,
    /// Derive every worker's seed from this base seed. Renders with the same
    /// seed and worker count are byte-identical.
    Fixed(u64),
}

impl SeedMode {
    /// Build the generator for worker `worker`.
    pub fn rng_for(self, worker: usize) -> StdRng {
        match self {
            SeedMode::Entropy => StdRng::from_entropy(),
            SeedMode::Fixed(base) => StdRng::seed_from_u64(worker_seed(base, worker)),
        }
    }
}

/// Spread `base` and the worker index into well-separated seeds (splitmix64).
fn worker_seed(base: u64, worker: usize) -> u64 {
    let mut z = base.wrapping_add((worker as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Compute the color seen by a ray.
///
/// Follows the ray through at most `depth` scatter events. Running out of
/// depth returns black, which slightly underestimates indirect light in
/// deep scenes.
pub fn ray_color(ray: &Ray, scene: &Scene, depth: u32, rng: &mut dyn RngCore) -> Color {
    let mut throughput = Color::ONE;
    let mut ray = *ray;

    for _ in 0..depth {
        let Some(rec) = scene.hit(&ray, Interval::new(HIT_EPSILON, f32::INFINITY)) else {
            return throughput * sky_color(&ray);
        };

        match rec.material.scatter(&ray, &rec, rng) {
            Some(result) => {
                throughput *= result.attenuation;
                ray = result.scattered;
            }
            // Absorbed
            None => return Color::ZERO,
        }
    }

    Color::ZERO
}

/// Sky gradient: white at the horizon-down end, light blue straight up.
pub fn sky_color(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Render a single pixel with multi-sampling, returning the averaged
/// linear color.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: usize,
    y: usize,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel() {
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, scene, camera.max_depth(), rng);
    }

    pixel_color * camera.samples_scale()
}

/// Split `height` rows into contiguous ranges, one per worker.
///
/// Every range holds `height / workers` rows except the last, which also
/// takes the remainder. The worker count is clamped to `1..=height`, so no
/// range is empty.
pub fn row_ranges(height: usize, workers: usize) -> Vec<Range<usize>> {
    if height == 0 {
        return Vec::new();
    }

    let workers = workers.clamp(1, height);
    let rows_per_worker = height / workers;

    (0..workers)
        .map(|i| {
            let start = i * rows_per_worker;
            let end = if i + 1 == workers {
                height
            } else {
                start + rows_per_worker
            };
            start..end
        })
        .collect()
}

/// Render rows `rows` into `band`, which holds exactly those rows.
fn render_rows(
    camera: &Camera,
    scene: &Scene,
    rows: Range<usize>,
    width: usize,
    band: &mut [Rgb8],
    rng: &mut dyn RngCore,
) {
    for (row, y) in band.chunks_exact_mut(width).zip(rows) {
        for (x, pixel) in row.iter_mut().enumerate() {
            *pixel = Rgb8::from_linear(render_pixel(camera, scene, x, y, rng));
        }
    }
}

/// Render the whole image with one worker per row range.
///
/// `camera` must already be initialized and `image` sized to match it.
/// Workers share `camera` and `scene` read-only and each writes only its own
/// band of rows. Returns once all workers have joined.
pub fn render_into(camera: &Camera, scene: &Scene, image: &mut ImageBuffer) -> RenderResult<()> {
    let width = image.width();
    let height = image.height();
    let ranges = row_ranges(height, camera.thread_count());
    let row_counts: Vec<usize> = ranges.iter().map(|r| r.len()).collect();
    let seed = camera.seed();

    info!(
        "Rendering {}x{} @ {} spp, max depth {}, {} objects, {} workers",
        width,
        height,
        camera.samples_per_pixel(),
        camera.max_depth(),
        scene.len(),
        ranges.len()
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(ranges.len().max(1))
        .thread_name(|i| format!("rtw-worker-{i}"))
        .build()?;

    let start = Instant::now();
    let bands = image.bands_mut(&row_counts);

    pool.install(|| {
        ranges
            .into_par_iter()
            .zip(bands)
            .enumerate()
            .for_each(|(worker, (rows, band))| {
                debug!("worker {worker}: rows {rows:?}, seed {seed:?}");
                let mut rng = seed.rng_for(worker);
                render_rows(camera, scene, rows, width, band, &mut rng);
            });
    });

    info!("Rendered in {:?}", start.elapsed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Dielectric, Lambertian, Material, Metal, Sphere};
    use rtw_math::Vec3;
    use std::sync::Arc;

    fn single_sphere_scene() -> Scene {
        let material = Arc::new(Material::from(Lambertian::new(Color::new(0.5, 0.5, 0.5))));
        let mut scene = Scene::new();
        scene.add(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, material));
        scene
    }

    fn mixed_scene() -> Scene {
        let ground = Arc::new(Material::from(Lambertian::new(Color::new(0.8, 0.8, 0.0))));
        let glass = Arc::new(Material::from(Dielectric::new(Dielectric::GLASS)));
        let metal = Arc::new(Material::from(Metal::new(Color::new(0.8, 0.6, 0.2), 0.3)));

        let mut scene = Scene::new();
        scene.add(Sphere::new(Vec3::new(0.0, -100.5, -1.0), 100.0, ground));
        scene.add(Sphere::new(Vec3::new(-1.0, 0.0, -1.0), 0.5, glass));
        scene.add(Sphere::new(Vec3::new(1.0, 0.0, -1.0), 0.5, metal));
        scene
    }

    fn close(a: Color, b: Color) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_sky_gradient_endpoints() {
        let up = sky_color(&Ray::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0)));
        assert!(close(up, Color::new(0.5, 0.7, 1.0)));

        let down = sky_color(&Ray::new(Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0)));
        assert!(close(down, Color::ONE));
    }

    #[test]
    fn test_sky_gradient_lies_between_endpoints() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..500 {
            let dir = crate::sampling::random_unit_vector(&mut rng);
            let c = sky_color(&Ray::new(Vec3::ZERO, dir));
            assert!((0.5 - 1e-6..=1.0 + 1e-6).contains(&c.x));
            assert!((0.7 - 1e-6..=1.0 + 1e-6).contains(&c.y));
            assert!((c.z - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_zero_depth_is_black() {
        let mut rng = StdRng::seed_from_u64(42);
        let scenes = [Scene::new(), single_sphere_scene(), mixed_scene()];
        let rays = [
            Ray::new(Vec3::ZERO, Vec3::NEG_Z),
            Ray::new(Vec3::ZERO, Vec3::Y),
        ];

        for scene in &scenes {
            for ray in &rays {
                assert_eq!(ray_color(ray, scene, 0, &mut rng), Color::ZERO);
            }
        }
    }

    #[test]
    fn test_miss_returns_sky() {
        let mut rng = StdRng::seed_from_u64(42);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, -1.0));
        let color = ray_color(&ray, &single_sphere_scene(), 10, &mut rng);
        assert!(close(color, sky_color(&ray)));
    }

    #[test]
    fn test_single_bounce_exhausts_depth() {
        // One bounce off the sphere uses up the only level of depth
        let mut camera = Camera::new()
            .with_image(400, 16.0 / 9.0)
            .with_quality(1, 1)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y);
        camera.initialize().unwrap();

        let scene = single_sphere_scene();
        let mut rng = StdRng::seed_from_u64(42);

        let center = camera.get_ray(200, 112, &mut rng);
        assert!(scene.hit(&center, Interval::new(HIT_EPSILON, f32::INFINITY)).is_some());
        assert_eq!(ray_color(&center, &scene, 1, &mut rng), Color::ZERO);
        assert_eq!(render_pixel(&camera, &scene, 200, 112, &mut rng), Color::ZERO);

        let background = camera.get_ray(0, 0, &mut rng);
        assert!(close(ray_color(&background, &scene, 1, &mut rng), sky_color(&background)));
    }

    #[test]
    fn test_diffuse_bounce_is_attenuated_sky() {
        // With depth to spare, a lit diffuse bounce is albedo times sky
        let scene = single_sphere_scene();
        let mut rng = StdRng::seed_from_u64(3);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        for _ in 0..50 {
            let c = ray_color(&ray, &scene, 50, &mut rng);
            assert!(c.max_element() <= 0.5 + 1e-5);
            assert!(c.min_element() >= 0.0);
        }
    }

    #[test]
    fn test_row_ranges_partition() {
        let ranges = row_ranges(10, 3);
        assert_eq!(ranges, vec![0..3, 3..6, 6..10]);

        let ranges = row_ranges(225, 8);
        assert_eq!(ranges.len(), 8);
        assert_eq!(ranges[0].start, 0);
        assert_eq!(ranges.last().unwrap().end, 225);
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }

        // More workers than rows
        assert_eq!(row_ranges(2, 16), vec![0..1, 1..2]);
        assert_eq!(row_ranges(5, 0), vec![0..5]);
        assert!(row_ranges(0, 4).is_empty());
    }

    #[test]
    fn test_worker_seeds_differ() {
        let seeds: Vec<u64> = (0..16).map(|w| worker_seed(7, w)).collect();
        for (i, a) in seeds.iter().enumerate() {
            for b in &seeds[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(worker_seed(7, 3), worker_seed(7, 3));
    }

    #[test]
    fn test_fixed_seed_render_is_reproducible() {
        let scene = mixed_scene();
        let make_camera = || {
            Camera::new()
                .with_image(48, 16.0 / 9.0)
                .with_quality(4, 8)
                .with_position(Vec3::new(-2.0, 2.0, 1.0), Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
                .with_threads(4)
                .with_seed(SeedMode::Fixed(2024))
        };

        let mut first = make_camera();
        let a = first.render(&scene).unwrap().clone();
        let mut second = make_camera();
        let b = second.render(&scene).unwrap().clone();

        assert_eq!(a.width(), 48);
        assert_eq!(a.height(), 27);
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_every_pixel_is_written() {
        // Nothing to hit: every pixel shows sky, which is never black
        let mut camera = Camera::new()
            .with_image(37, 37.0 / 23.0)
            .with_quality(1, 4)
            .with_threads(5)
            .with_seed(SeedMode::Fixed(1));

        let image = camera.render(&Scene::new()).unwrap();
        assert_eq!(image.height(), 23);
        assert!(image.pixels().iter().all(|p| *p != Rgb8::BLACK));
        assert_eq!(camera.image().width(), 37);
    }

    #[test]
    fn test_render_reports_invalid_config() {
        let mut camera = Camera::new().with_quality(0, 4);
        let err = camera.render(&Scene::new()).unwrap_err();
        assert!(matches!(
            err,
            crate::RenderError::InvalidConfig(crate::ConfigError::ZeroSamples)
        ));
    }
}
