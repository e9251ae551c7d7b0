//! Camera for ray generation.
//!
//! The camera is configured builder-style, derives its frame in
//! [`Camera::initialize`], and owns the image produced by [`Camera::render`].

use std::num::NonZeroUsize;

use crate::error::{ConfigError, RenderResult};
use crate::image_buffer::{height_for, ImageBuffer};
use crate::renderer::{self, SeedMode};
use crate::sampling::{random_in_unit_disk, sample_square};
use crate::{Ray, Scene};
use rand::RngCore;
use rtw_math::Vec3;

/// Camera for generating rays into the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    image_width: usize,
    aspect_ratio: f64,
    samples_per_pixel: u32,
    max_depth: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32,                // Vertical field of view in degrees
    defocus_angle: f32,       // Variation angle of rays through each pixel
    focus_dist: Option<f32>,  // Plane of perfect focus; defaults to |look_at - look_from|

    // Execution
    threads: Option<usize>,
    seed: SeedMode,

    // Cached computed values (set by initialize())
    image_height: usize,
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
    samples_scale: f32,

    image: ImageBuffer,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 400,
            aspect_ratio: 16.0 / 9.0,
            samples_per_pixel: 10,
            max_depth: 50,
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: None,
            threads: None,
            seed: SeedMode::Entropy,
            // Cached values (initialized to defaults)
            image_height: 0,
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
            samples_scale: 0.1,
            image: ImageBuffer::new(0, 0),
        }
    }

    /// Set image width and aspect ratio (width / height).
    pub fn with_image(mut self, width: usize, aspect_ratio: f64) -> Self {
        self.image_width = width;
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set the vertical field of view in degrees.
    pub fn with_fov(mut self, vfov: f32) -> Self {
        self.vfov = vfov;
        self
    }

    /// Enable depth of field. An angle of 0 disables it.
    pub fn with_defocus(mut self, defocus_angle: f32, focus_dist: f32) -> Self {
        self.defocus_angle = defocus_angle;
        self.focus_dist = Some(focus_dist);
        self
    }

    /// Set the number of render workers. Defaults to the available parallelism.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Set how worker random generators are seeded.
    pub fn with_seed(mut self, seed: SeedMode) -> Self {
        self.seed = seed;
        self
    }

    /// Validate the settings and derive the viewing frame.
    pub fn initialize(&mut self) -> Result<(), ConfigError> {
        self.validate()?;

        self.image_height = height_for(self.image_width, self.aspect_ratio);
        self.samples_scale = 1.0 / self.samples_per_pixel as f32;
        self.center = self.look_from;

        let focus_dist = self.focus_distance();

        // Calculate viewport dimensions
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * focus_dist;
        let viewport_width = viewport_height * (self.image_width as f32 / self.image_height as f32);

        // Calculate camera basis vectors
        self.w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        // Calculate viewport vectors
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        // Calculate pixel delta vectors
        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        // Calculate upper left pixel location
        let viewport_upper_left =
            self.center - focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;

        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        // Calculate defocus disk basis vectors
        let defocus_radius = focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;

        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.image_width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(ConfigError::InvalidAspectRatio(self.aspect_ratio));
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(ConfigError::InvalidFieldOfView(self.vfov));
        }
        if !(self.defocus_angle.is_finite() && self.defocus_angle >= 0.0) {
            return Err(ConfigError::InvalidDefocusAngle(self.defocus_angle));
        }
        if let Some(d) = self.focus_dist {
            if !(d.is_finite() && d > 0.0) {
                return Err(ConfigError::InvalidFocusDistance(d));
            }
        }
        let view = self.look_from - self.look_at;
        if view.length_squared() < f32::EPSILON * f32::EPSILON {
            return Err(ConfigError::DegenerateViewDirection);
        }
        if self.vup.cross(view.normalize()).length_squared() < 1e-12 {
            return Err(ConfigError::DegenerateUpVector);
        }
        if self.threads == Some(0) {
            return Err(ConfigError::ZeroThreads);
        }
        Ok(())
    }

    /// Render `scene` into the camera's image buffer and return it.
    ///
    /// Blocks until every worker has finished; the returned buffer is
    /// always fully written.
    pub fn render(&mut self, scene: &Scene) -> RenderResult<&ImageBuffer> {
        self.initialize()?;

        let mut image = ImageBuffer::new(self.image_width, self.image_height);
        renderer::render_into(self, scene, &mut image)?;
        self.image = image;

        Ok(&self.image)
    }

    /// Generate a ray for pixel (i, j) with random sampling.
    ///
    /// The target is jittered within the pixel footprint; with a non-zero
    /// defocus angle the origin is jittered across the lens disk.
    pub fn get_ray(&self, i: usize, j: usize, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        Ray::new(ray_origin, (pixel_sample - ray_origin).normalize())
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    /// The most recently rendered image (empty before the first render).
    pub fn image(&self) -> &ImageBuffer {
        &self.image
    }

    pub fn image_width(&self) -> usize {
        self.image_width
    }

    /// Image height; valid after [`initialize`](Self::initialize).
    pub fn image_height(&self) -> usize {
        self.image_height
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Get the samples scale factor (1 / samples_per_pixel).
    pub fn samples_scale(&self) -> f32 {
        self.samples_scale
    }

    pub fn seed(&self) -> SeedMode {
        self.seed
    }

    /// Effective distance to the plane of perfect focus.
    pub fn focus_distance(&self) -> f32 {
        self.focus_dist.unwrap_or_else(|| (self.look_at - self.look_from).length())
    }

    /// Number of render workers, before clamping to the row count.
    pub fn thread_count(&self) -> usize {
        self.threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        })
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
