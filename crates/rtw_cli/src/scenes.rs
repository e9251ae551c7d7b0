//! Built-in demo scenes.

use std::sync::Arc;

use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rtw_tracer::{Color, Dielectric, Lambertian, Material, Metal, Scene, Sphere, Vec3};

#[cfg(test)]
use rtw_tracer::Geometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Ground, a diffuse ball, a hollow glass ball and a brushed metal ball
    Spheres,
    /// Three large spheres among a field of small random ones
    Cover,
}

/// Where a scene wants to be viewed from unless overridden on the command line.
#[derive(Debug, Clone, Copy)]
pub struct View {
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vfov: f32,
    pub defocus_angle: f32,
    pub focus_dist: Option<f32>,
}

pub fn build(kind: SceneKind, seed: u64) -> (Scene, View) {
    match kind {
        SceneKind::Spheres => spheres(),
        SceneKind::Cover => cover(seed),
    }
}

fn shared(material: impl Into<Material>) -> Arc<Material> {
    Arc::new(material.into())
}

fn spheres() -> (Scene, View) {
    let ground = shared(Lambertian::new(Color::new(0.8, 0.8, 0.0)));
    let center = shared(Lambertian::new(Color::new(0.1, 0.2, 0.5)));
    let left = shared(Dielectric::new(Dielectric::GLASS));
    let bubble = shared(Dielectric::new(Dielectric::AIR / Dielectric::GLASS));
    let right = shared(Metal::new(Color::new(0.8, 0.6, 0.2), 0.8));

    let scene = Scene::from_iter([
        Sphere::new(Vec3::new(0.0, -100.5, -1.0), 100.0, ground),
        Sphere::new(Vec3::new(0.0, 0.0, -1.2), 0.5, center),
        Sphere::new(Vec3::new(-1.0, 0.0, -1.0), 0.5, left),
        Sphere::new(Vec3::new(-1.0, 0.0, -1.0), 0.4, bubble),
        Sphere::new(Vec3::new(1.0, 0.0, -1.0), 0.5, right),
    ]);

    let view = View {
        look_from: Vec3::new(-2.0, 2.0, 1.0),
        look_at: Vec3::new(0.0, 0.0, -1.0),
        vfov: 90.0,
        defocus_angle: 0.0,
        focus_dist: None,
    };

    (scene, view)
}

fn cover(seed: u64) -> (Scene, View) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut scene = Scene::new();

    // Ground
    scene.add(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        shared(Lambertian::new(Color::new(0.5, 0.5, 0.5))),
    ));

    // One glass material shared by every glass sphere
    let glass = shared(Dielectric::new(Dielectric::GLASS));

    for a in -11..11 {
        for b in -11..11 {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f32 = rng.gen();
            let material = if choose_mat < 0.8 {
                // Diffuse
                let albedo = Color::new(
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                );
                shared(Lambertian::new(albedo))
            } else if choose_mat < 0.95 {
                // Metal
                let albedo = Color::new(
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                );
                shared(Metal::new(albedo, rng.gen_range(0.0..0.5)))
            } else {
                glass.clone()
            };

            scene.add(Sphere::new(center, 0.2, material));
        }
    }

    // Three main spheres
    scene.add(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass));
    scene.add(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        shared(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    ));
    scene.add(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        shared(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    ));

    let view = View {
        look_from: Vec3::new(13.0, 2.0, 3.0),
        look_at: Vec3::ZERO,
        vfov: 20.0,
        defocus_angle: 0.6,
        focus_dist: Some(10.0),
    };

    (scene, view)
}
