//! Intersection protocol: the hit record and the closed set of geometry kinds.

use crate::{Material, Ray, Sphere};
use rtw_math::{Interval, Vec3};

/// Record of a ray-object intersection.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a Material,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record at parameter `t` along `ray`, orienting `outward_normal`
    /// against the ray.
    pub fn new(ray: &Ray, t: f32, outward_normal: Vec3, material: &'a Material) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        // If the ray and normal point in the same direction, we're inside
        self.front_face = ray.direction().dot(outward_normal) < 0.0;

        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// A shape that can be placed in a [`Scene`](crate::Scene).
///
/// New primitive kinds get a variant here and an arm in each `match`.
#[derive(Debug, Clone)]
pub enum Geometry {
    Sphere(Sphere),
}

impl Geometry {
    /// Nearest intersection with `ray` whose parameter lies strictly inside
    /// `ray_t`, if any.
    #[inline]
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        match self {
            Geometry::Sphere(sphere) => sphere.hit(ray, ray_t),
        }
    }

    /// The material bound to this shape.
    pub fn material(&self) -> &Material {
        match self {
            Geometry::Sphere(sphere) => sphere.material(),
        }
    }
}

impl From<Sphere> for Geometry {
    fn from(sphere: Sphere) -> Self {
        Geometry::Sphere(sphere)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Lambertian};
    use std::sync::Arc;

    #[test]
    fn test_set_face_normal_front() {
        let material = Material::from(Lambertian::new(Color::ONE));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let rec = HitRecord::new(&ray, 1.0, Vec3::Z, &material);

        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
        assert_eq!(rec.p, Vec3::NEG_Z);
    }

    #[test]
    fn test_set_face_normal_back() {
        let material = Material::from(Lambertian::new(Color::ONE));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let rec = HitRecord::new(&ray, 1.0, Vec3::NEG_Z, &material);

        assert!(!rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
        assert!(ray.direction().dot(rec.normal) <= 0.0);
    }

    #[test]
    fn test_geometry_dispatch() {
        let material = Arc::new(Material::from(Lambertian::new(Color::splat(0.5))));
        let center = Vec3::new(0.0, 0.0, -1.0);
        let geometry = Geometry::from(Sphere::new(center, 0.5, material.clone()));

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let rec = geometry
            .hit(&ray, Interval::new(0.001, f32::INFINITY))
            .expect("ray through the center must hit");
        assert!((rec.t - 0.5).abs() < 1e-5);
        assert!(std::ptr::eq(rec.material, geometry.material()));
        assert!(std::ptr::eq(geometry.material(), material.as_ref()));
    }
}
