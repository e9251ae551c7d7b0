//! The scene aggregate: every object a ray is tested against.

use crate::hittable::{Geometry, HitRecord};
use crate::Ray;
use rtw_math::Interval;

/// An ordered list of geometry.
///
/// Built once before rendering and only read while rendering. There is no
/// acceleration structure: every ray is tested against every object.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<Geometry>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the scene.
    pub fn add(&mut self, object: impl Into<Geometry>) {
        self.objects.push(object.into());
    }

    /// Remove all objects.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> &[Geometry] {
        &self.objects
    }

    /// Closest hit across all objects with `t` strictly inside `ray_t`.
    ///
    /// The upper bound shrinks to the nearest hit found so far, so later
    /// objects only win by being strictly closer. Ties go to the object
    /// added first.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest_so_far = ray_t.max;
        let mut closest = None;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }
}

impl<G: Into<Geometry>> FromIterator<G> for Scene {
    fn from_iter<I: IntoIterator<Item = G>>(iter: I) -> Self {
        Self {
            objects: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<G: Into<Geometry>> Extend<G> for Scene {
    fn extend<I: IntoIterator<Item = G>>(&mut self, iter: I) {
        self.objects.extend(iter.into_iter().map(Into::into));
    }
}
