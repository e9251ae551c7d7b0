//! Math primitives for the tracer.
//!
//! Vectors come straight from `glam`; this crate adds the two small value
//! types every intersection test needs: [`Ray`] and [`Interval`].

// Re-export glam for convenience
pub use glam::*;

mod interval;
mod ray;

pub use interval::Interval;
pub use ray::Ray;

/// Linear RGB radiance. Components are unbounded until quantization.
pub type Color = Vec3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
        assert!((Vec3::new(3.0, 4.0, 0.0).length() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_color_component_product() {
        let attenuation = Color::new(0.5, 1.0, 0.25);
        let incoming = Color::new(1.0, 0.5, 4.0);
        assert_eq!(attenuation * incoming, Color::new(0.5, 0.5, 1.0));
    }
}
