//! Random sampling helpers.
//!
//! Every function takes the generator explicitly. Each render worker owns
//! its own generator, so nothing here touches shared state.

use glam::Vec3;
use rand::RngCore;

/// Squared lengths at or below this are rejected when sampling directions.
const MIN_SAMPLE_LENGTH_SQUARED: f32 = 1e-40;

/// Per-component magnitude under which a vector counts as zero.
const NEAR_ZERO: f32 = 1e-6;

/// Uniform `f32` in `[0, 1)`.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    // 24 random mantissa bits; never rounds up to 1.0
    (rng.next_u32() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
}

/// Uniform `f32` in `[min, max)`.
#[inline]
pub fn gen_range(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    min + (max - min) * gen_f32(rng)
}

/// Generate a random unit vector on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    // Rejection sampling keeps the distribution uniform on the sphere
    loop {
        let p = Vec3::new(
            gen_range(rng, -1.0, 1.0),
            gen_range(rng, -1.0, 1.0),
            gen_range(rng, -1.0, 1.0),
        );
        let len_sq = p.length_squared();
        if MIN_SAMPLE_LENGTH_SQUARED < len_sq && len_sq <= 1.0 {
            return p / len_sq.sqrt();
        }
    }
}

/// Sample a random point in the unit disk (z = 0).
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_range(rng, -1.0, 1.0), gen_range(rng, -1.0, 1.0), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Sample a random point in the unit square [-0.5, 0.5] x [-0.5, 0.5].
pub fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f32(rng) - 0.5, gen_f32(rng) - 0.5, 0.0)
}

/// True if every component is within `1e-6` of zero.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    v.abs().max_element() < NEAR_ZERO
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_gen_f32_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let x = gen_f32(&mut rng);
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_random_unit_vector_is_unit() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-5, "length was {}", v.length());
        }
    }

    #[test]
    fn test_random_unit_vector_covers_both_hemispheres() {
        let mut rng = StdRng::seed_from_u64(3);
        let samples: Vec<Vec3> = (0..500).map(|_| random_unit_vector(&mut rng)).collect();
        assert!(samples.iter().any(|v| v.y > 0.5));
        assert!(samples.iter().any(|v| v.y < -0.5));
    }

    #[test]
    fn test_random_in_unit_disk() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let p = random_in_unit_disk(&mut rng);
            assert_eq!(p.z, 0.0);
            assert!(p.length_squared() < 1.0);
        }
    }

    #[test]
    fn test_sample_square_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let p = sample_square(&mut rng);
            assert!((-0.5..0.5).contains(&p.x));
            assert!((-0.5..0.5).contains(&p.y));
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn test_near_zero() {
        assert!(near_zero(Vec3::ZERO));
        assert!(near_zero(Vec3::new(1e-7, -1e-7, 0.0)));
        assert!(!near_zero(Vec3::new(1e-7, 1e-3, 0.0)));
    }
}
