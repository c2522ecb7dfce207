//! Numeric value generators.

use rand::Rng;

/// Generate a uniform double in [0, 1).
pub fn generate_unit_double<R: Rng>(rng: &mut R) -> f64 {
    rng.random::<f64>()
}

/// Generate `count` uniform doubles in [0, 1).
pub fn generate_unit_doubles<R: Rng>(rng: &mut R, count: u64) -> Vec<f64> {
    (0..count).map(|_| generate_unit_double(rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_unit_double() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let v = generate_unit_double(&mut rng);
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_generate_unit_doubles_seeded() {
        let a = generate_unit_doubles(&mut StdRng::seed_from_u64(3), 16);
        let b = generate_unit_doubles(&mut StdRng::seed_from_u64(3), 16);
        assert_eq!(a.len(), 16);
        assert_eq!(a, b);
    }
}
