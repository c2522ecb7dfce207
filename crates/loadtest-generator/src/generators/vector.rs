//! Dense vector generators.

use rand::Rng;

/// Generate a `dim`-length vector of floats uniform in [0, 1).
pub fn generate_unit_vector<R: Rng>(rng: &mut R, dim: u32) -> Vec<f32> {
    (0..dim).map(|_| rng.random::<f32>()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_unit_vector() {
        let mut rng = StdRng::seed_from_u64(42);
        let v = generate_unit_vector(&mut rng, 128);

        assert_eq!(v.len(), 128);
        assert!(v.iter().all(|x| (0.0..1.0).contains(x)));
    }

    #[test]
    fn test_zero_dim() {
        let mut rng = StdRng::seed_from_u64(42);
        assert!(generate_unit_vector(&mut rng, 0).is_empty());
    }
}
