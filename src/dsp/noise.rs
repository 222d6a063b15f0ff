use oorandom::Rand32;

/// Uniform white noise in [-1.0, 1.0), seedable per instance.
///
/// Every engine owns its generator, so two instruments never share RNG state
/// and a fixed seed reproduces the exact same performance.
pub struct Noise {
    rng: Rand32,
}

impl Noise {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Rand32::new(seed),
        }
    }

    pub fn next_sample(&mut self) -> f32 {
        self.rng.rand_float() * 2.0 - 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_stays_in_range() {
        let mut noise = Noise::new(1);
        for _ in 0..10_000 {
            let s = noise.next_sample();
            assert!((-1.0..1.0).contains(&s), "sample out of range: {}", s);
        }
    }

    #[test]
    fn test_noise_is_roughly_zero_mean() {
        let mut noise = Noise::new(2);
        let sum: f32 = (0..100_000).map(|_| noise.next_sample()).sum();
        let mean = sum / 100_000.0;
        assert!(mean.abs() < 0.02, "mean should be near zero, got {}", mean);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Noise::new(42);
        let mut b = Noise::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_sample(), b.next_sample());
        }
    }
}
