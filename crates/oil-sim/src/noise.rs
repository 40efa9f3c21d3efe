//! Multiplicative noise sources.
//!
//! Every generated value is scaled by one factor drawn here. Production runs
//! use [`GaussianNoise`]; tests swap in [`UnitNoise`] or [`SequenceNoise`].

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

/// Source of multiplicative noise factors centred on 1.0.
pub trait NoiseSource {
    /// Draws one factor with standard deviation `sd`.
    fn factor(&mut self, sd: f64) -> f64;
}

impl<N: NoiseSource + ?Sized> NoiseSource for &mut N {
    fn factor(&mut self, sd: f64) -> f64 {
        (**self).factor(sd)
    }
}

/// Normal noise, N(1, sd).
#[derive(Clone, Debug)]
pub struct GaussianNoise<R = ChaCha8Rng> {
    rng: R,
}

impl<R: Rng> GaussianNoise<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl GaussianNoise<ChaCha8Rng> {
    /// Reproducible stream for a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Unseeded stream; every run differs.
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }

    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> NoiseSource for GaussianNoise<R> {
    fn factor(&mut self, sd: f64) -> f64 {
        let z: f64 = self.rng.sample(StandardNormal);
        1.0 + sd * z
    }
}

/// No noise at all: every factor is exactly 1.0.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnitNoise;

impl NoiseSource for UnitNoise {
    fn factor(&mut self, _sd: f64) -> f64 {
        1.0
    }
}

/// Replays a fixed list of factors, cycling when exhausted.
///
/// The requested standard deviation is ignored.
#[derive(Clone, Debug)]
pub struct SequenceNoise {
    factors: Vec<f64>,
    pos: usize,
}

impl SequenceNoise {
    pub fn new(factors: Vec<f64>) -> Self {
        Self { factors, pos: 0 }
    }
}

impl NoiseSource for SequenceNoise {
    fn factor(&mut self, _sd: f64) -> f64 {
        if self.factors.is_empty() {
            return 1.0;
        }
        let f = self.factors[self.pos % self.factors.len()];
        self.pos += 1;
        f
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_noise_is_reproducible() {
        let mut a = GaussianNoise::seeded(42);
        let mut b = GaussianNoise::seeded(42);
        for _ in 0..50 {
            assert_eq!(a.factor(0.1), b.factor(0.1));
        }
        let mut c = GaussianNoise::seeded(43);
        let same = (0..50).all(|_| a.factor(0.1) == c.factor(0.1));
        assert!(!same);
    }

    #[test]
    fn gaussian_noise_is_centred_on_one() {
        let mut n = GaussianNoise::seeded(7);
        let draws: Vec<f64> = (0..20_000).map(|_| n.factor(0.1)).collect();
        let mean = draws.iter().sum::<f64>() / draws.len() as f64;
        let var = draws.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / draws.len() as f64;
        assert!((mean - 1.0).abs() < 0.01, "mean {mean}");
        assert!((var.sqrt() - 0.1).abs() < 0.01, "sd {}", var.sqrt());
    }

    #[test]
    fn zero_sd_gives_unit_factor() {
        let mut n = GaussianNoise::from_entropy();
        assert_eq!(n.factor(0.0), 1.0);
    }

    #[test]
    fn sequence_noise_cycles() {
        let mut s = SequenceNoise::new(vec![0.5, 2.0]);
        let got: Vec<f64> = (0..5).map(|_| s.factor(0.3)).collect();
        assert_eq!(got, vec![0.5, 2.0, 0.5, 2.0, 0.5]);
        assert_eq!(SequenceNoise::new(vec![]).factor(0.1), 1.0);
    }

    fn draw_one<N: NoiseSource>(mut noise: N) -> f64 {
        noise.factor(0.1)
    }

    #[test]
    fn mutable_reference_forwards() {
        let mut s = SequenceNoise::new(vec![3.0, 4.0]);
        assert_eq!(draw_one(&mut s), 3.0);
        assert_eq!(draw_one(&mut s), 4.0);
    }
}
