//! Injectable randomness for the simulation engine.
//!
//! Every stochastic component takes a `&mut impl RandomSource` instead of
//! reaching for a global generator, so tests can script exact draws.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::PI;

/// Source of uniform draws, with normal variates and index helpers built on top.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Standard normal draw via the Box-Muller transform.
    ///
    /// One variate per call; the paired second variate is discarded.
    fn gaussian(&mut self) -> f64 {
        let u = nonzero_uniform(self);
        let v = nonzero_uniform(self);
        (-2.0 * u.ln()).sqrt() * (2.0 * PI * v).cos()
    }

    /// Uniform index in `0..bound`. `bound` must be non-zero.
    fn index(&mut self, bound: usize) -> usize {
        let i = (self.next_f64() * bound as f64) as usize;
        i.min(bound.saturating_sub(1))
    }

    /// Fisher-Yates shuffle driven by this source.
    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }
}

impl<R: Rng> RandomSource for R {
    fn next_f64(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

fn nonzero_uniform<S: RandomSource + ?Sized>(source: &mut S) -> f64 {
    loop {
        let x = source.next_f64();
        if x != 0.0 {
            return x;
        }
    }
}

/// Deterministic generator when `seed` is given, entropy-seeded otherwise.
pub fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Draws `count` child seeds from `rng`, one per independent unit of parallel work.
pub fn child_seeds<R: Rng>(rng: &mut R, count: usize) -> Vec<u64> {
    (0..count).map(|_| rng.gen::<u64>()).collect()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::RandomSource;

    /// Replays a fixed list of uniforms, cycling when exhausted.
    pub struct Scripted {
        values: Vec<f64>,
        pos: usize,
    }

    impl Scripted {
        pub fn new(values: Vec<f64>) -> Self {
            Scripted { values, pos: 0 }
        }
    }

    impl RandomSource for Scripted {
        fn next_f64(&mut self) -> f64 {
            let v = self.values[self.pos % self.values.len()];
            self.pos += 1;
            v
        }
    }

    /// Every normal draw is exactly zero; uniforms sit at the midpoint.
    pub struct ZeroNoise;

    impl RandomSource for ZeroNoise {
        fn next_f64(&mut self) -> f64 {
            0.5
        }

        fn gaussian(&mut self) -> f64 {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::Scripted;
    use super::*;

    #[test]
    fn test_box_muller_known_value() {
        // u = e^-0.5 gives sqrt(-2 ln u) = 1; v = 0.5 gives cos(pi) = -1
        let mut src = Scripted::new(vec![(-0.5f64).exp(), 0.5]);
        let z = src.gaussian();
        assert!((z + 1.0).abs() < 1e-12, "got {}", z);
    }

    #[test]
    fn test_box_muller_skips_zero() {
        let mut src = Scripted::new(vec![0.0, (-0.5f64).exp(), 0.0, 1.0 - 1e-16]);
        let z = src.gaussian();
        assert!(z.is_finite());
        assert!((z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_gaussian_moments() {
        let mut rng = seeded_rng(Some(7));
        let n = 20_000;
        let draws: Vec<f64> = (0..n).map(|_| rng.gaussian()).collect();
        let mean = draws.iter().sum::<f64>() / n as f64;
        let var = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.05, "mean {}", mean);
        assert!((var - 1.0).abs() < 0.05, "variance {}", var);
    }

    #[test]
    fn test_index_in_bounds() {
        let mut src = Scripted::new(vec![0.0, 0.999_999, 0.5]);
        assert_eq!(src.index(4), 0);
        assert_eq!(src.index(4), 3);
        assert_eq!(src.index(4), 2);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = seeded_rng(Some(3));
        let mut items: Vec<u32> = (0..25).collect();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..25).collect::<Vec<_>>());
    }

    #[test]
    fn test_seeded_rng_deterministic() {
        let a: Vec<u64> = child_seeds(&mut seeded_rng(Some(42)), 5);
        let b: Vec<u64> = child_seeds(&mut seeded_rng(Some(42)), 5);
        assert_eq!(a, b);
    }
}
