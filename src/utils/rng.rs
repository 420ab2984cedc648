use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rand_pcg::Pcg64;

/// Derive an independent seed for replica `replica` from a master seed.
pub fn replica_seed(master: u64, replica: usize) -> u64 {
    let mut x = master ^ (replica as u64).wrapping_mul(0x9E3779B97F4A7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

/// Seedable source of every random draw in one simulation context.
///
/// Never shared: each `Simulation` owns its stream, so a seed fixes the
/// whole trajectory.
#[derive(Debug, Clone)]
pub struct RandomStream {
    rng: Pcg64,
}

impl RandomStream {
    pub fn new(seed: u64) -> Self {
        Self { rng: Pcg64::seed_from_u64(seed) }
    }

    /// Uniform real in [0, 1).
    #[inline(always)]
    pub fn uniform01(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Uniform integer in the inclusive range [lo, hi].
    #[inline(always)]
    pub fn uniform_int(&mut self, lo: usize, hi: usize) -> usize {
        self.rng.gen_range(lo..=hi)
    }

    /// Fair coin.
    #[inline(always)]
    pub fn bool(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }

    /// Uniform real in [-width, width), one draw.
    #[inline(always)]
    pub fn symmetric(&mut self, width: f64) -> f64 {
        width * (2.0 * self.uniform01() - 1.0)
    }

    /// Standard normal deviate.
    pub fn normal(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }
}
