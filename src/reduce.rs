//! Warm-up for the reduction lab: sum a seeded random array in one pass.

use std::fmt;
use std::time::Duration;

use num_traits::Float;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::time;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_new::new)]
pub struct SumConfig {
    pub array_size: usize,
    pub seed: u64,
}

/// `size` values drawn uniformly from `[-1, 1)`; the same seed always yields the same array.
pub fn random_array(size: usize, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..size).map(|_| rng.gen_range(-1.0f32..1.0)).collect()
}

/// Left-to-right accumulation, no blocking and no reassociation.
pub fn seq_sum<F: Float>(values: &[F]) -> F {
    let mut sum = F::zero();
    for &v in values {
        sum = sum + v;
    }
    sum
}

#[derive(Debug, Clone, PartialEq)]
pub struct SumReport {
    pub config: SumConfig,
    pub sum: f32,
    pub elapsed: Duration,
}

impl fmt::Display for SumReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Statistics for array size:{} seed:{}",
            self.config.array_size, self.config.seed
        )?;
        writeln!(f, "    Sum:{}", self.sum)?;
        writeln!(
            f,
            "Processing Time:{:.3}(ms)",
            self.elapsed.as_secs_f64() * 1e3
        )
    }
}

/// Times allocation, generation and the sum together.
pub fn run(config: SumConfig) -> SumReport {
    let total = time(|| {
        let generated = time(|| random_array(config.array_size, config.seed));
        let summed = time(|| seq_sum(&generated.value));
        log::debug!(
            "generated {} values in {:.3} ms, summed in {:.3} ms",
            generated.value.len(),
            generated.millis(),
            summed.millis()
        );
        summed.value
    });
    SumReport {
        config,
        sum: total.value,
        elapsed: total.elapsed,
    }
}
