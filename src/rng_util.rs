/// Generate a random `f64` in the range `[low, high)`.
#[inline]
pub(crate) fn f64_range(rng: &mut fastrand::Rng, low: f64, high: f64) -> f64 {
    low + rng.f64() * (high - low)
}

/// Generate a uniformly random point in the unit hypercube `[0, 1)^dim`.
pub(crate) fn unit_vector(rng: &mut fastrand::Rng, dim: usize) -> Vec<f64> {
    (0..dim).map(|_| f64_range(rng, 0.0, 1.0)).collect()
}

/// Create an RNG from an optional seed.
pub(crate) fn make_rng(seed: Option<u64>) -> fastrand::Rng {
    seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed)
}
