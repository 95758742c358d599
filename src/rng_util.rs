/// Generate a random `f64` in the range `[low, high)`.
#[inline]
pub(crate) fn f64_range(rng: &mut fastrand::Rng, low: f64, high: f64) -> f64 {
    low + rng.f64() * (high - low)
}

/// Draw a seed for a child generator (surrogate refits, initial designs).
#[inline]
pub(crate) fn child_seed(rng: &mut fastrand::Rng) -> u64 {
    rng.u64(..)
}

/// Select `k` random indices from `0..n` using partial Fisher-Yates shuffle.
pub(crate) fn partial_shuffle(n: usize, k: usize, rng: &mut fastrand::Rng) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    let k = k.min(n);
    for i in 0..k {
        let j = rng.usize(i..n);
        indices.swap(i, j);
    }
    indices.truncate(k);
    indices
}
