//! Seeded design tensors.
//!
//! Values are uniform in `[lo, hi)` and depend only on the seed, so a
//! failing case can be replayed from its seed alone.

use indexmap::IndexMap;
use ndarray::{Array2, Array3, ArrayD, IxDyn};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

fn uniform(rng: &mut ChaCha8Rng, lo: f32, hi: f32) -> f32 {
    rng.random_range(lo..hi)
}

pub fn random_field(rows: usize, cols: usize, lo: f32, hi: f32, seed: u64) -> Array2<f32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Array2::from_shape_simple_fn((rows, cols), || uniform(&mut rng, lo, hi))
}

pub fn random_design(shape: [usize; 3], lo: f32, hi: f32, seed: u64) -> Array3<f32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Array3::from_shape_simple_fn(shape, || uniform(&mut rng, lo, hi))
}

/// A named design input: one dynamic-rank entry per `(name, shape)`.
///
/// Entry `k` is seeded with `seed + k`.
pub fn random_named_design(
    entries: &[(&str, &[usize])],
    lo: f32,
    hi: f32,
    seed: u64,
) -> IndexMap<String, ArrayD<f32>> {
    entries
        .iter()
        .enumerate()
        .map(|(k, (name, shape))| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(k as u64));
            let array =
                ArrayD::from_shape_simple_fn(IxDyn(shape), || uniform(&mut rng, lo, hi));
            (name.to_string(), array)
        })
        .collect()
}
