//! Seeded random number generation.
//!
//! Every stochastic component of the engine draws from a single
//! [`StdRng`] owned by the running algorithm. Strategies receive it as
//! `&mut dyn RngCore` so that they remain object safe.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Creates a deterministic RNG from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates an RNG from an optional seed, drawing a fresh seed when `None`.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => create_rng(s),
        None => create_rng(rand::random()),
    }
}

/// Returns `true` with probability `p` (clamped to `[0, 1]`).
pub fn chance(rng: &mut dyn RngCore, p: f64) -> bool {
    let p = p.clamp(0.0, 1.0);
    if p <= 0.0 {
        return false;
    }
    if p >= 1.0 {
        return true;
    }
    rng.random_bool(p)
}
