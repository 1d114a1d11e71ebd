//! Crossover operators.
//!
//! Crossover always takes exactly two parents. Parent 0 is primary: an
//! operator that cannot recombine soundly returns it unchanged.

mod merge;
mod uniform;
mod zigzag;

pub use merge::TestCaseMergeCrossover;
pub use uniform::UniformSuiteCrossover;

use rand::RngCore;

use crate::chromosome::{Chromosome, Genotype};
use crate::env::Environment;

/// Combines two parents into one offspring.
pub trait CrossoverFunction<T: Genotype>: Send + Sync {
    fn cross(
        &self,
        parents: &[Chromosome<T>; 2],
        env: &mut dyn Environment<T::Action>,
        rng: &mut dyn RngCore,
    ) -> Chromosome<T>;
}
