//! Mutation operators.
//!
//! Mutation never alters its input. Each call builds new chromosomes by
//! executing actions against the environment, so every mutant is a valid,
//! freshly recorded test case.

mod cut_point;

pub use cut_point::{CutPointMutation, SuiteCutPointMutation};

use rand::RngCore;

use crate::chromosome::{Chromosome, Genotype};
use crate::env::Environment;

/// Produces mutants of a chromosome.
pub trait MutationFunction<T: Genotype>: Send + Sync {
    /// Returns one or more new chromosomes derived from `chromosome`.
    fn mutate(
        &self,
        chromosome: &Chromosome<T>,
        env: &mut dyn Environment<T::Action>,
        rng: &mut dyn RngCore,
    ) -> Vec<Chromosome<T>>;
}
