//! Selection strategies.
//!
//! Selection chooses the chromosomes that act as parents. Every function
//! returns exactly `population.len()` chromosomes; callers take as many
//! as they need from the front.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Deb et al. (2002), crowded-comparison operator of NSGA-II

mod basic;
mod roulette;

pub use basic::{
    CrowdedTournamentSelection, FitnessSortedSelection, RandomSelection, TournamentSelection,
};
pub use roulette::FitnessProportionateSelection;

use rand::RngCore;

use crate::chromosome::{Chromosome, Genotype};
use crate::fitness::FitnessFunction;

/// Chooses parents from a population.
pub trait SelectionFunction<T: Genotype>: Send + Sync {
    /// Returns `population.len()` chromosomes drawn from `population`.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    fn select(
        &self,
        population: &[Chromosome<T>],
        fitness_functions: &[Box<dyn FitnessFunction<T>>],
        rng: &mut dyn RngCore,
    ) -> Vec<Chromosome<T>>;
}
