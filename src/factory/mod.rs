//! Chromosome factories.
//!
//! A factory builds a chromosome from scratch by resetting the environment
//! and repeatedly picking one of the currently executable actions:
//!
//! - [`RandomChromosomeFactory`]: uniform choice.
//! - [`HeuristicChromosomeFactory`]: frequency- and novelty-weighted choice
//!   with tables that persist across chromosomes.
//! - [`TestSuiteFactory`]: a suite of test cases from any test-case factory.

mod heuristic;
mod random;
mod suite;

pub use heuristic::{HeuristicChromosomeFactory, HeuristicWeights};
pub use random::RandomChromosomeFactory;
pub use suite::TestSuiteFactory;

use rand::RngCore;

use crate::chromosome::{Chromosome, Genotype};
use crate::env::Environment;

/// Creates new chromosomes.
///
/// Factories take `&mut self`: their bookkeeping belongs to one search and
/// must not be shared between concurrent searches.
pub trait ChromosomeFactory<T: Genotype>: Send {
    fn create(
        &mut self,
        env: &mut dyn Environment<T::Action>,
        rng: &mut dyn RngCore,
    ) -> Chromosome<T>;
}

impl<T: Genotype, F: ChromosomeFactory<T> + ?Sized> ChromosomeFactory<T> for Box<F> {
    fn create(
        &mut self,
        env: &mut dyn Environment<T::Action>,
        rng: &mut dyn RngCore,
    ) -> Chromosome<T> {
        (**self).create(env, rng)
    }
}
