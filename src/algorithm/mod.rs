//! Search algorithms.
//!
//! Every variant is a state machine `Initializing → Evolving → Terminated`.
//! The caller drives it: [`SearchAlgorithm::create_initial_population`]
//! once, then [`SearchAlgorithm::evolve`] until the state is
//! [`SearchState::Terminated`]. The termination condition is polled once at
//! the start of every `evolve` call.
//!
//! # Variants
//!
//! | Variant | Environmental selection |
//! |---------|-------------------------|
//! | [`StandardGeneticAlgorithm`] | best `population_size` by fitness |
//! | [`OnePlusOne`] | mutant replaces parent when at least as good |
//! | [`RandomSearch`] | champion vs. fresh challenger |
//! | [`RandomWalk`] | unconditional move, best-so-far reported |
//! | [`Nsga2`] | non-dominated sorting + crowding distance |
//! | [`Mio`] | per-target archives, adaptive exploration |
//! | [`NoveltySearch`] | most novel, bounded novelty archive |

mod archive;
mod metrics;
mod mio;
mod novelty;
mod nsga2;
mod one_plus_one;
pub mod pareto;
mod random_search;
mod random_walk;
mod shared;
mod standard;

pub use archive::{Admission, NoveltyArchive};
pub use metrics::SearchMetrics;
pub use mio::{Mio, MioParameters};
pub use novelty::NoveltySearch;
pub use nsga2::Nsga2;
pub use one_plus_one::OnePlusOne;
pub use random_search::RandomSearch;
pub use random_walk::RandomWalk;
pub use shared::{GeneticOperators, SearchCore};
pub use standard::StandardGeneticAlgorithm;

use crate::chromosome::{Chromosome, Genotype};
use crate::env::Environment;

/// Lifecycle of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchState {
    Initializing,
    Evolving,
    Terminated,
}

/// Outcome of [`SearchAlgorithm::run`].
#[derive(Debug, Clone)]
pub struct SearchResult<T> {
    /// Final population (archive snapshot for archive-based variants).
    pub population: Vec<Chromosome<T>>,
    /// Completed generations.
    pub generations: usize,
}

/// A search over chromosomes of payload `T`.
pub trait SearchAlgorithm<T: Genotype> {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Creates the initial population and enters [`SearchState::Evolving`].
    ///
    /// # Panics
    /// Panics if called twice.
    fn create_initial_population(
        &mut self,
        env: &mut dyn Environment<T::Action>,
        metrics: &mut SearchMetrics,
    );

    /// Runs one generation, unless the termination condition is met.
    ///
    /// Does nothing once terminated.
    ///
    /// # Panics
    /// Panics if the initial population was not created.
    fn evolve(&mut self, env: &mut dyn Environment<T::Action>, metrics: &mut SearchMetrics);

    /// Current population, in stable reporting order.
    fn population(&self) -> &[Chromosome<T>];

    /// Completed generations.
    fn current_generation(&self) -> usize;

    fn state(&self) -> SearchState;

    /// Drives the search to termination.
    fn run(
        &mut self,
        env: &mut dyn Environment<T::Action>,
        metrics: &mut SearchMetrics,
    ) -> SearchResult<T> {
        if self.state() == SearchState::Initializing {
            self.create_initial_population(&mut *env, metrics);
        }
        while self.state() != SearchState::Terminated {
            self.evolve(&mut *env, metrics);
        }
        SearchResult {
            population: self.population().to_vec(),
            generations: self.current_generation(),
        }
    }
}

impl<T: Genotype, S: SearchAlgorithm<T> + ?Sized> SearchAlgorithm<T> for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn create_initial_population(
        &mut self,
        env: &mut dyn Environment<T::Action>,
        metrics: &mut SearchMetrics,
    ) {
        (**self).create_initial_population(env, metrics)
    }

    fn evolve(&mut self, env: &mut dyn Environment<T::Action>, metrics: &mut SearchMetrics) {
        (**self).evolve(env, metrics)
    }

    fn population(&self) -> &[Chromosome<T>] {
        (**self).population()
    }

    fn current_generation(&self) -> usize {
        (**self).current_generation()
    }

    fn state(&self) -> SearchState {
        (**self).state()
    }

    fn run(
        &mut self,
        env: &mut dyn Environment<T::Action>,
        metrics: &mut SearchMetrics,
    ) -> SearchResult<T> {
        (**self).run(env, metrics)
    }
}
