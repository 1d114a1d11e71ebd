//! Random search: a kept champion against one fresh challenger per round.

use std::cmp::Ordering;

use log::trace;

use super::metrics::{timed, SearchMetrics};
use super::shared::SearchCore;
use super::{SearchAlgorithm, SearchState};
use crate::chromosome::{Chromosome, Genotype};
use crate::env::Environment;
use crate::fitness::compare_fitness;

/// Random search.
///
/// The working population is always the pair of champion and challenger,
/// so it has a fixed size of 2. The pair only exists inside `evolve`: each
/// generation samples a challenger from the factory, compares the pair by
/// the single fitness function and discards the loser. On a tie the
/// challenger is discarded. At generation boundaries the population holds
/// only the surviving champion.
pub struct RandomSearch<T: Genotype> {
    core: SearchCore<T>,
}

impl<T: Genotype> RandomSearch<T> {
    pub const NAME: &'static str = "random search";

    /// The population size of `core` is forced to 1, the champion kept
    /// between generations. The challenger is added inside `evolve`.
    ///
    /// # Panics
    /// Panics unless exactly one fitness function is configured.
    pub fn new(mut core: SearchCore<T>) -> Self {
        assert_eq!(
            core.fitness_functions.len(),
            1,
            "{} uses exactly one fitness function",
            Self::NAME
        );
        core.population_size = 1;
        Self { core }
    }
}

impl<T: Genotype> SearchAlgorithm<T> for RandomSearch<T> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn create_initial_population(
        &mut self,
        env: &mut dyn Environment<T::Action>,
        metrics: &mut SearchMetrics,
    ) {
        self.core.initialize(env, metrics);
    }

    fn evolve(&mut self, env: &mut dyn Environment<T::Action>, metrics: &mut SearchMetrics) {
        if !self.core.begin_generation(Self::NAME) {
            return;
        }
        let challenger = self.core.sample(env, metrics);
        self.core.population.push(challenger);

        let core = &mut self.core;
        let fitness = &core.fitness_functions[0];
        let population = &mut core.population;
        timed(&mut metrics.evaluation_time, || {
            let loser = match compare_fitness(fitness, &population[1], &population[0]) {
                Ordering::Greater => 0,
                _ => 1,
            };
            trace!("random search discards {:?}", population[loser].id());
            population.remove(loser);
        });

        self.core.end_generation(Self::NAME, metrics);
    }

    fn population(&self) -> &[Chromosome<T>] {
        &self.core.population
    }

    fn current_generation(&self) -> usize {
        self.core.generation
    }

    fn state(&self) -> SearchState {
        self.core.state
    }
}
