//! Elitist (1+1) evolutionary algorithm.

use std::cmp::Ordering;

use log::trace;

use super::metrics::{timed, SearchMetrics};
use super::shared::SearchCore;
use super::{SearchAlgorithm, SearchState};
use crate::chromosome::{Chromosome, Genotype};
use crate::env::Environment;
use crate::fitness::compare_fitness;
use crate::mutation::MutationFunction;

/// One parent, one mutant per generation.
///
/// The mutant replaces the parent when it is at least as good by the single
/// fitness function, which lets the search drift across plateaus.
pub struct OnePlusOne<T: Genotype> {
    core: SearchCore<T>,
    mutation: Box<dyn MutationFunction<T>>,
}

impl<T: Genotype> OnePlusOne<T> {
    pub const NAME: &'static str = "(1+1) evolutionary algorithm";

    /// The population size of `core` is forced to 1.
    ///
    /// # Panics
    /// Panics unless exactly one fitness function is configured.
    pub fn new(mut core: SearchCore<T>, mutation: Box<dyn MutationFunction<T>>) -> Self {
        assert_eq!(
            core.fitness_functions.len(),
            1,
            "{} uses exactly one fitness function",
            Self::NAME
        );
        core.population_size = 1;
        Self { core, mutation }
    }
}

impl<T: Genotype> SearchAlgorithm<T> for OnePlusOne<T> {
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
        let core = &mut self.core;
        let parent = core.population[0].clone();

        metrics.mutations += 1;
        let mutation = &self.mutation;
        let rng = &mut core.rng;
        let mutants = timed(&mut metrics.mutation_time, || {
            mutation.mutate(&parent, &mut *env, rng)
        });

        let fitness = &core.fitness_functions[0];
        let best = timed(&mut metrics.evaluation_time, || {
            mutants
                .into_iter()
                .filter(|m| compare_fitness(fitness, m, &parent) != Ordering::Less)
                .max_by(|a, b| compare_fitness(fitness, a, b))
        });
        if let Some(mutant) = best {
            trace!("mutant {:?} replaces {:?}", mutant.id(), parent.id());
            core.population[0] = mutant;
        }

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
