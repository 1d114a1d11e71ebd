//! NSGA-II: Pareto-based multi-objective search.
//!
//! Offspring are bred as in the standard genetic algorithm (the operators
//! usually carry a [`CrowdedTournamentSelection`]); survival then fills the
//! next population front by front and splits the last front by crowding
//! distance.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//!
//! [`CrowdedTournamentSelection`]: crate::selection::CrowdedTournamentSelection

use std::cmp::Ordering;

use super::metrics::{timed, SearchMetrics};
use super::pareto::{objective_matrix, rank_and_crowding};
use super::shared::{GeneticOperators, SearchCore};
use super::{SearchAlgorithm, SearchState};
use crate::chromosome::{Chromosome, Genotype};
use crate::env::Environment;
use crate::fitness::FitnessFunction;

pub struct Nsga2<T: Genotype> {
    core: SearchCore<T>,
    operators: GeneticOperators<T>,
    big_population_size: usize,
}

impl<T: Genotype> Nsga2<T> {
    pub const NAME: &'static str = "NSGA-II";

    /// # Panics
    /// Panics if no fitness function is configured.
    pub fn new(
        core: SearchCore<T>,
        operators: GeneticOperators<T>,
        big_population_size: usize,
    ) -> Self {
        assert!(
            !core.fitness_functions.is_empty(),
            "{} needs at least one fitness function",
            Self::NAME
        );
        let big_population_size = big_population_size.max(core.population_size);
        Self {
            core,
            operators,
            big_population_size,
        }
    }
}

/// Keeps `size` chromosomes, ordered by Pareto rank and then by descending
/// crowding distance. Ties keep population order.
pub(crate) fn survivors<T: Genotype>(
    population: Vec<Chromosome<T>>,
    fitness_functions: &[Box<dyn FitnessFunction<T>>],
    size: usize,
) -> Vec<Chromosome<T>> {
    let objectives = objective_matrix(&population, fitness_functions);
    let (ranks, crowding) = rank_and_crowding(&objectives);

    let mut order: Vec<usize> = (0..population.len()).collect();
    order.sort_by(|&a, &b| {
        ranks[a].cmp(&ranks[b]).then_with(|| {
            crowding[b]
                .partial_cmp(&crowding[a])
                .unwrap_or(Ordering::Equal)
        })
    });
    order.truncate(size);
    order.into_iter().map(|i| population[i].clone()).collect()
}

impl<T: Genotype> SearchAlgorithm<T> for Nsga2<T> {
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

        let count = self.big_population_size.saturating_sub(core.population.len());
        let offspring = self.operators.breed(
            &core.population,
            &core.fitness_functions,
            count,
            env,
            &mut core.rng,
            metrics,
        );
        core.population.extend(offspring);

        let combined = std::mem::take(&mut core.population);
        let fitness_functions = &core.fitness_functions;
        let size = core.population_size;
        core.population = timed(&mut metrics.evaluation_time, || {
            survivors(combined, fitness_functions, size)
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
