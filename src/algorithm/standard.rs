//! Generational genetic algorithm with truncation survival.

use super::metrics::{timed, SearchMetrics};
use super::shared::{GeneticOperators, SearchCore};
use super::{SearchAlgorithm, SearchState};
use crate::chromosome::{Chromosome, Genotype};
use crate::env::Environment;
use crate::fitness::compare_fitness;

/// Standard genetic algorithm.
///
/// Each generation grows the population to `big_population_size` with
/// offspring (selection → crossover → mutation), then keeps the best
/// `population_size` chromosomes by the single fitness function. Parents
/// compete with their offspring, so the best fitness never decreases.
pub struct StandardGeneticAlgorithm<T: Genotype> {
    core: SearchCore<T>,
    operators: GeneticOperators<T>,
    big_population_size: usize,
}

impl<T: Genotype> StandardGeneticAlgorithm<T> {
    pub const NAME: &'static str = "standard genetic algorithm";

    /// # Panics
    /// Panics unless exactly one fitness function is configured.
    pub fn new(
        core: SearchCore<T>,
        operators: GeneticOperators<T>,
        big_population_size: usize,
    ) -> Self {
        assert_eq!(
            core.fitness_functions.len(),
            1,
            "{} uses exactly one fitness function",
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

impl<T: Genotype> SearchAlgorithm<T> for StandardGeneticAlgorithm<T> {
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

        let fitness = &core.fitness_functions[0];
        let population = &mut core.population;
        timed(&mut metrics.evaluation_time, || {
            population.sort_by(|a, b| compare_fitness(fitness, b, a));
            population.truncate(core.population_size);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::FitnessFunction;
    use crate::testing::{test_core, test_operators, TestApp};

    #[test]
    fn test_population_size_restored_every_generation() {
        let mut app = TestApp::chain(8);
        let core = test_core(&app, 4, 5, 42);
        let mut ga = StandardGeneticAlgorithm::new(core, test_operators(5), 8);
        let mut metrics = SearchMetrics::new();

        ga.create_initial_population(&mut app, &mut metrics);
        assert_eq!(ga.state(), SearchState::Evolving);
        assert_eq!(ga.population().len(), 4);

        let mut best = Vec::new();
        while ga.state() != SearchState::Terminated {
            ga.evolve(&mut app, &mut metrics);
            assert_eq!(ga.population().len(), 4);
            let f = &ga.core.fitness_functions[0];
            best.push(f.fitness(&ga.population()[0]));
        }

        assert_eq!(ga.current_generation(), 5);
        assert_eq!(metrics.generations, 5);
        // the terminating poll adds an entry without running a generation
        assert_eq!(best.len(), 6);
        assert!(best.windows(2).all(|w| w[1] >= w[0]), "{best:?}");
        assert_eq!(app.started.len(), app.finished.len());
    }

    #[test]
    fn test_population_sorted_best_first() {
        let mut app = TestApp::chain(8);
        let core = test_core(&app, 5, 2, 7);
        let mut ga = StandardGeneticAlgorithm::new(core, test_operators(5), 10);
        let mut metrics = SearchMetrics::new();

        let result = ga.run(&mut app, &mut metrics);
        assert_eq!(result.generations, 2);
        let f = &ga.core.fitness_functions[0];
        let scores: Vec<f64> = result.population.iter().map(|c| f.fitness(c)).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]), "{scores:?}");
    }

    #[test]
    #[should_panic(expected = "create_initial_population must run before evolve")]
    fn test_evolve_requires_initial_population() {
        let mut app = TestApp::chain(3);
        let core = test_core(&app, 2, 1, 1);
        let mut ga = StandardGeneticAlgorithm::new(core, test_operators(3), 4);
        ga.evolve(&mut app, &mut SearchMetrics::new());
    }
}
