//! Random walk over mutants.

use std::cmp::Ordering;

use super::metrics::{timed, SearchMetrics};
use super::shared::SearchCore;
use super::{SearchAlgorithm, SearchState};
use crate::chromosome::{Chromosome, Genotype};
use crate::env::Environment;
use crate::fitness::compare_fitness;
use crate::mutation::MutationFunction;

/// Random walk.
///
/// The walker moves to a mutant of itself every generation, whatever its
/// fitness. The best chromosome seen so far is tracked separately and is
/// what [`population`](SearchAlgorithm::population) reports; the walker
/// itself is available through [`current`](Self::current).
pub struct RandomWalk<T: Genotype> {
    core: SearchCore<T>,
    mutation: Box<dyn MutationFunction<T>>,
    current: Option<Chromosome<T>>,
}

impl<T: Genotype> RandomWalk<T> {
    pub const NAME: &'static str = "random walk";

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
        Self {
            core,
            mutation,
            current: None,
        }
    }

    /// Position of the walker, once the initial population exists.
    pub fn current(&self) -> Option<&Chromosome<T>> {
        self.current.as_ref()
    }
}

impl<T: Genotype> SearchAlgorithm<T> for RandomWalk<T> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn create_initial_population(
        &mut self,
        env: &mut dyn Environment<T::Action>,
        metrics: &mut SearchMetrics,
    ) {
        self.core.initialize(env, metrics);
        self.current = self.core.population.first().cloned();
    }

    fn evolve(&mut self, env: &mut dyn Environment<T::Action>, metrics: &mut SearchMetrics) {
        if !self.core.begin_generation(Self::NAME) {
            return;
        }
        let Some(current) = self.current.take() else {
            unreachable!("walker exists once evolving");
        };

        metrics.mutations += 1;
        let mutation = &self.mutation;
        let rng = &mut self.core.rng;
        let mutants = timed(&mut metrics.mutation_time, || {
            mutation.mutate(&current, &mut *env, rng)
        });
        let next = mutants.into_iter().last().unwrap_or(current);

        let core = &mut self.core;
        let fitness = &core.fitness_functions[0];
        let best = &mut core.population[0];
        timed(&mut metrics.evaluation_time, || {
            if compare_fitness(fitness, &next, best) == Ordering::Greater {
                *best = next.clone();
            }
        });
        self.current = Some(next);

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
    use crate::mutation::CutPointMutation;
    use crate::testing::{test_core, TestApp};

    #[test]
    fn test_walker_always_moves() {
        let mut app = TestApp::chain(6);
        let mut walk = RandomWalk::new(
            test_core(&app, 3, 6, 9),
            Box::new(CutPointMutation::new(4)),
        );
        let mut metrics = SearchMetrics::new();
        assert!(walk.current().is_none());

        walk.create_initial_population(&mut app, &mut metrics);
        let mut previous = walk.current().unwrap().clone();
        for _ in 0..6 {
            walk.evolve(&mut app, &mut metrics);
            let now = walk.current().unwrap();
            assert!(!now.same_as(&previous));
            previous = now.clone();
        }
        assert_eq!(walk.current_generation(), 6);
    }

    #[test]
    fn test_reports_best_so_far() {
        let mut app = TestApp::chain(10);
        let mut walk = RandomWalk::new(
            test_core(&app, 1, 25, 4),
            Box::new(CutPointMutation::new(8)),
        );
        let mut metrics = SearchMetrics::new();
        walk.create_initial_population(&mut app, &mut metrics);

        let mut best = Vec::new();
        while walk.state() != SearchState::Terminated {
            walk.evolve(&mut app, &mut metrics);
            assert_eq!(walk.population().len(), 1);
            let f = &walk.core.fitness_functions[0];
            let reported = f.fitness(&walk.population()[0]);
            assert!(reported >= f.fitness(walk.current().unwrap()));
            best.push(reported);
        }
        assert!(best.windows(2).all(|w| w[1] >= w[0]), "{best:?}");
    }
}
