//! State shared by every search variant.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::RngCore;

use super::metrics::{timed, SearchMetrics};
use super::SearchState;
use crate::chromosome::{Chromosome, Genotype};
use crate::crossover::CrossoverFunction;
use crate::env::Environment;
use crate::factory::ChromosomeFactory;
use crate::fitness::FitnessFunction;
use crate::mutation::MutationFunction;
use crate::random::chance;
use crate::selection::SelectionFunction;
use crate::termination::TerminationCondition;

/// Population, lifecycle and the collaborators every variant needs.
pub struct SearchCore<T: Genotype> {
    pub(crate) factory: Box<dyn ChromosomeFactory<T>>,
    pub(crate) fitness_functions: Vec<Box<dyn FitnessFunction<T>>>,
    pub(crate) termination: Box<dyn TerminationCondition>,
    pub(crate) population: Vec<Chromosome<T>>,
    pub(crate) population_size: usize,
    pub(crate) generation: usize,
    pub(crate) state: SearchState,
    pub(crate) rng: StdRng,
}

impl<T: Genotype> SearchCore<T> {
    pub fn new(
        factory: Box<dyn ChromosomeFactory<T>>,
        fitness_functions: Vec<Box<dyn FitnessFunction<T>>>,
        termination: Box<dyn TerminationCondition>,
        population_size: usize,
        rng: StdRng,
    ) -> Self {
        Self {
            factory,
            fitness_functions,
            termination,
            population: Vec::with_capacity(population_size),
            population_size,
            generation: 0,
            state: SearchState::Initializing,
            rng,
        }
    }

    pub fn fitness_functions(&self) -> &[Box<dyn FitnessFunction<T>>] {
        &self.fitness_functions
    }

    /// Builds one chromosome with the factory.
    pub(crate) fn sample(
        &mut self,
        env: &mut dyn Environment<T::Action>,
        metrics: &mut SearchMetrics,
    ) -> Chromosome<T> {
        metrics.chromosomes_created += 1;
        let factory = &mut self.factory;
        let rng = &mut self.rng;
        timed(&mut metrics.factory_time, || factory.create(env, rng))
    }

    /// Fills the population with `population_size` fresh chromosomes and
    /// enters the evolving state.
    pub(crate) fn initialize(
        &mut self,
        env: &mut dyn Environment<T::Action>,
        metrics: &mut SearchMetrics,
    ) {
        assert_eq!(
            self.state,
            SearchState::Initializing,
            "initial population already created"
        );
        for _ in 0..self.population_size {
            let c = self.sample(&mut *env, metrics);
            self.population.push(c);
        }
        self.state = SearchState::Evolving;
    }

    /// Polls termination at a generation boundary.
    ///
    /// Returns `false` when the generation must not run.
    ///
    /// # Panics
    /// Panics if the initial population was not created.
    pub(crate) fn begin_generation(&mut self, name: &str) -> bool {
        match self.state {
            SearchState::Initializing => {
                panic!("{name}: create_initial_population must run before evolve")
            }
            SearchState::Terminated => false,
            SearchState::Evolving => {
                if self.termination.is_met() {
                    info!("{name} terminated after {} generations", self.generation);
                    self.state = SearchState::Terminated;
                    false
                } else {
                    true
                }
            }
        }
    }

    pub(crate) fn end_generation(&mut self, name: &str, metrics: &mut SearchMetrics) {
        self.generation += 1;
        metrics.generations += 1;
        debug!(
            "{name} generation {}: population {}",
            self.generation,
            self.population.len()
        );
    }
}

/// Selection, crossover and mutation with their application rates.
pub struct GeneticOperators<T: Genotype> {
    pub selection: Box<dyn SelectionFunction<T>>,
    pub crossover: Box<dyn CrossoverFunction<T>>,
    pub mutation: Box<dyn MutationFunction<T>>,
    /// Probability of crossing two parents instead of copying the first.
    pub p_crossover: f64,
    /// Probability of mutating an offspring.
    pub p_mutate: f64,
}

impl<T: Genotype> GeneticOperators<T> {
    /// Produces `count` offspring from `population`.
    ///
    /// Parents are taken pairwise from one selection call, cycling when more
    /// pairs are needed. A pair is crossed with probability `p_crossover`
    /// (otherwise the first parent is copied) and the result mutated with
    /// probability `p_mutate`.
    pub(crate) fn breed(
        &self,
        population: &[Chromosome<T>],
        fitness_functions: &[Box<dyn FitnessFunction<T>>],
        count: usize,
        env: &mut dyn Environment<T::Action>,
        rng: &mut dyn RngCore,
        metrics: &mut SearchMetrics,
    ) -> Vec<Chromosome<T>> {
        let mut offspring = Vec::with_capacity(count);
        if count == 0 || population.is_empty() {
            return offspring;
        }

        let parents = timed(&mut metrics.selection_time, || {
            self.selection.select(population, fitness_functions, &mut *rng)
        });
        let n = parents.len();
        let mut next = 0;

        while offspring.len() < count {
            let pair = [parents[next % n].clone(), parents[(next + 1) % n].clone()];
            next += 2;

            let child = if chance(&mut *rng, self.p_crossover) {
                metrics.crossovers += 1;
                timed(&mut metrics.crossover_time, || {
                    self.crossover.cross(&pair, &mut *env, &mut *rng)
                })
            } else {
                pair[0].clone()
            };

            if chance(&mut *rng, self.p_mutate) {
                metrics.mutations += 1;
                let mutants = timed(&mut metrics.mutation_time, || {
                    self.mutation.mutate(&child, &mut *env, &mut *rng)
                });
                if mutants.is_empty() {
                    offspring.push(child);
                }
                for m in mutants {
                    if offspring.len() < count {
                        offspring.push(m);
                    }
                }
            } else {
                offspring.push(child);
            }
        }

        offspring
    }
}
