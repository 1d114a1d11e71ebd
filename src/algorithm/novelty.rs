//! Novelty search.

use std::cmp::Ordering;
use std::sync::Arc;

use super::archive::NoveltyArchive;
use super::metrics::{timed, SearchMetrics};
use super::shared::{GeneticOperators, SearchCore};
use super::{SearchAlgorithm, SearchState};
use crate::chromosome::{Chromosome, Genotype};
use crate::env::Environment;
use crate::fitness::{FitnessCache, FitnessFunction, NoveltyFunction};

/// Novelty recorded for each chromosome when it was created, exposed as a
/// maximizing fitness so the configured selection can rank by it.
struct NoveltyScores {
    scores: Arc<FitnessCache<f64>>,
}

impl<T: Genotype> FitnessFunction<T> for NoveltyScores {
    fn name(&self) -> &str {
        "novelty"
    }

    fn fitness(&self, chromosome: &Chromosome<T>) -> f64 {
        self.scores.get(chromosome.id()).unwrap_or(0.0)
    }

    fn is_maximizing(&self) -> bool {
        true
    }

    fn normalized_fitness(&self, chromosome: &Chromosome<T>) -> f64 {
        <Self as FitnessFunction<T>>::fitness(self, chromosome).clamp(0.0, 1.0)
    }
}

/// Novelty search.
///
/// Every newly created chromosome (initial population and offspring) is
/// scored once by the novelty function against the current population and
/// the archive, then offered to the [`NoveltyArchive`]. Offspring are bred
/// as in the standard genetic algorithm with parents ranked by novelty, and
/// the `population_size` most novel chromosomes survive.
///
/// The fitness functions of the core do not steer this search; they are
/// kept for callers that report on the final population.
pub struct NoveltySearch<T: Genotype> {
    core: SearchCore<T>,
    operators: GeneticOperators<T>,
    novelty: Box<dyn NoveltyFunction<T>>,
    archive: NoveltyArchive<T>,
    big_population_size: usize,
    scores: Arc<FitnessCache<f64>>,
    ranking: Vec<Box<dyn FitnessFunction<T>>>,
}

impl<T: Genotype> NoveltySearch<T> {
    pub const NAME: &'static str = "novelty search";

    pub fn new(
        core: SearchCore<T>,
        operators: GeneticOperators<T>,
        novelty: Box<dyn NoveltyFunction<T>>,
        archive: NoveltyArchive<T>,
        big_population_size: usize,
    ) -> Self {
        let scores = Arc::new(FitnessCache::new());
        let ranking: Vec<Box<dyn FitnessFunction<T>>> = vec![Box::new(NoveltyScores {
            scores: Arc::clone(&scores),
        })];
        let big_population_size = big_population_size.max(core.population_size);
        Self {
            core,
            operators,
            novelty,
            archive,
            big_population_size,
            scores,
            ranking,
        }
    }

    pub fn archive(&self) -> &NoveltyArchive<T> {
        &self.archive
    }

    /// Novelty recorded for `chromosome` at creation.
    pub fn novelty_of(&self, chromosome: &Chromosome<T>) -> Option<f64> {
        self.scores.get(chromosome.id())
    }

    /// Scores and archives the chromosomes of `fresh` not seen before.
    fn score_new(&mut self, fresh: &[Chromosome<T>], metrics: &mut SearchMetrics) {
        let population = &self.core.population;
        let novelty = &self.novelty;
        let scores = &self.scores;
        let archive = &mut self.archive;
        timed(&mut metrics.evaluation_time, || {
            for c in fresh {
                if scores.get(c.id()).is_some() {
                    continue;
                }
                let score = novelty.novelty(c, population, &archive.chromosomes());
                scores.get_or_insert_with(c.id(), || score);
                archive.admit(c.clone(), score);
            }
        });
    }
}

impl<T: Genotype> SearchAlgorithm<T> for NoveltySearch<T> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn create_initial_population(
        &mut self,
        env: &mut dyn Environment<T::Action>,
        metrics: &mut SearchMetrics,
    ) {
        self.core.initialize(env, metrics);
        let initial = self.core.population.clone();
        self.score_new(&initial, metrics);
    }

    fn evolve(&mut self, env: &mut dyn Environment<T::Action>, metrics: &mut SearchMetrics) {
        if !self.core.begin_generation(Self::NAME) {
            return;
        }

        let core = &mut self.core;
        let count = self.big_population_size.saturating_sub(core.population.len());
        let offspring = self.operators.breed(
            &core.population,
            &self.ranking,
            count,
            env,
            &mut core.rng,
            metrics,
        );
        core.population.extend(offspring.iter().cloned());
        self.score_new(&offspring, metrics);

        let ranking = &self.ranking[0];
        let core = &mut self.core;
        let population = &mut core.population;
        timed(&mut metrics.evaluation_time, || {
            population.sort_by(|a, b| {
                ranking
                    .fitness(b)
                    .partial_cmp(&ranking.fitness(a))
                    .unwrap_or(Ordering::Equal)
            });
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
