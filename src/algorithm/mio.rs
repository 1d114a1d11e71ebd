//! Many Independent Objective (MIO) search.
//!
//! One archive per target (one per fitness function). Each generation either
//! samples a fresh chromosome or mutates an archived chromosome of a random
//! uncovered target, and offers every new chromosome to all archives. As
//! the search budget is consumed the parameters move from exploration
//! (frequent random sampling, wide archives) to a focused phase (no random
//! sampling, one chromosome per target, long mutation chains).
//!
//! # References
//!
//! - Arcuri (2018), "Test suite generation with the Many Independent
//!   Objective (MIO) algorithm"

use std::collections::HashSet;

use log::{debug, trace};
use rand::seq::IndexedRandom;

use super::metrics::{timed, SearchMetrics};
use super::shared::SearchCore;
use super::{SearchAlgorithm, SearchState};
use crate::chromosome::{Chromosome, Genotype};
use crate::env::Environment;
use crate::fitness::{maximizing_score, FitnessFunction};
use crate::mutation::MutationFunction;
use crate::random::chance;

/// Exploration and focused-phase parameters of [`Mio`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MioParameters {
    /// Probability of sampling a fresh chromosome at the start.
    pub p_sample_random: f64,
    /// Probability of sampling once focused.
    pub p_sample_random_focused: f64,
    /// Per-target archive capacity at the start.
    pub archive_size: usize,
    /// Per-target archive capacity once focused.
    pub archive_size_focused: usize,
    /// Chained mutations per archived parent at the start.
    pub mutation_count: usize,
    /// Chained mutations once focused.
    pub mutation_count_focused: usize,
    /// Fraction of the search budget after which the search is focused.
    pub focused_search_start: f64,
}

impl Default for MioParameters {
    fn default() -> Self {
        Self {
            p_sample_random: 0.5,
            p_sample_random_focused: 0.0,
            archive_size: 10,
            archive_size_focused: 1,
            mutation_count: 1,
            mutation_count_focused: 10,
            focused_search_start: 0.5,
        }
    }
}

/// Parameter values in effect at one point of the search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Phase {
    pub p_sample_random: f64,
    pub archive_size: usize,
    pub mutation_count: usize,
}

impl MioParameters {
    /// Parameters at `progress` (fraction of budget consumed, in `[0, 1]`).
    pub(crate) fn phase(&self, progress: f64) -> Phase {
        let t = if self.focused_search_start <= 0.0 {
            1.0
        } else {
            (progress / self.focused_search_start).clamp(0.0, 1.0)
        };
        let lerp = |from: f64, to: f64| from + (to - from) * t;
        let lerp_count =
            |from: usize, to: usize| (lerp(from as f64, to as f64).round() as usize).max(1);
        Phase {
            p_sample_random: lerp(self.p_sample_random, self.p_sample_random_focused),
            archive_size: lerp_count(self.archive_size, self.archive_size_focused),
            mutation_count: lerp_count(self.mutation_count, self.mutation_count_focused),
        }
    }
}

/// Archive of one target.
#[derive(Debug)]
struct TargetArchive<T> {
    /// Chromosomes with their score for this target.
    entries: Vec<(Chromosome<T>, f64)>,
    covered: bool,
}

impl<T: Genotype> TargetArchive<T> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            covered: false,
        }
    }

    /// Offers `chromosome` scoring `h` (maximizing, in `[0, 1]`).
    fn offer(&mut self, chromosome: &Chromosome<T>, h: f64, capacity: usize) {
        if self.covered {
            if h >= 1.0 && chromosome.length() < self.entries[0].0.length() {
                self.entries[0] = (chromosome.clone(), h);
            }
            return;
        }
        if h >= 1.0 {
            self.covered = true;
            self.entries = vec![(chromosome.clone(), h)];
            return;
        }
        if h <= 0.0 {
            return;
        }
        self.entries.push((chromosome.clone(), h));
        self.shrink(capacity);
    }

    /// Drops the worst entries (lowest score, then longest) beyond `capacity`.
    fn shrink(&mut self, capacity: usize) {
        if self.covered || self.entries.len() <= capacity {
            return;
        }
        self.entries.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.length().cmp(&b.0.length()))
        });
        self.entries.truncate(capacity);
    }
}

/// Archive-guided focused search.
///
/// [`population`](SearchAlgorithm::population) is built from the archives
/// (each chromosome once) at every generation boundary and kept within
/// `population_size..=big_population_size`. Above the upper bound the best
/// archived chromosomes are kept, ranked by aggregated maximizing score and
/// then by length. A shortfall is filled from the previous population and
/// this generation's offspring, then from fresh samples. The archives keep
/// their own capacities. The initial population seeds the archives.
pub struct Mio<T: Genotype> {
    core: SearchCore<T>,
    mutation: Box<dyn MutationFunction<T>>,
    parameters: MioParameters,
    archives: Vec<TargetArchive<T>>,
    big_population_size: usize,
}

impl<T: Genotype> Mio<T> {
    pub const NAME: &'static str = "MIO";

    /// # Panics
    /// Panics if no fitness function is configured.
    pub fn new(
        core: SearchCore<T>,
        mutation: Box<dyn MutationFunction<T>>,
        parameters: MioParameters,
        big_population_size: usize,
    ) -> Self {
        assert!(
            !core.fitness_functions.is_empty(),
            "{} needs at least one fitness function",
            Self::NAME
        );
        let archives = core
            .fitness_functions
            .iter()
            .map(|_| TargetArchive::new())
            .collect();
        let big_population_size = big_population_size.max(core.population_size);
        Self {
            core,
            mutation,
            parameters,
            archives,
            big_population_size,
        }
    }

    pub fn parameters(&self) -> &MioParameters {
        &self.parameters
    }

    /// Number of targets with a covering chromosome.
    pub fn covered_targets(&self) -> usize {
        self.archives.iter().filter(|a| a.covered).count()
    }

    fn current_phase(&self) -> Phase {
        let progress = self.core.termination.progress().unwrap_or(0.0);
        self.parameters.phase(progress)
    }

    /// Offers `chromosome` to every target archive.
    fn archive(
        &mut self,
        chromosome: &Chromosome<T>,
        capacity: usize,
        metrics: &mut SearchMetrics,
    ) {
        let functions = &self.core.fitness_functions;
        let archives = &mut self.archives;
        timed(&mut metrics.evaluation_time, || {
            for (f, archive) in functions.iter().zip(archives.iter_mut()) {
                let h = maximizing_score(f.as_ref(), chromosome);
                archive.offer(chromosome, h, capacity);
            }
        });
    }

    /// A random archived chromosome of a random uncovered target.
    fn pick_parent(&mut self) -> Option<Chromosome<T>> {
        let candidates: Vec<&TargetArchive<T>> = self
            .archives
            .iter()
            .filter(|a| !a.covered && !a.entries.is_empty())
            .collect();
        let archive = candidates.choose(&mut self.core.rng)?;
        archive
            .entries
            .choose(&mut self.core.rng)
            .map(|(c, _)| c.clone())
    }

    /// Sorts best-first by aggregated maximizing score, shorter first on ties.
    fn rank(&self, chromosomes: &mut [Chromosome<T>]) {
        let functions = &self.core.fitness_functions;
        let score = |c: &Chromosome<T>| -> f64 {
            functions
                .iter()
                .map(|f| maximizing_score(f.as_ref(), c))
                .sum()
        };
        chromosomes.sort_by(|a, b| {
            score(b)
                .partial_cmp(&score(a))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.length().cmp(&b.length()))
        });
    }

    /// Rebuilds the population from the archives within
    /// `population_size..=big_population_size`.
    ///
    /// `candidates` fill a shortfall before fresh samples do.
    fn rebuild_population(
        &mut self,
        candidates: Vec<Chromosome<T>>,
        env: &mut dyn Environment<T::Action>,
        metrics: &mut SearchMetrics,
    ) {
        let mut seen = HashSet::new();
        let mut population: Vec<Chromosome<T>> = self
            .archives
            .iter()
            .flat_map(|a| a.entries.iter().map(|(c, _)| c))
            .filter(|c| seen.insert(c.id()))
            .cloned()
            .collect();

        if population.len() > self.big_population_size {
            timed(&mut metrics.evaluation_time, || self.rank(&mut population));
            population.truncate(self.big_population_size);
        }

        let size = self.core.population_size;
        if population.len() < size {
            let mut extra: Vec<Chromosome<T>> = candidates
                .into_iter()
                .filter(|c| seen.insert(c.id()))
                .collect();
            timed(&mut metrics.evaluation_time, || self.rank(&mut extra));
            let missing = size - population.len();
            population.extend(extra.into_iter().take(missing));
        }

        let capacity = self.current_phase().archive_size;
        while population.len() < size {
            let c = self.core.sample(&mut *env, metrics);
            trace!("{} fills population with {:?}", Self::NAME, c.id());
            self.archive(&c, capacity, metrics);
            population.push(c);
        }

        self.core.population = population;
    }

    /// Fitness functions, one per target.
    pub fn targets(&self) -> &[Box<dyn FitnessFunction<T>>] {
        &self.core.fitness_functions
    }
}

impl<T: Genotype> SearchAlgorithm<T> for Mio<T> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn create_initial_population(
        &mut self,
        env: &mut dyn Environment<T::Action>,
        metrics: &mut SearchMetrics,
    ) {
        self.core.initialize(&mut *env, metrics);
        let capacity = self.current_phase().archive_size;
        let initial = std::mem::take(&mut self.core.population);
        for c in &initial {
            self.archive(c, capacity, metrics);
        }
        self.rebuild_population(initial, env, metrics);
    }

    fn evolve(&mut self, env: &mut dyn Environment<T::Action>, metrics: &mut SearchMetrics) {
        if !self.core.begin_generation(Self::NAME) {
            return;
        }
        let phase = self.current_phase();
        for archive in &mut self.archives {
            archive.shrink(phase.archive_size);
        }

        let parent = if chance(&mut self.core.rng, phase.p_sample_random) {
            None
        } else {
            self.pick_parent()
        };

        let mut offspring = Vec::new();
        match parent {
            None => {
                let c = self.core.sample(&mut *env, metrics);
                trace!("{} samples {:?}", Self::NAME, c.id());
                self.archive(&c, phase.archive_size, metrics);
                offspring.push(c);
            }
            Some(mut current) => {
                for _ in 0..phase.mutation_count {
                    metrics.mutations += 1;
                    let mutation = &self.mutation;
                    let rng = &mut self.core.rng;
                    let mutants = timed(&mut metrics.mutation_time, || {
                        mutation.mutate(&current, &mut *env, rng)
                    });
                    for m in &mutants {
                        self.archive(m, phase.archive_size, metrics);
                    }
                    if let Some(last) = mutants.last() {
                        current = last.clone();
                    }
                    offspring.extend(mutants);
                }
            }
        }

        offspring.extend(self.core.population.iter().cloned());
        self.rebuild_population(offspring, env, metrics);
        debug!(
            "{} covers {}/{} targets (p_sample {:.2}, archive {}, mutations {})",
            Self::NAME,
            self.covered_targets(),
            self.archives.len(),
            phase.p_sample_random,
            phase.archive_size,
            phase.mutation_count
        );
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
