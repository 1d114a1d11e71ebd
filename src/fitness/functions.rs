//! Built-in fitness functions.

use std::sync::Arc;

use crate::chromosome::{Chromosome, Genotype};
use crate::env::ObjectiveSource;

use super::cache::ObjectiveCache;
use super::types::FitnessFunction;

/// Overall coverage reported by the instrumentation layer. Maximizing.
///
/// Every call queries the [`ObjectiveSource`]; wrap it in
/// [`Cached`](super::Cached) for use inside a search.
pub struct CoverageFitness {
    source: Arc<dyn ObjectiveSource>,
}

impl CoverageFitness {
    pub fn new(source: Arc<dyn ObjectiveSource>) -> Self {
        Self { source }
    }
}

impl<T: Genotype> FitnessFunction<T> for CoverageFitness {
    fn name(&self) -> &str {
        "coverage"
    }

    fn fitness(&self, chromosome: &Chromosome<T>) -> f64 {
        self.source.coverage(&chromosome.value().test_case_ids())
    }

    fn is_maximizing(&self) -> bool {
        true
    }

    fn normalized_fitness(&self, chromosome: &Chromosome<T>) -> f64 {
        self.fitness(chromosome).clamp(0.0, 1.0)
    }
}

/// Payload length. Minimizing.
///
/// Normalized against `max_length` (the configured maximum number of
/// events per test case, or test cases per suite).
pub struct TestLengthFitness {
    max_length: usize,
}

impl TestLengthFitness {
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length: max_length.max(1),
        }
    }
}

impl<T: Genotype> FitnessFunction<T> for TestLengthFitness {
    fn name(&self) -> &str {
        "test length"
    }

    fn fitness(&self, chromosome: &Chromosome<T>) -> f64 {
        chromosome.length() as f64
    }

    fn is_maximizing(&self) -> bool {
        false
    }

    fn normalized_fitness(&self, chromosome: &Chromosome<T>) -> f64 {
        (chromosome.length() as f64 / self.max_length as f64).min(1.0)
    }
}

/// `1.0` if the chromosome crashed the target, `0.0` otherwise. Maximizing.
#[derive(Debug, Default)]
pub struct CrashFitness;

impl<T: Genotype> FitnessFunction<T> for CrashFitness {
    fn name(&self) -> &str {
        "crash"
    }

    fn fitness(&self, chromosome: &Chromosome<T>) -> f64 {
        if chromosome.has_crash() {
            1.0
        } else {
            0.0
        }
    }

    fn is_maximizing(&self) -> bool {
        true
    }

    fn normalized_fitness(&self, chromosome: &Chromosome<T>) -> f64 {
        <Self as FitnessFunction<T>>::fitness(self, chromosome)
    }
}

/// Objective value of one coverage target, read from a shared
/// [`ObjectiveCache`]. Maximizing; `1.0` means covered.
pub struct TargetFitness {
    cache: Arc<ObjectiveCache>,
    index: usize,
    name: String,
}

impl TargetFitness {
    /// # Panics
    /// Panics if `index` is not a target index of `cache`.
    pub fn new(cache: Arc<ObjectiveCache>, index: usize) -> Self {
        let target = cache.targets()[index];
        Self {
            cache,
            index,
            name: format!("target {}", target.0),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl<T: Genotype> FitnessFunction<T> for TargetFitness {
    fn name(&self) -> &str {
        &self.name
    }

    fn fitness(&self, chromosome: &Chromosome<T>) -> f64 {
        self.cache.value(chromosome, self.index)
    }

    fn is_maximizing(&self) -> bool {
        true
    }

    fn normalized_fitness(&self, chromosome: &Chromosome<T>) -> f64 {
        self.cache.value(chromosome, self.index).clamp(0.0, 1.0)
    }
}

/// One [`TargetFitness`] per target of `cache`, in target order.
pub fn target_fitness_functions<T: Genotype>(
    cache: &Arc<ObjectiveCache>,
) -> Vec<Box<dyn FitnessFunction<T>>> {
    (0..cache.targets().len())
        .map(|i| Box::new(TargetFitness::new(Arc::clone(cache), i)) as Box<dyn FitnessFunction<T>>)
        .collect()
}
