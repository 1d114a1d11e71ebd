//! The fitness function contract.

use std::cmp::Ordering;

use crate::chromosome::{Chromosome, Genotype};

/// Maps a chromosome to a scalar quality signal.
///
/// Each function states its own direction through
/// [`is_maximizing`](Self::is_maximizing).
/// Selection and replacement that need a common scale use
/// [`maximizing_score`], which inverts minimizing functions as
/// `1 - normalized`.
pub trait FitnessFunction<T: Genotype>: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Raw fitness value.
    fn fitness(&self, chromosome: &Chromosome<T>) -> f64;

    /// Whether larger raw values are better.
    fn is_maximizing(&self) -> bool;

    /// Fitness normalized to `[0, 1]`, in the function's own direction.
    fn normalized_fitness(&self, chromosome: &Chromosome<T>) -> f64;
}

impl<T: Genotype, F: FitnessFunction<T> + ?Sized> FitnessFunction<T> for Box<F> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fitness(&self, chromosome: &Chromosome<T>) -> f64 {
        (**self).fitness(chromosome)
    }

    fn is_maximizing(&self) -> bool {
        (**self).is_maximizing()
    }

    fn normalized_fitness(&self, chromosome: &Chromosome<T>) -> f64 {
        (**self).normalized_fitness(chromosome)
    }
}

/// Normalized fitness on a maximizing scale: higher is always better.
pub fn maximizing_score<T: Genotype, F: FitnessFunction<T> + ?Sized>(
    function: &F,
    chromosome: &Chromosome<T>,
) -> f64 {
    let normalized = function.normalized_fitness(chromosome).clamp(0.0, 1.0);
    if function.is_maximizing() {
        normalized
    } else {
        1.0 - normalized
    }
}

/// Compares two chromosomes by raw fitness.
///
/// Returns [`Ordering::Greater`] when `a` is better than `b`.
pub fn compare_fitness<T: Genotype, F: FitnessFunction<T> + ?Sized>(
    function: &F,
    a: &Chromosome<T>,
    b: &Chromosome<T>,
) -> Ordering {
    let fa = function.fitness(a);
    let fb = function.fitness(b);
    let ord = fa.partial_cmp(&fb).unwrap_or(Ordering::Equal);
    if function.is_maximizing() {
        ord
    } else {
        ord.reverse()
    }
}
