//! Behavioural novelty.

use std::collections::HashSet;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::chromosome::{Chromosome, Genotype};

use super::cache::ObjectiveCache;

/// Scores how different a chromosome behaves from a reference set.
pub trait NoveltyFunction<T: Genotype>: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Novelty of `chromosome` relative to `population` and `archive`.
    ///
    /// Higher is more novel. The chromosome itself is ignored if it appears
    /// in either set.
    fn novelty(
        &self,
        chromosome: &Chromosome<T>,
        population: &[Chromosome<T>],
        archive: &[Chromosome<T>],
    ) -> f64;
}

/// k-nearest-neighbour novelty in objective space.
///
/// The behaviour of a chromosome is its objective vector (one value per
/// target, from a shared [`ObjectiveCache`]). Novelty is the mean Euclidean
/// distance to the `k` nearest distinct chromosomes, divided by
/// `sqrt(#targets)` so it lies in `[0, 1]`. A chromosome with no neighbours
/// has novelty `1.0`.
pub struct BehaviorNovelty {
    cache: Arc<ObjectiveCache>,
    nearest_neighbours: usize,
}

impl BehaviorNovelty {
    pub fn new(cache: Arc<ObjectiveCache>, nearest_neighbours: usize) -> Self {
        Self {
            cache,
            nearest_neighbours: nearest_neighbours.max(1),
        }
    }
}

impl<T: Genotype> NoveltyFunction<T> for BehaviorNovelty {
    fn name(&self) -> &str {
        "behaviour novelty"
    }

    fn novelty(
        &self,
        chromosome: &Chromosome<T>,
        population: &[Chromosome<T>],
        archive: &[Chromosome<T>],
    ) -> f64 {
        let dims = self.cache.targets().len();
        if dims == 0 {
            return 0.0;
        }
        let behaviour = self.cache.objectives(chromosome);

        let mut seen = HashSet::new();
        seen.insert(chromosome.id());
        let neighbours: Vec<Arc<[f64]>> = population
            .iter()
            .chain(archive)
            .filter(|c| seen.insert(c.id()))
            .map(|c| self.cache.objectives(c))
            .collect();
        if neighbours.is_empty() {
            return 1.0;
        }

        let mut distances = distances_to(&behaviour, &neighbours);
        distances.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let k = self.nearest_neighbours.min(distances.len());
        let mean = distances[..k].iter().sum::<f64>() / k as f64;
        (mean / (dims as f64).sqrt()).clamp(0.0, 1.0)
    }
}

#[cfg(feature = "parallel")]
fn distances_to(behaviour: &[f64], neighbours: &[Arc<[f64]>]) -> Vec<f64> {
    neighbours
        .par_iter()
        .map(|other| euclidean(behaviour, other))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn distances_to(behaviour: &[f64], neighbours: &[Arc<[f64]>]) -> Vec<f64> {
    neighbours
        .iter()
        .map(|other| euclidean(behaviour, other))
        .collect()
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
