//! Memoization of fitness evaluations by chromosome identity.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::chromosome::{Chromosome, ChromosomeId, Genotype};
use crate::env::{ObjectiveSource, TargetId};

use super::types::FitnessFunction;

/// Append-only map from chromosome identity to an evaluated value.
///
/// Guarded by a mutex so that fitness functions stay `Send + Sync`; the
/// engine itself only accesses it from one thread.
#[derive(Debug)]
pub struct FitnessCache<V> {
    entries: Mutex<HashMap<ChromosomeId, V>>,
}

impl<V> Default for FitnessCache<V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<V: Clone> FitnessCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `id`, computing and storing it first if
    /// absent. The lock is not held while `compute` runs.
    pub fn get_or_insert_with(&self, id: ChromosomeId, compute: impl FnOnce() -> V) -> V {
        if let Some(v) = self.lock().get(&id) {
            return v.clone();
        }
        let value = compute();
        self.lock().entry(id).or_insert(value).clone()
    }

    pub fn get(&self, id: ChromosomeId) -> Option<V> {
        self.lock().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ChromosomeId, V>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Memoizing wrapper around any fitness function.
///
/// The raw and normalized values are computed together on first access.
pub struct Cached<F> {
    inner: F,
    cache: FitnessCache<(f64, f64)>,
}

impl<F> Cached<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            cache: FitnessCache::new(),
        }
    }

    /// Number of distinct chromosomes evaluated so far.
    pub fn evaluations(&self) -> usize {
        self.cache.len()
    }
}

impl<F> Cached<F> {
    fn entry<T: Genotype>(&self, chromosome: &Chromosome<T>) -> (f64, f64)
    where
        F: FitnessFunction<T>,
    {
        self.cache.get_or_insert_with(chromosome.id(), || {
            (
                self.inner.fitness(chromosome),
                self.inner.normalized_fitness(chromosome),
            )
        })
    }
}

impl<T: Genotype, F: FitnessFunction<T>> FitnessFunction<T> for Cached<F> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn fitness(&self, chromosome: &Chromosome<T>) -> f64 {
        self.entry(chromosome).0
    }

    fn is_maximizing(&self) -> bool {
        self.inner.is_maximizing()
    }

    fn normalized_fitness(&self, chromosome: &Chromosome<T>) -> f64 {
        self.entry(chromosome).1
    }
}

/// Batched multi-objective cache.
///
/// The first request for any target of a chromosome retrieves the values of
/// all configured targets in one [`ObjectiveSource`] call.
pub struct ObjectiveCache {
    source: Arc<dyn ObjectiveSource>,
    targets: Vec<TargetId>,
    cache: FitnessCache<Arc<[f64]>>,
}

impl ObjectiveCache {
    pub fn new(source: Arc<dyn ObjectiveSource>, targets: Vec<TargetId>) -> Self {
        Self {
            source,
            targets,
            cache: FitnessCache::new(),
        }
    }

    pub fn targets(&self) -> &[TargetId] {
        &self.targets
    }

    /// Objective vector of a chromosome, one value per target.
    pub fn objectives<T: Genotype>(&self, chromosome: &Chromosome<T>) -> Arc<[f64]> {
        self.cache.get_or_insert_with(chromosome.id(), || {
            let ids = chromosome.value().test_case_ids();
            let mut values = self.source.objective_values(&ids, &self.targets);
            values.resize(self.targets.len(), 0.0);
            values.into()
        })
    }

    /// Objective value of one target.
    ///
    /// # Panics
    /// Panics if `index` is not a valid target index.
    pub fn value<T: Genotype>(&self, chromosome: &Chromosome<T>, index: usize) -> f64 {
        self.objectives(chromosome)[index]
    }

    /// Number of chromosomes whose objectives were retrieved.
    pub fn evaluations(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chromosome::{TestCase, TestCaseRecorder};
    use crate::env::TestCaseId;
    use crate::testing::{TestAction, TestApp};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
    }

    impl ObjectiveSource for CountingSource {
        fn objective_values(&self, _: &[TestCaseId], targets: &[TargetId]) -> Vec<f64> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            targets.iter().map(|t| t.0 as f64 / 10.0).collect()
        }

        fn coverage(&self, _: &[TestCaseId]) -> f64 {
            self.calls.fetch_add(1, Ordering::Relaxed);
            0.5
        }
    }

    fn empty_chromosome() -> Chromosome<TestCase<TestAction>> {
        let mut app = TestApp::chain(2);
        Chromosome::new(TestCaseRecorder::start(&mut app, 0).finish())
    }

    #[test]
    fn test_cache_computes_once() {
        let cache = FitnessCache::new();
        let c = empty_chromosome();
        let mut computed = 0;
        for _ in 0..3 {
            let v = cache.get_or_insert_with(c.id(), || {
                computed += 1;
                4.2
            });
            assert_eq!(v, 4.2);
        }
        assert_eq!(computed, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_identity_not_structure() {
        let cache = FitnessCache::new();
        let a = empty_chromosome();
        let b = empty_chromosome();
        cache.get_or_insert_with(a.id(), || 1.0);
        assert_eq!(cache.get(a.clone().id()), Some(1.0));
        assert_eq!(cache.get(b.id()), None);
    }

    #[test]
    fn test_objective_cache_batches_targets() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let cache = ObjectiveCache::new(
            source.clone(),
            vec![TargetId(1), TargetId(2), TargetId(3)],
        );
        let c = empty_chromosome();

        assert!((cache.value(&c, 0) - 0.1).abs() < 1e-12);
        assert!((cache.value(&c, 2) - 0.3).abs() < 1e-12);
        assert_eq!(cache.objectives(&c).len(), 3);
        assert_eq!(source.calls.load(Ordering::Relaxed), 1);
        assert_eq!(cache.evaluations(), 1);
    }

    #[test]
    fn test_cached_wrapper() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let f = Cached::new(crate::fitness::CoverageFitness::new(source.clone()));
        let c = empty_chromosome();

        assert_eq!(f.fitness(&c), 0.5);
        assert_eq!(f.normalized_fitness(&c), 0.5);
        assert_eq!(f.fitness(&c), 0.5);
        assert!(FitnessFunction::<TestCase<TestAction>>::is_maximizing(&f));
        assert_eq!(f.evaluations(), 1);
        // fitness + normalized computed together on first access
        assert_eq!(source.calls.load(Ordering::Relaxed), 2);
    }
}
