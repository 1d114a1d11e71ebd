//! Search statistics owned by the caller.

use std::fmt;
use std::time::{Duration, Instant};

/// Counters and accumulated timings of one or more searches.
///
/// The caller owns the metrics and passes them by `&mut` into every search
/// call, so several searches may share one instance or keep their own.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchMetrics {
    /// Completed generations.
    pub generations: usize,
    /// Chromosomes built by factories.
    pub chromosomes_created: usize,
    /// Crossover applications.
    pub crossovers: usize,
    /// Mutation applications.
    pub mutations: usize,
    pub factory_time: Duration,
    pub selection_time: Duration,
    pub crossover_time: Duration,
    pub mutation_time: Duration,
    /// Time spent in fitness-driven environmental selection and archiving.
    pub evaluation_time: Duration,
}

impl SearchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of all accumulated timings.
    pub fn total_time(&self) -> Duration {
        self.factory_time
            + self.selection_time
            + self.crossover_time
            + self.mutation_time
            + self.evaluation_time
    }
}

impl fmt::Display for SearchMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} generations, {} created, {} crossovers, {} mutations \
             (factory {:?}, selection {:?}, crossover {:?}, mutation {:?}, evaluation {:?})",
            self.generations,
            self.chromosomes_created,
            self.crossovers,
            self.mutations,
            self.factory_time,
            self.selection_time,
            self.crossover_time,
            self.mutation_time,
            self.evaluation_time,
        )
    }
}

/// Runs `f`, adding its wall-clock duration to `slot`.
pub(crate) fn timed<R>(slot: &mut Duration, f: impl FnOnce() -> R) -> R {
    let start = Instant::now();
    let result = f();
    *slot += start.elapsed();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_accumulates() {
        let mut slot = Duration::ZERO;
        let v = timed(&mut slot, || {
            std::thread::sleep(Duration::from_millis(2));
            7
        });
        assert_eq!(v, 7);
        assert!(slot >= Duration::from_millis(2));
        let before = slot;
        timed(&mut slot, || ());
        assert!(slot >= before);
    }

    #[test]
    fn test_total_and_display() {
        let metrics = SearchMetrics {
            generations: 3,
            factory_time: Duration::from_millis(5),
            mutation_time: Duration::from_millis(7),
            ..SearchMetrics::default()
        };
        assert_eq!(metrics.total_time(), Duration::from_millis(12));
        assert!(metrics.to_string().starts_with("3 generations"));
    }
}
