//! Built-in termination conditions.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::TerminationCondition;

/// Never stops on its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverTermination;

impl TerminationCondition for NeverTermination {
    fn is_met(&mut self) -> bool {
        false
    }
}

/// Stops once it has been polled `limit` times.
///
/// The first `limit` polls return `false`; every later poll returns `true`.
#[derive(Debug, Clone)]
pub struct IterationTermination {
    limit: usize,
    polls: usize,
}

impl IterationTermination {
    pub fn new(limit: usize) -> Self {
        Self { limit, polls: 0 }
    }

    /// Number of polls so far.
    pub fn polls(&self) -> usize {
        self.polls
    }
}

impl TerminationCondition for IterationTermination {
    fn is_met(&mut self) -> bool {
        if self.polls >= self.limit {
            return true;
        }
        self.polls += 1;
        false
    }

    fn progress(&self) -> Option<f64> {
        if self.limit == 0 {
            return Some(1.0);
        }
        Some(self.polls as f64 / self.limit as f64)
    }
}

/// Delegates to an external signal.
///
/// Setting the flag stops the search at the next generation boundary.
#[derive(Debug, Clone)]
pub struct ConditionalTermination {
    signal: Arc<AtomicBool>,
}

impl ConditionalTermination {
    pub fn new(signal: Arc<AtomicBool>) -> Self {
        Self { signal }
    }

    /// The shared stop flag.
    pub fn signal(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.signal)
    }
}

impl TerminationCondition for ConditionalTermination {
    fn is_met(&mut self) -> bool {
        self.signal.load(Ordering::Relaxed)
    }
}

/// Wall-clock budget.
///
/// The clock starts on the first poll, so time spent assembling the search
/// does not count. The check happens at generation boundaries only: the
/// actual runtime may exceed the budget by one generation's worth of work.
#[derive(Debug, Clone)]
pub struct TimeBudgetTermination {
    budget: Duration,
    started: Option<Instant>,
}

impl TimeBudgetTermination {
    pub fn new(budget: Duration) -> Self {
        Self {
            budget,
            started: None,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }
}

impl TerminationCondition for TimeBudgetTermination {
    fn is_met(&mut self) -> bool {
        let started = *self.started.get_or_insert_with(Instant::now);
        started.elapsed() >= self.budget
    }

    fn progress(&self) -> Option<f64> {
        let Some(started) = self.started else {
            return Some(0.0);
        };
        if self.budget.is_zero() {
            return Some(1.0);
        }
        Some((started.elapsed().as_secs_f64() / self.budget.as_secs_f64()).min(1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never() {
        let mut t = NeverTermination;
        for _ in 0..100 {
            assert!(!t.is_met());
        }
        assert_eq!(t.progress(), None);
    }

    #[test]
    fn test_iterations_true_after_n_polls() {
        let mut t = IterationTermination::new(3);
        assert!(!t.is_met());
        assert!(!t.is_met());
        assert!(!t.is_met());
        assert!(t.is_met());
        assert!(t.is_met());
        assert_eq!(t.polls(), 3);
        assert_eq!(t.progress(), Some(1.0));
    }

    #[test]
    fn test_iterations_progress() {
        let mut t = IterationTermination::new(4);
        assert_eq!(t.progress(), Some(0.0));
        t.is_met();
        assert_eq!(t.progress(), Some(0.25));
    }

    #[test]
    fn test_conditional_follows_signal() {
        let signal = Arc::new(AtomicBool::new(false));
        let mut t = ConditionalTermination::new(Arc::clone(&signal));
        assert!(!t.is_met());
        signal.store(true, Ordering::Relaxed);
        assert!(t.is_met());
    }

    #[test]
    fn test_time_budget() {
        let mut zero = TimeBudgetTermination::new(Duration::ZERO);
        assert!(zero.is_met());

        let mut long = TimeBudgetTermination::from_millis(60_000);
        assert_eq!(long.progress(), Some(0.0));
        assert!(!long.is_met());
        let p = long.progress().unwrap();
        assert!((0.0..0.1).contains(&p));
    }

    #[test]
    fn test_boxed_condition() {
        let mut t: Box<dyn TerminationCondition> = Box::new(IterationTermination::new(1));
        assert!(!t.is_met());
        assert!(t.is_met());
    }
}
