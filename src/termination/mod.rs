//! Termination conditions.
//!
//! A search polls its condition once per generation, before the body of
//! `evolve`. There is no mid-generation preemption: external cancellation
//! goes through [`ConditionalTermination`].

mod conditions;

pub use conditions::{
    ConditionalTermination, IterationTermination, NeverTermination, TimeBudgetTermination,
};

/// Decides when a search stops.
pub trait TerminationCondition: Send {
    /// Polled once per generation boundary. Returns `true` to stop.
    fn is_met(&mut self) -> bool;

    /// Fraction of the budget consumed so far, in `[0, 1]`.
    ///
    /// `None` when the condition has no notion of budget.
    fn progress(&self) -> Option<f64> {
        None
    }
}

impl<C: TerminationCondition + ?Sized> TerminationCondition for Box<C> {
    fn is_met(&mut self) -> bool {
        (**self).is_met()
    }

    fn progress(&self) -> Option<f64> {
        (**self).progress()
    }
}
