//! Fitness functions and their caches.
//!
//! # Core Traits
//!
//! - [`FitnessFunction`]: scalar quality signal, maximizing or minimizing,
//!   with a normalized view in `[0, 1]`.
//! - [`NoveltyFunction`]: behavioural novelty of a chromosome relative to a
//!   population and an archive.
//!
//! # Caching
//!
//! Evaluations that hit the instrumentation layer are expensive. They are
//! memoized per chromosome identity by [`Cached`] (any single function) and
//! [`ObjectiveCache`] (one batched objective-vector query per chromosome,
//! shared by all [`TargetFitness`] functions). Caches are append-only.

mod cache;
mod functions;
mod novelty;
mod types;

pub use cache::{Cached, FitnessCache, ObjectiveCache};
pub use functions::{
    target_fitness_functions, CoverageFitness, CrashFitness, TargetFitness, TestLengthFitness,
};
pub use novelty::{BehaviorNovelty, NoveltyFunction};
pub use types::{compare_fitness, maximizing_score, FitnessFunction};
