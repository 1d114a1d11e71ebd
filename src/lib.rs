//! Search-based test generation for interactive applications.
//!
//! Evolves populations of test cases or test suites against coverage- and
//! crash-oriented objectives:
//!
//! - **Chromosomes**: immutable handles around a [`TestCase`](chromosome::TestCase)
//!   (executed action sequence) or a [`TestSuite`](chromosome::TestSuite).
//! - **Strategies**: pluggable selection, crossover, mutation, fitness and
//!   termination, each behind an object-safe trait.
//! - **GUI-aware operators**: state-aligned test-case crossover and
//!   cut-point mutation that replays against the live application.
//! - **Heuristic factory**: weighted action choice favouring rarely used
//!   actions that lead to unvisited widgets.
//! - **Algorithms**: standard GA, (1+1), random search, random walk,
//!   NSGA-II, MIO and novelty search.
//! - **Provider**: a declarative [`SearchConfig`](provider::SearchConfig)
//!   turned into a typed search by [`SearchBuilder`](provider::SearchBuilder).
//!
//! # Architecture
//!
//! The application under test is reached only through the
//! [`Environment`](env::Environment) and
//! [`ObjectiveSource`](env::ObjectiveSource) traits; the driver that
//! implements them (device access, screen capture, instrumentation
//! transport) lives outside this crate. Searches are single-threaded and
//! driven by the caller one generation at a time.

pub mod algorithm;
pub mod chromosome;
pub mod crossover;
pub mod env;
pub mod error;
pub mod factory;
pub mod fitness;
pub mod mutation;
pub mod provider;
pub mod random;
pub mod selection;
pub mod termination;

#[cfg(test)]
mod testing;
