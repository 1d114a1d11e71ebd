//! Declarative assembly of searches.
//!
//! A [`SearchConfig`] names the algorithm and its components by kind;
//! [`SearchBuilder`] checks that every named component exists for the chosen
//! chromosome payload and wires them together. The payload is a type
//! parameter, so a test-case search can never receive suite operators: the
//! mismatch is a [`ConfigError`](crate::error::ConfigError), not a cast.
//!
//! ```ignore
//! let config = "mio".parse::<AlgorithmKind>()
//!     .map(|kind| SearchConfig::balanced().with_algorithm(kind))?;
//! let mut search = SearchBuilder::<TestSuite<MyAction>>::new(config)
//!     .with_objectives(instrumentation)
//!     .build()?;
//! let result = search.run(&mut driver, &mut metrics);
//! ```

mod builder;
mod config;
mod kinds;

pub use builder::{PayloadOperators, SearchBuilder};
pub use config::SearchConfig;
pub use kinds::{
    AlgorithmKind, CrossoverKind, FactoryKind, FitnessKind, MutationKind, SelectionKind,
    TerminationKind,
};
