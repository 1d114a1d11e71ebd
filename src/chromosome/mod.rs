//! Candidate solutions.
//!
//! A [`Chromosome`] is an immutable, cheaply clonable handle around one
//! payload. Two payloads exist and the set is closed:
//!
//! - [`TestCase`]: an ordered sequence of executed actions plus the state
//!   each action was executed from and the crash outcome.
//! - [`TestSuite`]: an ordered collection of test cases.
//!
//! Both implement the [`Genotype`] capability trait, which is all the
//! generic parts of the engine rely on. Test cases are only ever built by
//! executing actions through a [`TestCaseRecorder`].

mod test_case;
mod test_suite;
mod types;

pub(crate) mod sealed {
    pub trait Sealed {}
}

pub use test_case::{TestCase, TestCaseRecorder};
pub use test_suite::TestSuite;
pub use types::{Chromosome, ChromosomeId, Genotype};
