//! The chromosome handle and the payload capability trait.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::sealed::Sealed;
use crate::env::{Action, TestCaseId};

static NEXT_CHROMOSOME_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of a chromosome.
///
/// Allocated once per [`Chromosome::new`]; clones of a handle share it.
/// Caches key on this id, never on structural equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChromosomeId(u64);

impl ChromosomeId {
    fn next() -> Self {
        ChromosomeId(NEXT_CHROMOSOME_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, useful for logging.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Operations shared by all chromosome payloads.
///
/// Implemented by [`TestCase`](super::TestCase) and
/// [`TestSuite`](super::TestSuite) only.
pub trait Genotype: Sealed + Debug + Send + Sync + 'static {
    /// The action type the payload is made of.
    type Action: Action;

    /// Human-readable payload name, used in configuration errors.
    const NAME: &'static str;

    /// All actions of the payload in execution order.
    fn action_sequence(&self) -> Vec<&Self::Action>;

    /// Size of the payload: actions for a test case, test cases for a suite.
    fn length(&self) -> usize;

    /// Driver identifiers of the contained test cases.
    fn test_case_ids(&self) -> Vec<TestCaseId>;

    /// Whether any contained test case crashed the target.
    fn has_crash(&self) -> bool;
}

/// Immutable handle owning one candidate solution.
///
/// Cloning is cheap and preserves identity. Operators never modify the
/// payload; they build new chromosomes instead.
#[derive(Debug)]
pub struct Chromosome<T> {
    id: ChromosomeId,
    value: Arc<T>,
}

impl<T> Clone for Chromosome<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            value: Arc::clone(&self.value),
        }
    }
}

impl<T> Chromosome<T> {
    /// Wraps a payload into a chromosome with a fresh identity.
    pub fn new(value: T) -> Self {
        Self {
            id: ChromosomeId::next(),
            value: Arc::new(value),
        }
    }

    /// Identity of this chromosome.
    pub fn id(&self) -> ChromosomeId {
        self.id
    }

    /// The payload.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Shared handle to the payload, for embedding it in a larger payload.
    pub fn shared(&self) -> Arc<T> {
        Arc::clone(&self.value)
    }

    /// Whether both handles refer to the same chromosome.
    pub fn same_as(&self, other: &Chromosome<T>) -> bool {
        self.id == other.id
    }
}

impl<T: Genotype> Chromosome<T> {
    /// Shortcut for [`Genotype::length`].
    pub fn length(&self) -> usize {
        self.value.length()
    }

    /// Shortcut for [`Genotype::has_crash`].
    pub fn has_crash(&self) -> bool {
        self.value.has_crash()
    }
}
