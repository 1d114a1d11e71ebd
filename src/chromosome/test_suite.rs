//! Test suites.

use std::sync::Arc;

use super::sealed::Sealed;
use super::test_case::TestCase;
use super::types::Genotype;
use crate::env::{Action, TestCaseId};

/// An ordered collection of test cases.
///
/// Test cases are shared between suites: crossover and mutation build new
/// suites that reuse the unchanged test cases of their parents.
#[derive(Debug)]
pub struct TestSuite<A> {
    test_cases: Vec<Arc<TestCase<A>>>,
}

impl<A: Action> TestSuite<A> {
    pub fn new(test_cases: Vec<Arc<TestCase<A>>>) -> Self {
        Self { test_cases }
    }

    pub fn test_cases(&self) -> &[Arc<TestCase<A>>] {
        &self.test_cases
    }

    /// Returns a copy of this suite with the test case at `index` replaced.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn with_replaced(&self, index: usize, test_case: Arc<TestCase<A>>) -> Self {
        let mut test_cases = self.test_cases.clone();
        test_cases[index] = test_case;
        Self { test_cases }
    }
}

impl<A: Action> Sealed for TestSuite<A> {}

impl<A: Action> Genotype for TestSuite<A> {
    type Action = A;

    const NAME: &'static str = "test suite";

    fn action_sequence(&self) -> Vec<&A> {
        self.test_cases
            .iter()
            .flat_map(|tc| tc.actions().iter())
            .collect()
    }

    fn length(&self) -> usize {
        self.test_cases.len()
    }

    fn test_case_ids(&self) -> Vec<TestCaseId> {
        self.test_cases.iter().map(|tc| tc.id()).collect()
    }

    fn has_crash(&self) -> bool {
        self.test_cases.iter().any(|tc| tc.crashed())
    }
}
