use std::marker::PhantomData;

use rand::RngCore;

use super::ChromosomeFactory;
use crate::chromosome::{Chromosome, TestCase, TestSuite};
use crate::env::{Action, Environment};

/// Builds suites of `number_test_cases` test cases from a test-case factory.
pub struct TestSuiteFactory<A, F> {
    inner: F,
    number_test_cases: usize,
    _action: PhantomData<fn() -> A>,
}

impl<A: Action, F: ChromosomeFactory<TestCase<A>>> TestSuiteFactory<A, F> {
    pub fn new(inner: F, number_test_cases: usize) -> Self {
        Self {
            inner,
            number_test_cases,
            _action: PhantomData,
        }
    }
}

impl<A: Action, F: ChromosomeFactory<TestCase<A>>> ChromosomeFactory<TestSuite<A>>
    for TestSuiteFactory<A, F>
{
    fn create(
        &mut self,
        env: &mut dyn Environment<A>,
        rng: &mut dyn RngCore,
    ) -> Chromosome<TestSuite<A>> {
        let test_cases = (0..self.number_test_cases)
            .map(|_| self.inner.create(&mut *env, &mut *rng).shared())
            .collect();
        Chromosome::new(TestSuite::new(test_cases))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::RandomChromosomeFactory;
    use crate::random::create_rng;
    use crate::testing::{TestAction, TestApp};

    #[test]
    fn test_suite_of_fresh_test_cases() {
        let mut app = TestApp::chain(4);
        let mut factory: TestSuiteFactory<TestAction, _> =
            TestSuiteFactory::new(RandomChromosomeFactory::new(3), 4);
        let mut rng = create_rng(7);

        let suite = factory.create(&mut app, &mut rng);
        assert_eq!(suite.length(), 4);
        assert_eq!(app.resets, 4);
        assert_eq!(app.finished.len(), 4);
        assert!(suite.value().test_cases().iter().all(|tc| tc.len() == 3));
    }
}
