//! Uniform crossover of test suites.

use std::sync::Arc;

use rand::RngCore;

use super::CrossoverFunction;
use crate::chromosome::{Chromosome, TestSuite};
use crate::env::{Action, Environment};
use crate::random::chance;

/// Takes each test-case slot from either parent with probability ½.
///
/// Slots beyond the shorter parent come from the longer one. Test cases are
/// shared, not re-executed, so the environment is not touched.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformSuiteCrossover;

impl<A: Action> CrossoverFunction<TestSuite<A>> for UniformSuiteCrossover {
    fn cross(
        &self,
        parents: &[Chromosome<TestSuite<A>>; 2],
        _env: &mut dyn Environment<A>,
        rng: &mut dyn RngCore,
    ) -> Chromosome<TestSuite<A>> {
        let a = parents[0].value().test_cases();
        let b = parents[1].value().test_cases();
        let len = a.len().max(b.len());

        let test_cases = (0..len)
            .map(|i| match (a.get(i), b.get(i)) {
                (Some(x), Some(y)) => {
                    if chance(rng, 0.5) {
                        Arc::clone(y)
                    } else {
                        Arc::clone(x)
                    }
                }
                (Some(x), None) => Arc::clone(x),
                (None, Some(y)) => Arc::clone(y),
                (None, None) => unreachable!("index below the longer parent's length"),
            })
            .collect();

        Chromosome::new(TestSuite::new(test_cases))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chromosome::{TestCase, TestCaseRecorder};
    use crate::random::create_rng;
    use crate::testing::{TestAction, TestApp};

    fn suite(
        app: &mut TestApp,
        n: usize,
    ) -> (Chromosome<TestSuite<TestAction>>, Vec<Arc<TestCase<TestAction>>>) {
        let cases: Vec<_> = (0..n)
            .map(|_| Arc::new(TestCaseRecorder::start(&mut *app, 0).finish()))
            .collect();
        (Chromosome::new(TestSuite::new(cases.clone())), cases)
    }

    #[test]
    fn test_slots_come_from_parents() {
        let mut app = TestApp::chain(2);
        let (p0, a) = suite(&mut app, 3);
        let (p1, b) = suite(&mut app, 5);
        let mut rng = create_rng(11);

        let child = UniformSuiteCrossover.cross(&[p0, p1], &mut app, &mut rng);
        let cases = child.value().test_cases();
        assert_eq!(cases.len(), 5);
        for (i, tc) in cases.iter().enumerate() {
            let from_a = a.get(i).is_some_and(|x| Arc::ptr_eq(x, tc));
            let from_b = Arc::ptr_eq(&b[i], tc);
            assert!(from_a || from_b);
        }
        assert!(Arc::ptr_eq(&cases[3], &b[3]));
        assert!(Arc::ptr_eq(&cases[4], &b[4]));
    }

    #[test]
    fn test_mixes_both_parents() {
        let mut app = TestApp::chain(2);
        let (p0, a) = suite(&mut app, 20);
        let (p1, _) = suite(&mut app, 20);
        let mut rng = create_rng(3);

        let child = UniformSuiteCrossover.cross(&[p0, p1], &mut app, &mut rng);
        let from_a = child
            .value()
            .test_cases()
            .iter()
            .zip(&a)
            .filter(|(c, x)| Arc::ptr_eq(c, x))
            .count();
        assert!(from_a > 0 && from_a < 20, "{from_a}");
    }
}
