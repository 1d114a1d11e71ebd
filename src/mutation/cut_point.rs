//! Cut-point mutation: keep a prefix, regenerate the rest.

use std::sync::Arc;

use log::{trace, warn};
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use super::MutationFunction;
use crate::chromosome::{Chromosome, TestCase, TestCaseRecorder, TestSuite};
use crate::env::{Action, Environment};

/// Replays `parent[..cut]` and fills the rest with random executable actions.
///
/// The environment is reset first. Construction stops at the first action
/// that is not executable in the live state or that ends the test case, so
/// the mutant may be shorter than `max_num_events` but never longer. The
/// recorder finalizes the mutant on every exit path.
#[derive(Debug, Clone, Copy)]
pub struct CutPointMutation {
    max_num_events: usize,
}

impl CutPointMutation {
    pub fn new(max_num_events: usize) -> Self {
        Self { max_num_events }
    }

    pub fn max_num_events(&self) -> usize {
        self.max_num_events
    }

    pub(crate) fn mutate_test_case<A: Action>(
        &self,
        parent: &TestCase<A>,
        env: &mut dyn Environment<A>,
        rng: &mut dyn RngCore,
    ) -> TestCase<A> {
        env.reset();

        let cut = if parent.is_empty() {
            warn!("mutating empty test case {:?}, cut point 0", parent.id());
            0
        } else {
            rng.random_range(0..parent.len())
        };
        trace!("{:?}: cut point {}", parent.id(), cut);

        let mut recorder = TestCaseRecorder::start(env, self.max_num_events);
        for i in 0..self.max_num_events {
            let executable = recorder.executable_actions();
            let action = if i < cut {
                parent.actions()[i].clone()
            } else {
                match executable.choose(rng) {
                    Some(a) => a.clone(),
                    None => break,
                }
            };
            if !executable.contains(&action) {
                trace!("{:?}: {:?} no longer executable at {}", parent.id(), action, i);
                break;
            }
            if !recorder.record(&action) {
                break;
            }
        }
        recorder.finish()
    }
}

impl<A: Action> MutationFunction<TestCase<A>> for CutPointMutation {
    fn mutate(
        &self,
        chromosome: &Chromosome<TestCase<A>>,
        env: &mut dyn Environment<A>,
        rng: &mut dyn RngCore,
    ) -> Vec<Chromosome<TestCase<A>>> {
        let mutant = self.mutate_test_case(chromosome.value(), env, rng);
        vec![Chromosome::new(mutant)]
    }
}

/// Cut-point mutation of one uniformly chosen test case of a suite.
///
/// All other test cases are shared with the parent suite.
#[derive(Debug, Clone, Copy)]
pub struct SuiteCutPointMutation {
    inner: CutPointMutation,
}

impl SuiteCutPointMutation {
    pub fn new(max_num_events: usize) -> Self {
        Self {
            inner: CutPointMutation::new(max_num_events),
        }
    }
}

impl<A: Action> MutationFunction<TestSuite<A>> for SuiteCutPointMutation {
    fn mutate(
        &self,
        chromosome: &Chromosome<TestSuite<A>>,
        env: &mut dyn Environment<A>,
        rng: &mut dyn RngCore,
    ) -> Vec<Chromosome<TestSuite<A>>> {
        let suite = chromosome.value();
        if suite.test_cases().is_empty() {
            warn!("mutating empty test suite {:?}", chromosome.id());
            return vec![Chromosome::new(TestSuite::new(Vec::new()))];
        }
        let index = rng.random_range(0..suite.test_cases().len());
        let mutant = self
            .inner
            .mutate_test_case(&suite.test_cases()[index], env, rng);
        vec![Chromosome::new(suite.with_replaced(index, Arc::new(mutant)))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::testing::{TestAction, TestApp, TestChromosome};
    use proptest::prelude::*;

    fn record_case(app: &mut TestApp, ids: &[u32]) -> TestCase<TestAction> {
        app.reset();
        let mut recorder = TestCaseRecorder::start(app, ids.len());
        for &id in ids {
            recorder.record(&TestAction::click(id));
        }
        recorder.finish()
    }

    fn record(app: &mut TestApp, ids: &[u32]) -> TestChromosome {
        Chromosome::new(record_case(app, ids))
    }

    #[test]
    fn test_parent_untouched_and_env_reset() {
        let mut app = TestApp::chain(6);
        let parent = record(&mut app, &[0, 1, 2, 3]);
        let resets = app.resets;
        let mut rng = create_rng(42);

        let mutants = CutPointMutation::new(4).mutate(&parent, &mut app, &mut rng);
        assert_eq!(mutants.len(), 1);
        assert!(!mutants[0].same_as(&parent));
        assert_eq!(parent.length(), 4);
        assert_eq!(app.resets, resets + 1);
    }

    #[test]
    fn test_empty_parent_cuts_at_zero() {
        let mut app = TestApp::chain(4);
        let parent = record(&mut app, &[]);
        let mut rng = create_rng(1);

        let mutants = CutPointMutation::new(3).mutate(&parent, &mut app, &mut rng);
        // chain screens always offer at least one action
        assert_eq!(mutants[0].length(), 3);
    }

    #[test]
    fn test_stops_on_crash() {
        let mut app = TestApp::chain(5).crash_on(0);
        let parent = record(&mut app, &[]);
        let mut rng = create_rng(3);

        let mut crashed = 0;
        for _ in 0..30 {
            let mutants = CutPointMutation::new(10).mutate(&parent, &mut app, &mut rng);
            let mutant = &mutants[0];
            if mutant.has_crash() {
                crashed += 1;
                let last = mutant.value().actions().last().unwrap();
                assert_eq!(last.id, 0);
            } else {
                assert_eq!(mutant.length(), 10);
            }
        }
        assert!(crashed > 0);
        assert_eq!(app.started.len(), app.finished.len());
    }

    #[test]
    fn test_suite_replaces_one_slot() {
        let mut app = TestApp::chain(5);
        let cases = vec![
            Arc::new(record_case(&mut app, &[])),
            Arc::new(record_case(&mut app, &[0, 1])),
            Arc::new(record_case(&mut app, &[0])),
        ];
        let suite = Chromosome::new(TestSuite::new(cases));
        let mut rng = create_rng(9);

        let mutants = SuiteCutPointMutation::new(3).mutate(&suite, &mut app, &mut rng);
        let mutant = &mutants[0];
        let shared = mutant
            .value()
            .test_cases()
            .iter()
            .zip(suite.value().test_cases())
            .filter(|(m, p)| Arc::ptr_eq(m, p))
            .count();
        assert_eq!(mutant.length(), 3);
        assert_eq!(shared, 2);
    }

    proptest! {
        #[test]
        fn prop_length_bound_and_prefix(
            seed in 0u64..1000,
            parent_len in 0usize..8,
            max in 0usize..10,
        ) {
            let mut app = TestApp::chain(10);
            let ids: Vec<u32> = (0..parent_len as u32).collect();
            let parent = record(&mut app, &ids);

            // the cut point is the first draw of the mutation
            let cut = if parent_len == 0 {
                0
            } else {
                create_rng(seed).random_range(0..parent_len)
            };

            let mut rng = create_rng(seed);
            let mutants = CutPointMutation::new(max).mutate(&parent, &mut app, &mut rng);
            let actions = mutants[0].value().actions();

            prop_assert!(actions.len() <= max);
            // every chain screen has a back action, so nothing stops early
            prop_assert_eq!(actions.len(), max);
            for i in 0..cut.min(max) {
                prop_assert_eq!(&actions[i], &parent.value().actions()[i]);
            }
            prop_assert_eq!(app.started.len(), app.finished.len());
        }
    }
}
