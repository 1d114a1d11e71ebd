//! GUI-state-aligned crossover of two test cases.
//!
//! Index-based recombination of action sequences is almost always invalid:
//! after a few actions the parents are on different screens. This operator
//! only splices where both parents reach the same state.
//!
//! # Algorithm
//!
//! 1. Order the parents so `|l1| ≤ |l2|` and pick
//!    `final_size = (|l1| + |l2| + bias) / 2` with a uniform `bias ∈ {0, 1}`.
//! 2. Walk `l1` in zigzag order from a random index. For each `idx`, search
//!    `l2` in zigzag order from the proportional index
//!    `idx · |l2| / |l1|` for an action whose destination state equals the
//!    destination state of `l1[idx]`.
//! 3. On the first match `(idx, j)`, replay `l1[..=idx] ++ l2[j+1..]` up to
//!    `final_size` actions, stopping at the first action that is not
//!    executable in the live state, then pad with random executable actions.
//! 4. Without any match, return parent 0.

use log::{debug, trace};
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use super::zigzag::Zigzag;
use super::CrossoverFunction;
use crate::chromosome::{Chromosome, TestCase, TestCaseRecorder};
use crate::env::{Action, Environment, StateId};

/// State-aligned splice of two test cases.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestCaseMergeCrossover;

impl TestCaseMergeCrossover {
    fn destination<A: Action>(
        env: &dyn Environment<A>,
        test_case: &TestCase<A>,
        index: usize,
    ) -> Option<StateId> {
        let from = test_case.source_state(index)?;
        env.destination_state(from, &test_case.actions()[index])
    }

    fn find_match<A: Action>(
        env: &dyn Environment<A>,
        target: StateId,
        l2: &TestCase<A>,
        start: usize,
    ) -> Option<usize> {
        Zigzag::new(start, l2.len()).find(|&j| {
            Self::destination(env, l2, j).is_some_and(|d| env.states_equal(target, d))
        })
    }

    fn replay<A: Action>(
        env: &mut dyn Environment<A>,
        rng: &mut dyn RngCore,
        combined: Vec<A>,
        final_size: usize,
    ) -> TestCase<A> {
        env.reset();
        let mut recorder = TestCaseRecorder::start(env, final_size);

        for action in combined.iter().take(final_size) {
            if !recorder.executable_actions().contains(action) {
                trace!("replay diverged at {}: {:?} not executable", recorder.len(), action);
                break;
            }
            if !recorder.record(action) {
                break;
            }
        }

        while recorder.accepts() && recorder.len() < final_size {
            let executable = recorder.executable_actions();
            let Some(action) = executable.choose(rng) else {
                break;
            };
            if !recorder.record(action) {
                break;
            }
        }

        recorder.finish()
    }
}

impl<A: Action> CrossoverFunction<TestCase<A>> for TestCaseMergeCrossover {
    fn cross(
        &self,
        parents: &[Chromosome<TestCase<A>>; 2],
        env: &mut dyn Environment<A>,
        rng: &mut dyn RngCore,
    ) -> Chromosome<TestCase<A>> {
        let (l1, l2) = if parents[0].length() <= parents[1].length() {
            (parents[0].value(), parents[1].value())
        } else {
            (parents[1].value(), parents[0].value())
        };
        if l1.is_empty() {
            debug!("crossover with empty parent, keeping parent 0");
            return parents[0].clone();
        }

        let bias = rng.random_range(0..=1usize);
        let final_size = (l1.len() + l2.len() + bias) / 2;
        let choice = rng.random_range(0..l1.len());

        for idx in Zigzag::new(choice, l1.len()) {
            let Some(target) = Self::destination(&*env, l1, idx) else {
                continue;
            };
            let cc = idx * l2.len() / l1.len();
            if let Some(j) = Self::find_match(&*env, target, l2, cc) {
                trace!("aligned {:?}[{}] with {:?}[{}] at {:?}", l1.id(), idx, l2.id(), j, target);
                let combined: Vec<A> = l1.actions()[..=idx]
                    .iter()
                    .chain(&l2.actions()[j + 1..])
                    .cloned()
                    .collect();
                let child = Self::replay(env, rng, combined, final_size);
                return Chromosome::new(child);
            }
        }

        debug!(
            "no aligned state between {:?} and {:?}, keeping parent 0",
            l1.id(),
            l2.id()
        );
        parents[0].clone()
    }
}
