//! Test cases and the recorder that builds them.

use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, trace};

use super::sealed::Sealed;
use super::types::Genotype;
use crate::env::{Action, Environment, ExecutionOutcome, StateId, TestCaseId};

static NEXT_TEST_CASE_ID: AtomicU64 = AtomicU64::new(0);

/// An executed sequence of actions.
///
/// `source_states[i]` is the state `actions[i]` was executed from. A test
/// case that crashed the target keeps the crashing action as its last
/// element.
#[derive(Debug)]
pub struct TestCase<A> {
    id: TestCaseId,
    actions: Vec<A>,
    source_states: Vec<StateId>,
    crashed: bool,
    crash_stack_trace: Option<String>,
    desired_length: usize,
}

impl<A: Action> TestCase<A> {
    fn empty(desired_length: usize) -> Self {
        Self {
            id: TestCaseId(NEXT_TEST_CASE_ID.fetch_add(1, Ordering::Relaxed)),
            actions: Vec::with_capacity(desired_length),
            source_states: Vec::with_capacity(desired_length),
            crashed: false,
            crash_stack_trace: None,
            desired_length,
        }
    }

    /// Driver identifier of this test case.
    pub fn id(&self) -> TestCaseId {
        self.id
    }

    /// Executed actions, in order.
    pub fn actions(&self) -> &[A] {
        &self.actions
    }

    /// States the actions were executed from.
    pub fn visited_states(&self) -> &[StateId] {
        &self.source_states
    }

    /// State `actions[index]` was executed from.
    pub fn source_state(&self, index: usize) -> Option<StateId> {
        self.source_states.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn crashed(&self) -> bool {
        self.crashed
    }

    pub fn crash_stack_trace(&self) -> Option<&str> {
        self.crash_stack_trace.as_deref()
    }

    /// Length the test case was built for. The actual length may be shorter
    /// when construction stopped early.
    pub fn desired_length(&self) -> usize {
        self.desired_length
    }
}

impl<A: Action> Sealed for TestCase<A> {}

impl<A: Action> Genotype for TestCase<A> {
    type Action = A;

    const NAME: &'static str = "test case";

    fn action_sequence(&self) -> Vec<&A> {
        self.actions.iter().collect()
    }

    fn length(&self) -> usize {
        self.actions.len()
    }

    fn test_case_ids(&self) -> Vec<TestCaseId> {
        vec![self.id]
    }

    fn has_crash(&self) -> bool {
        self.crashed
    }
}

/// Builds a [`TestCase`] by executing actions against an environment.
///
/// The recorder registers the test case with the driver on
/// [`start`](Self::start) and finalizes it exactly once: either through
/// [`finish`](Self::finish) or, if the recorder is dropped early (including
/// during unwinding), from its `Drop` implementation.
pub struct TestCaseRecorder<'e, A: Action> {
    env: &'e mut dyn Environment<A>,
    test_case: Option<TestCase<A>>,
    stopped: bool,
}

impl<'e, A: Action> TestCaseRecorder<'e, A> {
    /// Starts recording a new test case from the environment's current state.
    pub fn start(env: &'e mut dyn Environment<A>, desired_length: usize) -> Self {
        let test_case = TestCase::empty(desired_length);
        env.begin_test_case(test_case.id);
        Self {
            env,
            test_case: Some(test_case),
            stopped: false,
        }
    }

    /// Actions executable in the current state.
    pub fn executable_actions(&mut self) -> Vec<A> {
        self.env.executable_actions()
    }

    /// The environment being recorded against.
    pub fn env(&mut self) -> &mut dyn Environment<A> {
        &mut *self.env
    }

    /// Whether further actions may be recorded.
    pub fn accepts(&self) -> bool {
        !self.stopped
    }

    /// Number of actions recorded so far.
    pub fn len(&self) -> usize {
        self.test_case.as_ref().map_or(0, |tc| tc.actions.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Executes `action` and appends it to the test case.
    ///
    /// Returns `false` when the action was refused (the test case already
    /// reached a terminal outcome) or when its execution ended the test
    /// case. A crash is recorded on the test case.
    pub fn record(&mut self, action: &A) -> bool {
        if self.stopped {
            return false;
        }
        let Some(test_case) = self.test_case.as_mut() else {
            return false;
        };

        let source = self.env.current_state();
        let outcome = self.env.execute(action);
        test_case.actions.push(action.clone());
        test_case.source_states.push(source);
        trace!("{:?}: {:?} from {:?} -> {:?}", test_case.id, action, source, outcome);

        match outcome {
            ExecutionOutcome::Success => true,
            ExecutionOutcome::SuccessOutbound => {
                debug!("{:?}: target left scope after {:?}", test_case.id, action);
                true
            }
            ExecutionOutcome::FailureCrash => {
                test_case.crashed = true;
                test_case.crash_stack_trace = self.env.crash_stack_trace();
                debug!("{:?}: crash detected after {:?}", test_case.id, action);
                self.stopped = true;
                false
            }
            ExecutionOutcome::FailureEmulatorCrash | ExecutionOutcome::FailureUnknown => {
                debug!("{:?}: {:?} ended the test case", test_case.id, outcome);
                self.stopped = true;
                false
            }
        }
    }

    /// Finalizes the test case and returns it.
    pub fn finish(mut self) -> TestCase<A> {
        let test_case = self
            .test_case
            .take()
            .expect("recorder holds its test case until finished");
        self.env.finish_test_case(test_case.id);
        test_case
    }
}

impl<A: Action> Drop for TestCaseRecorder<'_, A> {
    fn drop(&mut self) {
        if let Some(test_case) = self.test_case.take() {
            self.env.finish_test_case(test_case.id);
        }
    }
}
