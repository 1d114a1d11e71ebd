//! Collaborator traits and the value types crossing the engine boundary.

use std::fmt::Debug;
use std::hash::Hash;

/// Identifier of an abstract GUI state (screen) of the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub u64);

/// Identifier of a widget an action interacts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub u64);

/// Identifier of a coverage target (branch, line, activity, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u64);

/// Identifier under which the driver records the trace of one test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TestCaseId(pub u64);

/// Coarse category of an action, used by the heuristic factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    #[default]
    Click,
    LongClick,
    TextInput,
    Swipe,
    Back,
    Menu,
    Other,
}

impl ActionKind {
    /// Fixed preference of the heuristic factory for this kind of action.
    ///
    /// Navigational actions (swipe, back) are discouraged, opening a menu is
    /// encouraged, everything else is neutral.
    pub fn weight(self) -> f64 {
        match self {
            ActionKind::Swipe | ActionKind::Back => 0.5,
            ActionKind::Menu => 2.0,
            _ => 1.0,
        }
    }
}

/// One interaction with the target application.
///
/// Actions are opaque to the engine apart from equality (used for frequency
/// tables and executable-set membership), their [`ActionKind`], and the
/// widget they target.
pub trait Action: Clone + Eq + Hash + Debug + Send + Sync + 'static {
    /// Category of the action.
    fn kind(&self) -> ActionKind {
        ActionKind::Other
    }

    /// Widget the action targets, if any.
    fn widget(&self) -> Option<WidgetId> {
        None
    }
}

/// Outcome of executing one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionOutcome {
    /// The action was executed and the target stayed in scope.
    Success,
    /// The action was executed but the target left scope (another app came
    /// to the foreground, or the target restarted).
    SuccessOutbound,
    /// The target crashed.
    FailureCrash,
    /// The execution environment itself (emulator, device) died.
    FailureEmulatorCrash,
    /// The action could not be executed for an unknown reason.
    FailureUnknown,
}

impl ExecutionOutcome {
    /// Whether exploration of the current test case may continue.
    pub fn can_continue(self) -> bool {
        matches!(
            self,
            ExecutionOutcome::Success | ExecutionOutcome::SuccessOutbound
        )
    }
}

/// The target under exploration, as seen by the engine.
///
/// Every call is blocking. Transient transport failures are expected to be
/// retried inside the implementation; the engine only sees the final
/// [`ExecutionOutcome`].
pub trait Environment<A: Action> {
    /// Actions that can be executed in the current state.
    fn executable_actions(&mut self) -> Vec<A>;

    /// Executes one action.
    fn execute(&mut self, action: &A) -> ExecutionOutcome;

    /// Abstract state the target is currently in.
    fn current_state(&mut self) -> StateId;

    /// Brings the target back to its initial state.
    fn reset(&mut self);

    /// Restarts the target from scratch. Defaults to [`reset`](Self::reset).
    fn restart(&mut self) {
        self.reset();
    }

    /// Looks up the state reached by executing `action` in state `from`,
    /// according to the explored state graph.
    ///
    /// Returns `None` when the transition is unknown.
    fn destination_state(&self, from: StateId, action: &A) -> Option<StateId>;

    /// State equivalence used for crossover alignment.
    fn states_equal(&self, a: StateId, b: StateId) -> bool {
        a == b
    }

    /// Stack trace of the most recent crash, when the driver captured one.
    fn crash_stack_trace(&mut self) -> Option<String> {
        None
    }

    /// Called before the first action of a new test case is executed.
    fn begin_test_case(&mut self, _id: TestCaseId) {}

    /// Called exactly once when a test case is finalized.
    fn finish_test_case(&mut self, _id: TestCaseId) {}
}

/// Instrumentation-backed objective data for executed test cases.
///
/// Values are read after the test cases were finalized. Implementations
/// are queried through `&self` and may cache internally.
pub trait ObjectiveSource: Send + Sync {
    /// Objective value per target for the union of the given test cases,
    /// normalized to `[0, 1]` where `1.0` means the target is covered.
    ///
    /// Returns exactly `targets.len()` values.
    fn objective_values(&self, test_cases: &[TestCaseId], targets: &[TargetId]) -> Vec<f64>;

    /// Overall coverage of the given test cases in `[0, 1]`.
    fn coverage(&self, test_cases: &[TestCaseId]) -> f64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_weights() {
        assert_eq!(ActionKind::Swipe.weight(), 0.5);
        assert_eq!(ActionKind::Back.weight(), 0.5);
        assert_eq!(ActionKind::Menu.weight(), 2.0);
        assert_eq!(ActionKind::Click.weight(), 1.0);
        assert_eq!(ActionKind::TextInput.weight(), 1.0);
    }

    #[test]
    fn test_outcome_continuation() {
        assert!(ExecutionOutcome::Success.can_continue());
        assert!(ExecutionOutcome::SuccessOutbound.can_continue());
        assert!(!ExecutionOutcome::FailureCrash.can_continue());
        assert!(!ExecutionOutcome::FailureEmulatorCrash.can_continue());
        assert!(!ExecutionOutcome::FailureUnknown.can_continue());
    }
}
