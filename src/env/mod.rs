//! Interfaces to the application under exploration.
//!
//! The engine never talks to a device, emulator, or instrumentation layer
//! directly. It consumes two narrow traits:
//!
//! - [`Environment`]: lists executable actions, executes them, resets the
//!   target, and answers state-graph queries.
//! - [`ObjectiveSource`]: reports coverage and per-target objective values
//!   for finished test cases.
//!
//! Both are implemented by the driver layer that embeds this crate.

mod types;

pub use types::{
    Action, ActionKind, Environment, ExecutionOutcome, ObjectiveSource, StateId, TargetId,
    TestCaseId, WidgetId,
};
