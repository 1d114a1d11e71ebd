//! Frequency- and novelty-weighted action selection.
//!
//! The factory keeps tables for its whole lifetime:
//!
//! - execution count per action;
//! - visited widgets;
//! - preceding actions per widget (actions observed right before the widget
//!   was targeted);
//! - unvisited children per action (actions on the screen it leads to whose
//!   widget was not visited yet).
//!
//! Each step picks the executable action with the highest weight
//!
//! ```text
//! w(a) = (α · kind(a) + β · unvisited(a)) / (γ · (count(a) + 1))
//! ```
//!
//! breaking ties uniformly. An action never observed counts as having
//! `2 · max(known unvisited)` unvisited children.

use std::collections::{HashMap, HashSet};

use log::{debug, trace};
use rand::seq::IndexedRandom;
use rand::RngCore;

use super::ChromosomeFactory;
use crate::chromosome::{Chromosome, TestCase, TestCaseRecorder};
use crate::env::{Action, Environment, WidgetId};

const TIE_EPSILON: f64 = 1e-12;

/// Tuning constants of the action weight.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeuristicWeights {
    /// Weight of the action kind.
    pub alpha: f64,
    /// Weight of the unvisited-children count.
    pub beta: f64,
    /// Penalty per previous execution.
    pub gamma: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 0.3,
            gamma: 1.5,
        }
    }
}

/// Builds test cases by greedily preferring rarely executed actions that
/// lead towards unvisited widgets.
pub struct HeuristicChromosomeFactory<A> {
    max_num_events: usize,
    weights: HeuristicWeights,
    execution_count: HashMap<A, u32>,
    visited_widgets: HashSet<WidgetId>,
    preceding_actions: HashMap<WidgetId, HashSet<A>>,
    unvisited_children: HashMap<A, u32>,
}

impl<A: Action> HeuristicChromosomeFactory<A> {
    pub fn new(max_num_events: usize) -> Self {
        Self::with_weights(max_num_events, HeuristicWeights::default())
    }

    pub fn with_weights(max_num_events: usize, weights: HeuristicWeights) -> Self {
        Self {
            max_num_events,
            weights,
            execution_count: HashMap::new(),
            visited_widgets: HashSet::new(),
            preceding_actions: HashMap::new(),
            unvisited_children: HashMap::new(),
        }
    }

    pub fn weights(&self) -> HeuristicWeights {
        self.weights
    }

    /// How often `action` was executed by this factory.
    pub fn execution_count(&self, action: &A) -> u32 {
        self.execution_count.get(action).copied().unwrap_or(0)
    }

    /// Current weight of `action`.
    pub fn action_weight(&self, action: &A) -> f64 {
        let unvisited = match self.unvisited_children.get(action) {
            Some(&n) => n as f64,
            None => 2.0 * self.max_known_unvisited(),
        };
        let HeuristicWeights { alpha, beta, gamma } = self.weights;
        (alpha * action.kind().weight() + beta * unvisited)
            / (gamma * (self.execution_count(action) as f64 + 1.0))
    }

    fn max_known_unvisited(&self) -> f64 {
        self.unvisited_children.values().copied().max().unwrap_or(0) as f64
    }

    /// Picks the heaviest action, uniformly among ties.
    fn choose<'a>(&self, executable: &'a [A], rng: &mut dyn RngCore) -> Option<&'a A> {
        let weighted: Vec<(f64, &A)> = executable
            .iter()
            .map(|a| (self.action_weight(a), a))
            .collect();
        let best = weighted
            .iter()
            .map(|&(w, _)| w)
            .fold(f64::NEG_INFINITY, f64::max);
        let ties: Vec<&A> = weighted
            .into_iter()
            .filter(|&(w, _)| best - w <= TIE_EPSILON)
            .map(|(_, a)| a)
            .collect();
        ties.choose(rng).copied()
    }

    /// Bookkeeping before `action` is executed after `previous`.
    fn observe_selection(&mut self, action: &A, previous: Option<&A>) {
        *self.execution_count.entry(action.clone()).or_insert(0) += 1;

        let Some(widget) = action.widget() else {
            return;
        };
        if let Some(prev) = previous {
            self.preceding_actions
                .entry(widget)
                .or_default()
                .insert(prev.clone());
        }
        if self.visited_widgets.insert(widget) {
            if let Some(preceding) = self.preceding_actions.get(&widget) {
                for p in preceding {
                    if let Some(n) = self.unvisited_children.get_mut(p) {
                        *n = n.saturating_sub(1);
                    }
                }
            }
        }
    }

    /// Bookkeeping after `action` led to a screen offering `reached`.
    fn observe_screen(&mut self, action: &A, reached: &[A]) {
        let unvisited = reached
            .iter()
            .filter(|a| match a.widget() {
                Some(w) => !self.visited_widgets.contains(&w),
                None => self.execution_count(a) == 0,
            })
            .count() as u32;
        self.unvisited_children.insert(action.clone(), unvisited);
    }
}

impl<A: Action> ChromosomeFactory<TestCase<A>> for HeuristicChromosomeFactory<A> {
    fn create(
        &mut self,
        env: &mut dyn Environment<A>,
        rng: &mut dyn RngCore,
    ) -> Chromosome<TestCase<A>> {
        env.reset();
        let mut recorder = TestCaseRecorder::start(env, self.max_num_events);
        let mut executable = recorder.executable_actions();
        let mut previous: Option<A> = None;

        while recorder.len() < self.max_num_events {
            let Some(action) = self.choose(&executable, rng).cloned() else {
                debug!("no executable action after {} events", recorder.len());
                break;
            };
            trace!("heuristic pick {:?} (weight {:.3})", action, self.action_weight(&action));
            self.observe_selection(&action, previous.as_ref());

            if !recorder.record(&action) {
                break;
            }
            executable = recorder.executable_actions();
            self.observe_screen(&action, &executable);
            previous = Some(action);
        }
        Chromosome::new(recorder.finish())
    }
}
