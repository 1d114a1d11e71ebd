//! In-crate fixture: a tiny screen graph standing in for a real driver.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::algorithm::{GeneticOperators, SearchCore};
use crate::chromosome::{Chromosome, ChromosomeId, Genotype, TestCase, TestCaseRecorder};
use crate::crossover::TestCaseMergeCrossover;
use crate::env::{
    Action, ActionKind, Environment, ExecutionOutcome, ObjectiveSource, StateId, TargetId,
    TestCaseId, WidgetId,
};
use crate::factory::RandomChromosomeFactory;
use crate::fitness::{Cached, CoverageFitness, FitnessFunction};
use crate::mutation::CutPointMutation;
use crate::random::create_rng;
use crate::selection::TournamentSelection;
use crate::termination::IterationTermination;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct TestAction {
    pub id: u32,
    pub kind: ActionKind,
}

impl TestAction {
    pub fn click(id: u32) -> Self {
        Self {
            id,
            kind: ActionKind::Click,
        }
    }

    pub fn new(id: u32, kind: ActionKind) -> Self {
        Self { id, kind }
    }
}

impl Action for TestAction {
    fn kind(&self) -> ActionKind {
        self.kind
    }

    fn widget(&self) -> Option<WidgetId> {
        Some(WidgetId(self.id as u64))
    }
}

/// Per-test-case record of visited states, queried as an objective source.
#[derive(Debug)]
pub(crate) struct CoverageLog {
    visited: Mutex<HashMap<TestCaseId, HashSet<u64>>>,
    state_count: usize,
}

impl CoverageLog {
    fn visit(&self, test_case: TestCaseId, state: u64) {
        self.visited
            .lock()
            .unwrap()
            .entry(test_case)
            .or_default()
            .insert(state);
    }

    fn union(&self, test_cases: &[TestCaseId]) -> HashSet<u64> {
        let visited = self.visited.lock().unwrap();
        test_cases
            .iter()
            .filter_map(|id| visited.get(id))
            .flat_map(|states| states.iter().copied())
            .collect()
    }
}

impl ObjectiveSource for CoverageLog {
    fn objective_values(&self, test_cases: &[TestCaseId], targets: &[TargetId]) -> Vec<f64> {
        let union = self.union(test_cases);
        targets
            .iter()
            .map(|t| if union.contains(&t.0) { 1.0 } else { 0.0 })
            .collect()
    }

    fn coverage(&self, test_cases: &[TestCaseId]) -> f64 {
        self.union(test_cases).len() as f64 / self.state_count as f64
    }
}

/// Deterministic screen graph. State 0 is the initial screen.
pub(crate) struct TestApp {
    actions: HashMap<u64, Vec<TestAction>>,
    transitions: HashMap<(u64, u32), u64>,
    crashes: HashSet<u32>,
    state: u64,
    current: Option<TestCaseId>,
    log: Arc<CoverageLog>,
    pub started: Vec<TestCaseId>,
    pub finished: Vec<TestCaseId>,
    pub resets: usize,
    pub executed: usize,
}

impl TestApp {
    pub fn new(state_count: usize) -> Self {
        Self {
            actions: HashMap::new(),
            transitions: HashMap::new(),
            crashes: HashSet::new(),
            state: 0,
            current: None,
            log: Arc::new(CoverageLog {
                visited: Mutex::new(HashMap::new()),
                state_count,
            }),
            started: Vec::new(),
            finished: Vec::new(),
            resets: 0,
            executed: 0,
        }
    }

    pub fn transition(mut self, from: u64, action: TestAction, to: u64) -> Self {
        self.transitions.insert((from, action.id), to);
        self.actions.entry(from).or_default().push(action);
        self
    }

    pub fn crash_on(mut self, action_id: u32) -> Self {
        self.crashes.insert(action_id);
        self
    }

    /// `0 -> 1 -> ... -> n-1` via clicks `0..n-1`; every screen also has a
    /// back action (`100 + i`) to its predecessor.
    pub fn chain(n: usize) -> Self {
        let mut app = TestApp::new(n);
        for i in 0..n as u64 {
            if i + 1 < n as u64 {
                app = app.transition(i, TestAction::click(i as u32), i + 1);
            }
            let back = TestAction::new(100 + i as u32, ActionKind::Back);
            app = app.transition(i, back, i.saturating_sub(1));
        }
        app
    }

    pub fn objectives(&self) -> Arc<CoverageLog> {
        Arc::clone(&self.log)
    }
}

impl Environment<TestAction> for TestApp {
    fn executable_actions(&mut self) -> Vec<TestAction> {
        self.actions.get(&self.state).cloned().unwrap_or_default()
    }

    fn execute(&mut self, action: &TestAction) -> ExecutionOutcome {
        self.executed += 1;
        let Some(&to) = self.transitions.get(&(self.state, action.id)) else {
            return ExecutionOutcome::FailureUnknown;
        };
        if self.crashes.contains(&action.id) {
            return ExecutionOutcome::FailureCrash;
        }
        self.state = to;
        if let Some(id) = self.current {
            self.log.visit(id, to);
        }
        ExecutionOutcome::Success
    }

    fn current_state(&mut self) -> StateId {
        StateId(self.state)
    }

    fn reset(&mut self) {
        self.resets += 1;
        self.state = 0;
    }

    fn destination_state(&self, from: StateId, action: &TestAction) -> Option<StateId> {
        self.transitions.get(&(from.0, action.id)).map(|&s| StateId(s))
    }

    fn crash_stack_trace(&mut self) -> Option<String> {
        Some("java.lang.NullPointerException".into())
    }

    fn begin_test_case(&mut self, id: TestCaseId) {
        self.started.push(id);
        self.current = Some(id);
        self.log.visit(id, self.state);
    }

    fn finish_test_case(&mut self, id: TestCaseId) {
        self.finished.push(id);
        self.current = None;
    }
}

/// Fitness function reading fixed scores assigned per chromosome identity.
pub(crate) struct ScoreTable {
    scores: HashMap<ChromosomeId, f64>,
    maximizing: bool,
}

impl ScoreTable {
    pub fn new(maximizing: bool) -> Self {
        Self {
            scores: HashMap::new(),
            maximizing,
        }
    }

    pub fn set<T>(&mut self, chromosome: &Chromosome<T>, score: f64) {
        self.scores.insert(chromosome.id(), score);
    }
}

impl<T: Genotype> FitnessFunction<T> for ScoreTable {
    fn name(&self) -> &str {
        "score table"
    }

    fn fitness(&self, chromosome: &Chromosome<T>) -> f64 {
        self.scores.get(&chromosome.id()).copied().unwrap_or(0.0)
    }

    fn is_maximizing(&self) -> bool {
        self.maximizing
    }

    fn normalized_fitness(&self, chromosome: &Chromosome<T>) -> f64 {
        self.fitness(chromosome).clamp(0.0, 1.0)
    }
}

pub(crate) type TestChromosome = Chromosome<TestCase<TestAction>>;
pub(crate) type TestFitness = Box<dyn FitnessFunction<TestCase<TestAction>>>;

/// `n` empty test-case chromosomes, each with its own identity.
pub(crate) fn empty_chromosomes(n: usize) -> Vec<TestChromosome> {
    let mut app = TestApp::chain(2);
    (0..n)
        .map(|_| {
            let recorder = TestCaseRecorder::start(&mut app, 0);
            Chromosome::new(recorder.finish())
        })
        .collect()
}

/// Chromosomes scored by a fresh [`ScoreTable`], in input order.
pub(crate) fn scored(scores: &[f64], maximizing: bool) -> (Vec<TestChromosome>, ScoreTable) {
    let population = empty_chromosomes(scores.len());
    let mut table = ScoreTable::new(maximizing);
    for (c, &s) in population.iter().zip(scores) {
        table.set(c, s);
    }
    (population, table)
}

/// Cached coverage of the app's visited states.
pub(crate) fn coverage_fitness(app: &TestApp) -> TestFitness {
    Box::new(Cached::new(CoverageFitness::new(app.objectives())))
}

/// Random test cases of up to 5 events, scored by coverage, stopping after
/// `generations` generations.
pub(crate) fn test_core(
    app: &TestApp,
    population_size: usize,
    generations: usize,
    seed: u64,
) -> SearchCore<TestCase<TestAction>> {
    SearchCore::new(
        Box::new(RandomChromosomeFactory::new(5)),
        vec![coverage_fitness(app)],
        Box::new(IterationTermination::new(generations)),
        population_size,
        create_rng(seed),
    )
}

pub(crate) fn test_operators(max_num_events: usize) -> GeneticOperators<TestCase<TestAction>> {
    GeneticOperators {
        selection: Box::new(TournamentSelection::new(2)),
        crossover: Box::new(TestCaseMergeCrossover),
        mutation: Box::new(CutPointMutation::new(max_num_events)),
        p_crossover: 0.7,
        p_mutate: 0.5,
    }
}
