//! Typed construction of searches from a [`SearchConfig`].

use std::marker::PhantomData;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use log::info;

use crate::algorithm::{
    GeneticOperators, Mio, NoveltyArchive, NoveltySearch, Nsga2, OnePlusOne, RandomSearch,
    RandomWalk, SearchAlgorithm, SearchCore, StandardGeneticAlgorithm,
};
use crate::chromosome::{Genotype, TestCase, TestSuite};
use crate::crossover::{CrossoverFunction, TestCaseMergeCrossover, UniformSuiteCrossover};
use crate::env::{Action, ObjectiveSource, TargetId};
use crate::error::ConfigError;
use crate::factory::{
    ChromosomeFactory, HeuristicChromosomeFactory, RandomChromosomeFactory, TestSuiteFactory,
};
use crate::fitness::{
    target_fitness_functions, BehaviorNovelty, Cached, CoverageFitness, CrashFitness,
    FitnessFunction, ObjectiveCache, TestLengthFitness,
};
use crate::mutation::{CutPointMutation, MutationFunction, SuiteCutPointMutation};
use crate::random::rng_from_seed;
use crate::selection::{
    CrowdedTournamentSelection, FitnessProportionateSelection, FitnessSortedSelection,
    RandomSelection, SelectionFunction, TournamentSelection,
};
use crate::termination::{
    ConditionalTermination, IterationTermination, NeverTermination, TerminationCondition,
    TimeBudgetTermination,
};

use super::config::SearchConfig;
use super::kinds::{
    AlgorithmKind, CrossoverKind, FactoryKind, FitnessKind, MutationKind, SelectionKind,
    TerminationKind,
};

/// Payload-specific components.
///
/// Implemented for [`TestCase`] and [`TestSuite`]. A kind that does not fit
/// the payload is reported as [`ConfigError::UnsupportedForPayload`].
pub trait PayloadOperators: Genotype + Sized {
    /// Crossover used when the configuration names none.
    const DEFAULT_CROSSOVER: CrossoverKind;
    /// Mutation used when the configuration names none.
    const DEFAULT_MUTATION: MutationKind;

    fn factory(config: &SearchConfig) -> Box<dyn ChromosomeFactory<Self>>;

    fn crossover(kind: CrossoverKind) -> Result<Box<dyn CrossoverFunction<Self>>, ConfigError>;

    fn mutation(
        kind: MutationKind,
        config: &SearchConfig,
    ) -> Result<Box<dyn MutationFunction<Self>>, ConfigError>;

    /// Upper bound of [`Genotype::length`] under `config`.
    fn max_length(config: &SearchConfig) -> usize;
}

fn test_case_factory<A: Action>(config: &SearchConfig) -> Box<dyn ChromosomeFactory<TestCase<A>>> {
    match config.factory {
        FactoryKind::Random => Box::new(RandomChromosomeFactory::new(config.max_num_events)),
        FactoryKind::Heuristic => Box::new(HeuristicChromosomeFactory::<A>::with_weights(
            config.max_num_events,
            config.heuristic_weights,
        )),
    }
}

fn unsupported<T: Genotype>(component: &'static str, kind: impl ToString) -> ConfigError {
    ConfigError::UnsupportedForPayload {
        component,
        kind: kind.to_string(),
        payload: T::NAME,
    }
}

impl<A: Action> PayloadOperators for TestCase<A> {
    const DEFAULT_CROSSOVER: CrossoverKind = CrossoverKind::TestCaseMerge;
    const DEFAULT_MUTATION: MutationKind = MutationKind::CutPoint;

    fn factory(config: &SearchConfig) -> Box<dyn ChromosomeFactory<Self>> {
        test_case_factory::<A>(config)
    }

    fn crossover(kind: CrossoverKind) -> Result<Box<dyn CrossoverFunction<Self>>, ConfigError> {
        match kind {
            CrossoverKind::TestCaseMerge => Ok(Box::new(TestCaseMergeCrossover)),
            CrossoverKind::UniformSuite => Err(unsupported::<Self>("crossover function", kind)),
        }
    }

    fn mutation(
        kind: MutationKind,
        config: &SearchConfig,
    ) -> Result<Box<dyn MutationFunction<Self>>, ConfigError> {
        match kind {
            MutationKind::CutPoint => Ok(Box::new(CutPointMutation::new(config.max_num_events))),
            MutationKind::SuiteCutPoint => Err(unsupported::<Self>("mutation function", kind)),
        }
    }

    fn max_length(config: &SearchConfig) -> usize {
        config.max_num_events
    }
}

impl<A: Action> PayloadOperators for TestSuite<A> {
    const DEFAULT_CROSSOVER: CrossoverKind = CrossoverKind::UniformSuite;
    const DEFAULT_MUTATION: MutationKind = MutationKind::SuiteCutPoint;

    fn factory(config: &SearchConfig) -> Box<dyn ChromosomeFactory<Self>> {
        Box::new(TestSuiteFactory::<A, _>::new(
            test_case_factory::<A>(config),
            config.number_test_cases,
        ))
    }

    fn crossover(kind: CrossoverKind) -> Result<Box<dyn CrossoverFunction<Self>>, ConfigError> {
        match kind {
            CrossoverKind::UniformSuite => Ok(Box::new(UniformSuiteCrossover)),
            CrossoverKind::TestCaseMerge => Err(unsupported::<Self>("crossover function", kind)),
        }
    }

    fn mutation(
        kind: MutationKind,
        config: &SearchConfig,
    ) -> Result<Box<dyn MutationFunction<Self>>, ConfigError> {
        match kind {
            MutationKind::SuiteCutPoint => {
                Ok(Box::new(SuiteCutPointMutation::new(config.max_num_events)))
            }
            MutationKind::CutPoint => Err(unsupported::<Self>("mutation function", kind)),
        }
    }

    fn max_length(config: &SearchConfig) -> usize {
        config.number_test_cases
    }
}

/// Builds a [`SearchAlgorithm`] over payload `T` from a [`SearchConfig`].
///
/// ```ignore
/// let search = SearchBuilder::<TestCase<MyAction>>::new(SearchConfig::fast())
///     .with_objectives(instrumentation)
///     .build()?;
/// ```
pub struct SearchBuilder<T: PayloadOperators> {
    config: SearchConfig,
    objectives: Option<Arc<dyn ObjectiveSource>>,
    targets: Vec<TargetId>,
    stop_signal: Option<Arc<AtomicBool>>,
    _payload: PhantomData<fn() -> T>,
}

impl<T: PayloadOperators> SearchBuilder<T> {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            objectives: None,
            targets: Vec::new(),
            stop_signal: None,
            _payload: PhantomData,
        }
    }

    /// Instrumentation backing coverage, per-target and novelty scores.
    pub fn with_objectives(mut self, source: Arc<dyn ObjectiveSource>) -> Self {
        self.objectives = Some(source);
        self
    }

    /// Targets for [`FitnessKind::Targets`] and novelty search.
    pub fn with_targets(mut self, targets: Vec<TargetId>) -> Self {
        self.targets = targets;
        self
    }

    /// Signal for [`TerminationKind::Conditional`].
    pub fn with_stop_signal(mut self, signal: Arc<AtomicBool>) -> Self {
        self.stop_signal = Some(signal);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn objectives(&self) -> Result<Arc<dyn ObjectiveSource>, ConfigError> {
        self.objectives
            .clone()
            .ok_or(ConfigError::MissingParameter("objective source"))
    }

    fn objective_cache(&self) -> Result<Arc<ObjectiveCache>, ConfigError> {
        if self.targets.is_empty() {
            return Err(ConfigError::MissingParameter("targets"));
        }
        Ok(Arc::new(ObjectiveCache::new(
            self.objectives()?,
            self.targets.clone(),
        )))
    }

    fn fitness_functions(
        &self,
        cache: &mut Option<Arc<ObjectiveCache>>,
    ) -> Result<Vec<Box<dyn FitnessFunction<T>>>, ConfigError> {
        let config = &self.config;
        let functions: Vec<Box<dyn FitnessFunction<T>>> = match config.fitness {
            FitnessKind::Coverage => {
                vec![Box::new(Cached::new(CoverageFitness::new(self.objectives()?)))]
            }
            FitnessKind::Crash => vec![Box::new(CrashFitness)],
            FitnessKind::TestLength => {
                vec![Box::new(TestLengthFitness::new(T::max_length(config)))]
            }
            FitnessKind::Targets => {
                let shared = self.objective_cache()?;
                let functions = target_fitness_functions(&shared);
                *cache = Some(shared);
                functions
            }
        };

        let n = functions.len();
        if config.algorithm.is_single_objective() && n != 1 {
            return Err(ConfigError::Incompatible {
                algorithm: config.algorithm.to_string(),
                requirement: format!("exactly one fitness function, got {n}"),
            });
        }
        Ok(functions)
    }

    fn selection(&self) -> Box<dyn SelectionFunction<T>> {
        match self.config.selection {
            SelectionKind::FitnessProportionate => Box::new(FitnessProportionateSelection),
            SelectionKind::Random => Box::new(RandomSelection),
            SelectionKind::FitnessSorted => Box::new(FitnessSortedSelection),
            SelectionKind::Tournament => {
                Box::new(TournamentSelection::new(self.config.tournament_size))
            }
            SelectionKind::CrowdedTournament => Box::new(CrowdedTournamentSelection),
        }
    }

    fn termination(&self) -> Result<Box<dyn TerminationCondition>, ConfigError> {
        let config = &self.config;
        Ok(match config.termination {
            TerminationKind::Never => Box::new(NeverTermination),
            TerminationKind::Iterations => Box::new(IterationTermination::new(config.iterations)),
            TerminationKind::Time => {
                let ms = config
                    .time_limit_ms
                    .ok_or(ConfigError::MissingParameter("time_limit_ms"))?;
                Box::new(TimeBudgetTermination::from_millis(ms))
            }
            TerminationKind::Conditional => {
                let signal = self
                    .stop_signal
                    .clone()
                    .ok_or(ConfigError::MissingParameter("stop signal"))?;
                Box::new(ConditionalTermination::new(signal))
            }
        })
    }

    /// Validates the configuration and assembles the search.
    pub fn build(self) -> Result<Box<dyn SearchAlgorithm<T>>, ConfigError> {
        self.config.validate()?;
        let config = &self.config;

        let mut cache = None;
        let fitness_functions = self.fitness_functions(&mut cache)?;
        let crossover = T::crossover(config.crossover.unwrap_or(T::DEFAULT_CROSSOVER))?;
        let mutation = T::mutation(config.mutation.unwrap_or(T::DEFAULT_MUTATION), config)?;
        let termination = self.termination()?;

        let core = SearchCore::new(
            T::factory(config),
            fitness_functions,
            termination,
            config.population_size,
            rng_from_seed(config.seed),
        );
        let operators = |mutation| GeneticOperators {
            selection: self.selection(),
            crossover,
            mutation,
            p_crossover: config.p_crossover,
            p_mutate: config.p_mutate,
        };
        let big = config.big_population_size;

        let search: Box<dyn SearchAlgorithm<T>> = match config.algorithm {
            AlgorithmKind::Standard => {
                Box::new(StandardGeneticAlgorithm::new(core, operators(mutation), big))
            }
            AlgorithmKind::OnePlusOne => Box::new(OnePlusOne::new(core, mutation)),
            AlgorithmKind::RandomSearch => Box::new(RandomSearch::new(core)),
            AlgorithmKind::RandomWalk => Box::new(RandomWalk::new(core, mutation)),
            AlgorithmKind::Nsga2 => Box::new(Nsga2::new(core, operators(mutation), big)),
            AlgorithmKind::Mio => {
                Box::new(Mio::new(core, mutation, config.mio.clone(), big))
            }
            AlgorithmKind::NoveltySearch => {
                let shared = match cache {
                    Some(shared) => shared,
                    None => self.objective_cache()?,
                };
                let novelty = Box::new(BehaviorNovelty::new(shared, config.nearest_neighbours));
                let archive = NoveltyArchive::new(config.archive_limit, config.novelty_threshold);
                Box::new(NoveltySearch::new(core, operators(mutation), novelty, archive, big))
            }
        };

        info!(
            "built {} over {} chromosomes (population {}, seed {:?})",
            search.name(),
            T::NAME,
            config.population_size,
            config.seed
        );
        Ok(search)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{SearchMetrics, SearchState};
    use crate::testing::{TestAction, TestApp};

    type CaseBuilder = SearchBuilder<TestCase<TestAction>>;
    type SuiteBuilder = SearchBuilder<TestSuite<TestAction>>;

    fn small() -> SearchConfig {
        SearchConfig::fast()
            .with_population_size(4)
            .with_big_population_size(8)
            .with_max_num_events(5)
            .with_number_test_cases(2)
            .with_iterations(3)
            .with_seed(42)
    }

    fn build_err<T: PayloadOperators>(builder: SearchBuilder<T>) -> ConfigError {
        match builder.build() {
            Ok(search) => panic!("unexpectedly built {}", search.name()),
            Err(err) => err,
        }
    }

    #[test]
    fn test_every_algorithm_builds_and_runs_on_test_cases() {
        for &algorithm in AlgorithmKind::ALL {
            let mut app = TestApp::chain(6);
            let mut config = small().with_algorithm(algorithm);
            if algorithm == AlgorithmKind::Nsga2 {
                config = config
                    .with_fitness(FitnessKind::Targets)
                    .with_selection(SelectionKind::CrowdedTournament);
            }
            let mut search = CaseBuilder::new(config)
                .with_objectives(app.objectives())
                .with_targets((0..6).map(TargetId).collect())
                .build()
                .unwrap_or_else(|e| panic!("{algorithm}: {e}"));

            let mut metrics = SearchMetrics::new();
            let result = search.run(&mut app, &mut metrics);
            assert_eq!(search.state(), SearchState::Terminated, "{algorithm}");
            assert_eq!(result.generations, 3, "{algorithm}");
            let expected = match algorithm {
                AlgorithmKind::OnePlusOne
                | AlgorithmKind::RandomSearch
                | AlgorithmKind::RandomWalk => 1..=1,
                _ => 4..=8,
            };
            let len = result.population.len();
            assert!(expected.contains(&len), "{algorithm}: population {len}");
            assert_eq!(app.started.len(), app.finished.len(), "{algorithm}");
        }
    }

    #[test]
    fn test_suite_payload_uses_suite_operators() {
        let mut app = TestApp::chain(6);
        let mut search = SuiteBuilder::new(small())
            .with_objectives(app.objectives())
            .build()
            .unwrap();
        let result = search.run(&mut app, &mut SearchMetrics::new());
        assert_eq!(result.population.len(), 4);
        assert!(result.population.iter().all(|c| c.length() == 2));
    }

    #[test]
    fn test_operator_must_fit_payload() {
        let app = TestApp::chain(3);
        let err = build_err(
            CaseBuilder::new(small().with_crossover(CrossoverKind::UniformSuite))
                .with_objectives(app.objectives()),
        );
        assert_eq!(
            err,
            ConfigError::UnsupportedForPayload {
                component: "crossover function",
                kind: "uniform_suite".into(),
                payload: TestCase::<TestAction>::NAME,
            }
        );

        let err = build_err(
            SuiteBuilder::new(small().with_mutation(MutationKind::CutPoint))
                .with_objectives(app.objectives()),
        );
        assert!(matches!(
            err,
            ConfigError::UnsupportedForPayload {
                component: "mutation function",
                ..
            }
        ));
    }

    #[test]
    fn test_single_objective_variants_reject_target_sets() {
        let app = TestApp::chain(3);
        let err = build_err(
            CaseBuilder::new(small().with_fitness(FitnessKind::Targets))
                .with_objectives(app.objectives())
                .with_targets(vec![TargetId(0), TargetId(1)]),
        );
        assert!(matches!(err, ConfigError::Incompatible { .. }), "{err}");
    }

    #[test]
    fn test_missing_collaborators() {
        assert_eq!(
            build_err(CaseBuilder::new(small())),
            ConfigError::MissingParameter("objective source")
        );

        let app = TestApp::chain(3);
        let err = build_err(
            CaseBuilder::new(small().with_algorithm(AlgorithmKind::NoveltySearch))
                .with_objectives(app.objectives()),
        );
        assert_eq!(err, ConfigError::MissingParameter("targets"));

        let err = build_err(
            CaseBuilder::new(small().with_termination(TerminationKind::Conditional))
                .with_objectives(app.objectives()),
        );
        assert_eq!(err, ConfigError::MissingParameter("stop signal"));
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let mut config = small();
        config.max_num_events = 0;
        assert!(matches!(
            build_err(CaseBuilder::new(config)),
            ConfigError::InvalidValue { name: "max_num_events", .. }
        ));
    }

    #[test]
    fn test_stop_signal_terminates() {
        use std::sync::atomic::Ordering;

        let mut app = TestApp::chain(4);
        let signal = Arc::new(AtomicBool::new(false));
        let mut search = CaseBuilder::new(
            small()
                .with_fitness(FitnessKind::Crash)
                .with_termination(TerminationKind::Conditional),
        )
        .with_stop_signal(Arc::clone(&signal))
        .build()
        .unwrap();

        let mut metrics = SearchMetrics::new();
        search.create_initial_population(&mut app, &mut metrics);
        search.evolve(&mut app, &mut metrics);
        assert_eq!(search.state(), SearchState::Evolving);
        signal.store(true, Ordering::SeqCst);
        search.evolve(&mut app, &mut metrics);
        assert_eq!(search.state(), SearchState::Terminated);
        assert_eq!(search.current_generation(), 1);
    }
}
