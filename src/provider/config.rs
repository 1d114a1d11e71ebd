//! Search configuration.
//!
//! [`SearchConfig`] names every component of a search and holds the
//! parameters they need. [`SearchBuilder`](super::SearchBuilder) turns it
//! into a running algorithm.

use crate::algorithm::MioParameters;
use crate::error::ConfigError;
use crate::factory::HeuristicWeights;

use super::kinds::{
    AlgorithmKind, CrossoverKind, FactoryKind, FitnessKind, MutationKind, SelectionKind,
    TerminationKind,
};

/// Declarative configuration of a search.
///
/// # Defaults
///
/// ```
/// use u_explore::provider::{AlgorithmKind, SearchConfig};
///
/// let config = SearchConfig::default();
/// assert_eq!(config.algorithm, AlgorithmKind::Standard);
/// assert_eq!(config.population_size, 20);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_explore::provider::{AlgorithmKind, FitnessKind, SearchConfig};
///
/// let config = SearchConfig::default()
///     .with_algorithm(AlgorithmKind::Nsga2)
///     .with_fitness(FitnessKind::Targets)
///     .with_population_size(30)
///     .with_p_mutate(0.4)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    pub algorithm: AlgorithmKind,

    pub selection: SelectionKind,

    /// Contenders per tournament for [`SelectionKind::Tournament`].
    pub tournament_size: usize,

    /// `None` picks the payload's natural crossover.
    pub crossover: Option<CrossoverKind>,

    /// `None` picks the payload's natural mutation.
    pub mutation: Option<MutationKind>,

    pub fitness: FitnessKind,

    pub termination: TerminationKind,

    /// Factory of test cases (wrapped into suites for suite payloads).
    pub factory: FactoryKind,

    /// Population size between generations.
    ///
    /// Forced to 1 by the single-solution variants.
    pub population_size: usize,

    /// Population size after offspring are added.
    pub big_population_size: usize,

    /// Maximum number of actions of a test case.
    pub max_num_events: usize,

    /// Test cases per suite for suite payloads.
    pub number_test_cases: usize,

    /// Probability of crossing a parent pair (0.0–1.0).
    pub p_crossover: f64,

    /// Probability of mutating an offspring (0.0–1.0).
    pub p_mutate: f64,

    pub heuristic_weights: HeuristicWeights,

    /// Capacity of the novelty archive.
    pub archive_limit: usize,

    /// Minimum novelty for archive admission.
    pub novelty_threshold: f64,

    /// Neighbours averaged by the novelty function.
    pub nearest_neighbours: usize,

    pub mio: MioParameters,

    /// Generations for [`TerminationKind::Iterations`].
    pub iterations: usize,

    /// Wall-clock budget for [`TerminationKind::Time`].
    pub time_limit_ms: Option<u64>,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmKind::Standard,
            selection: SelectionKind::Tournament,
            tournament_size: 3,
            crossover: None,
            mutation: None,
            fitness: FitnessKind::Coverage,
            termination: TerminationKind::Iterations,
            factory: FactoryKind::Random,
            population_size: 20,
            big_population_size: 40,
            max_num_events: 20,
            number_test_cases: 5,
            p_crossover: 0.7,
            p_mutate: 0.3,
            heuristic_weights: HeuristicWeights::default(),
            archive_limit: 20,
            novelty_threshold: 0.0,
            nearest_neighbours: 3,
            mio: MioParameters::default(),
            iterations: 100,
            time_limit_ms: None,
            seed: None,
        }
    }
}

impl SearchConfig {
    pub fn with_algorithm(mut self, algorithm: AlgorithmKind) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_selection(mut self, selection: SelectionKind) -> Self {
        self.selection = selection;
        self
    }

    /// Selects [`SelectionKind::Tournament`] with `k` contenders.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.selection = SelectionKind::Tournament;
        self.tournament_size = k;
        self
    }

    pub fn with_crossover(mut self, crossover: CrossoverKind) -> Self {
        self.crossover = Some(crossover);
        self
    }

    pub fn with_mutation(mut self, mutation: MutationKind) -> Self {
        self.mutation = Some(mutation);
        self
    }

    pub fn with_fitness(mut self, fitness: FitnessKind) -> Self {
        self.fitness = fitness;
        self
    }

    pub fn with_termination(mut self, termination: TerminationKind) -> Self {
        self.termination = termination;
        self
    }

    pub fn with_factory(mut self, factory: FactoryKind) -> Self {
        self.factory = factory;
        self
    }

    /// Sets the population size, raising the big population size if needed.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self.big_population_size = self.big_population_size.max(n);
        self
    }

    pub fn with_big_population_size(mut self, n: usize) -> Self {
        self.big_population_size = n;
        self
    }

    pub fn with_max_num_events(mut self, n: usize) -> Self {
        self.max_num_events = n;
        self
    }

    pub fn with_number_test_cases(mut self, n: usize) -> Self {
        self.number_test_cases = n;
        self
    }

    /// Sets the crossover probability.
    pub fn with_p_crossover(mut self, p: f64) -> Self {
        self.p_crossover = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation probability.
    pub fn with_p_mutate(mut self, p: f64) -> Self {
        self.p_mutate = p.clamp(0.0, 1.0);
        self
    }

    pub fn with_heuristic_weights(mut self, weights: HeuristicWeights) -> Self {
        self.heuristic_weights = weights;
        self
    }

    pub fn with_archive_limit(mut self, limit: usize) -> Self {
        self.archive_limit = limit;
        self
    }

    pub fn with_novelty_threshold(mut self, threshold: f64) -> Self {
        self.novelty_threshold = threshold.max(0.0);
        self
    }

    pub fn with_nearest_neighbours(mut self, k: usize) -> Self {
        self.nearest_neighbours = k;
        self
    }

    pub fn with_mio(mut self, parameters: MioParameters) -> Self {
        self.mio = parameters;
        self
    }

    /// Stops after `n` generations.
    pub fn with_iterations(mut self, n: usize) -> Self {
        self.termination = TerminationKind::Iterations;
        self.iterations = n;
        self
    }

    /// Stops after approximately `ms` milliseconds of search.
    ///
    /// The budget is checked between generations, so the last generation
    /// may overrun it.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.termination = TerminationKind::Time;
        self.time_limit_ms = Some(ms);
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Preset for a quick smoke exploration.
    ///
    /// - Population: 10 (20 with offspring), 10 events, 30 generations
    pub fn fast() -> Self {
        Self {
            population_size: 10,
            big_population_size: 20,
            max_num_events: 10,
            iterations: 30,
            ..Self::default()
        }
    }

    /// Preset balancing exploration depth and run time.
    ///
    /// - Population: 20 (40 with offspring), 20 events, 100 generations
    /// - Heuristic factory
    pub fn balanced() -> Self {
        Self {
            factory: FactoryKind::Heuristic,
            ..Self::default()
        }
    }

    /// Preset for long unattended runs.
    ///
    /// - Population: 50 (100 with offspring), 40 events, 500 generations
    /// - Heuristic factory
    pub fn thorough() -> Self {
        Self {
            factory: FactoryKind::Heuristic,
            population_size: 50,
            big_population_size: 100,
            max_num_events: 40,
            iterations: 500,
            ..Self::default()
        }
    }

    /// Validates the configuration.
    ///
    /// Checks parameter ranges and the parameters the selected components
    /// need. Whether components fit a payload type is checked by the
    /// builder.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::invalid("population_size", "must be at least 1"));
        }
        if self.algorithm.is_genetic() && self.population_size < 2 {
            return Err(ConfigError::invalid(
                "population_size",
                format!("{} needs at least 2", self.algorithm),
            ));
        }
        if self.big_population_size < self.population_size {
            return Err(ConfigError::invalid(
                "big_population_size",
                "must not be smaller than population_size",
            ));
        }
        if self.max_num_events == 0 {
            return Err(ConfigError::invalid("max_num_events", "must be at least 1"));
        }
        if self.number_test_cases == 0 {
            return Err(ConfigError::invalid("number_test_cases", "must be at least 1"));
        }
        probability("p_crossover", self.p_crossover)?;
        probability("p_mutate", self.p_mutate)?;
        if self.selection == SelectionKind::Tournament && self.tournament_size == 0 {
            return Err(ConfigError::invalid("tournament_size", "must be at least 1"));
        }
        if self.selection == SelectionKind::FitnessProportionate
            && self.algorithm == AlgorithmKind::Nsga2
        {
            return Err(ConfigError::Incompatible {
                algorithm: self.algorithm.to_string(),
                requirement: "a multi-objective selection function".into(),
            });
        }

        let w = &self.heuristic_weights;
        for (name, value) in [("alpha", w.alpha), ("beta", w.beta), ("gamma", w.gamma)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    "heuristic_weights",
                    format!("{name} must be finite and non-negative"),
                ));
            }
        }

        if self.algorithm == AlgorithmKind::NoveltySearch {
            if self.nearest_neighbours == 0 {
                return Err(ConfigError::invalid("nearest_neighbours", "must be at least 1"));
            }
            if !self.novelty_threshold.is_finite() || self.novelty_threshold < 0.0 {
                return Err(ConfigError::invalid(
                    "novelty_threshold",
                    "must be finite and non-negative",
                ));
            }
        }

        if self.algorithm == AlgorithmKind::Mio {
            let mio = &self.mio;
            probability("mio.p_sample_random", mio.p_sample_random)?;
            probability("mio.p_sample_random_focused", mio.p_sample_random_focused)?;
            probability("mio.focused_search_start", mio.focused_search_start)?;
            if mio.archive_size == 0 || mio.archive_size_focused == 0 {
                return Err(ConfigError::invalid("mio.archive_size", "must be at least 1"));
            }
            if mio.mutation_count == 0 || mio.mutation_count_focused == 0 {
                return Err(ConfigError::invalid("mio.mutation_count", "must be at least 1"));
            }
        }

        match self.termination {
            TerminationKind::Iterations if self.iterations == 0 => {
                return Err(ConfigError::invalid("iterations", "must be at least 1"));
            }
            TerminationKind::Time if self.time_limit_ms.is_none() => {
                return Err(ConfigError::MissingParameter("time_limit_ms"));
            }
            _ => {}
        }
        if self.time_limit_ms == Some(0) {
            return Err(ConfigError::invalid("time_limit_ms", "must be positive or None"));
        }
        Ok(())
    }
}

fn probability(name: &'static str, p: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(ConfigError::invalid(name, format!("{p} is outside [0, 1]")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.algorithm, AlgorithmKind::Standard);
        assert_eq!(config.selection, SelectionKind::Tournament);
        assert_eq!(config.tournament_size, 3);
        assert_eq!(config.population_size, 20);
        assert_eq!(config.big_population_size, 40);
        assert!((config.p_crossover - 0.7).abs() < 1e-10);
        assert!((config.p_mutate - 0.3).abs() < 1e-10);
        assert!(config.crossover.is_none());
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        for config in [SearchConfig::fast(), SearchConfig::balanced(), SearchConfig::thorough()] {
            assert!(config.validate().is_ok(), "{config:?}");
        }
        assert!(SearchConfig::fast().iterations < SearchConfig::thorough().iterations);
    }

    #[test]
    fn test_clamp_probabilities() {
        let config = SearchConfig::default()
            .with_p_crossover(1.5)
            .with_p_mutate(-0.5)
            .with_novelty_threshold(-1.0);
        assert_eq!(config.p_crossover, 1.0);
        assert_eq!(config.p_mutate, 0.0);
        assert_eq!(config.novelty_threshold, 0.0);
    }

    #[test]
    fn test_population_size_raises_big_population() {
        let config = SearchConfig::default().with_population_size(60);
        assert_eq!(config.big_population_size, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let mut config = SearchConfig::default();
        config.p_mutate = 1.2;
        assert_eq!(
            config.validate(),
            Err(ConfigError::invalid("p_mutate", "1.2 is outside [0, 1]"))
        );

        let config = SearchConfig::default().with_big_population_size(5);
        assert!(config.validate().is_err());

        let config = SearchConfig::default().with_population_size(1);
        assert!(config.validate().is_err());
        assert!(config.with_algorithm(AlgorithmKind::OnePlusOne).validate().is_ok());
    }

    #[test]
    fn test_time_termination_needs_budget() {
        let config = SearchConfig::default().with_termination(TerminationKind::Time);
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingParameter("time_limit_ms"))
        );
        assert!(SearchConfig::default().with_time_limit_ms(500).validate().is_ok());
        assert!(SearchConfig::default().with_time_limit_ms(0).validate().is_err());
    }

    #[test]
    fn test_mio_parameters_checked() {
        let mut mio = MioParameters::default();
        mio.archive_size_focused = 0;
        let config = SearchConfig::default()
            .with_algorithm(AlgorithmKind::Mio)
            .with_mio(mio);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { name: "mio.archive_size", .. })
        ));
    }

    #[test]
    fn test_roulette_rejected_for_nsga2() {
        let config = SearchConfig::default()
            .with_algorithm(AlgorithmKind::Nsga2)
            .with_selection(SelectionKind::FitnessProportionate);
        assert!(matches!(config.validate(), Err(ConfigError::Incompatible { .. })));
    }
}
