//! Named component kinds of a declarative search configuration.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Declares a kind enum with its canonical names.
///
/// Parsing is case-insensitive and treats `-` like `_`.
macro_rules! kind_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Canonical configuration name.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
                $name::ALL
                    .iter()
                    .copied()
                    .find(|k| k.as_str() == normalized)
                    .ok_or_else(|| ConfigError::UnknownVariant {
                        kind: $label,
                        value: s.to_string(),
                    })
            }
        }
    };
}

kind_enum! {
    /// Search algorithm variant.
    AlgorithmKind, "algorithm" {
        Standard => "standard",
        OnePlusOne => "one_plus_one",
        RandomSearch => "random_search",
        RandomWalk => "random_walk",
        Nsga2 => "nsga2",
        Mio => "mio",
        NoveltySearch => "novelty_search",
    }
}

kind_enum! {
    /// Parent selection function.
    SelectionKind, "selection function" {
        FitnessProportionate => "fitness_proportionate",
        Random => "random",
        FitnessSorted => "fitness_sorted",
        /// Size from [`SearchConfig::tournament_size`](super::SearchConfig::tournament_size).
        Tournament => "tournament",
        CrowdedTournament => "crowded_tournament",
    }
}

kind_enum! {
    /// Crossover function.
    CrossoverKind, "crossover function" {
        /// GUI-state-aligned splice of two test cases.
        TestCaseMerge => "test_case_merge",
        /// Slot-wise mix of two test suites.
        UniformSuite => "uniform_suite",
    }
}

kind_enum! {
    /// Mutation function.
    MutationKind, "mutation function" {
        CutPoint => "cut_point",
        SuiteCutPoint => "suite_cut_point",
    }
}

kind_enum! {
    /// Fitness function set.
    FitnessKind, "fitness function" {
        Coverage => "coverage",
        Crash => "crash",
        TestLength => "test_length",
        /// One objective per configured target.
        Targets => "targets",
    }
}

kind_enum! {
    /// Termination condition.
    TerminationKind, "termination condition" {
        Never => "never",
        Iterations => "iterations",
        Time => "time",
        /// Stops when an external signal is raised.
        Conditional => "conditional",
    }
}

kind_enum! {
    /// Test-case factory.
    FactoryKind, "chromosome factory" {
        Random => "random",
        Heuristic => "heuristic",
    }
}

impl AlgorithmKind {
    /// Whether the variant ranks by exactly one fitness function.
    pub fn is_single_objective(self) -> bool {
        matches!(
            self,
            AlgorithmKind::Standard
                | AlgorithmKind::OnePlusOne
                | AlgorithmKind::RandomSearch
                | AlgorithmKind::RandomWalk
        )
    }

    /// Whether the variant breeds with selection and crossover.
    pub fn is_genetic(self) -> bool {
        matches!(
            self,
            AlgorithmKind::Standard | AlgorithmKind::Nsga2 | AlgorithmKind::NoveltySearch
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_lenient_about_case_and_dashes() {
        assert_eq!("NSGA2".parse::<AlgorithmKind>().unwrap(), AlgorithmKind::Nsga2);
        assert_eq!(
            "one-plus-one".parse::<AlgorithmKind>().unwrap(),
            AlgorithmKind::OnePlusOne
        );
        assert_eq!(
            " crowded_tournament ".parse::<SelectionKind>().unwrap(),
            SelectionKind::CrowdedTournament
        );
    }

    #[test]
    fn test_display_round_trips() {
        for &kind in AlgorithmKind::ALL {
            assert_eq!(kind.to_string().parse::<AlgorithmKind>().unwrap(), kind);
        }
        for &kind in TerminationKind::ALL {
            assert_eq!(kind.to_string().parse::<TerminationKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_variant_is_an_error() {
        let err = "wheel".parse::<SelectionKind>().unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownVariant {
                kind: "selection function",
                value: "wheel".into()
            }
        );
        assert!("".parse::<FactoryKind>().is_err());
    }

    #[test]
    fn test_objective_arity() {
        assert!(AlgorithmKind::RandomWalk.is_single_objective());
        assert!(!AlgorithmKind::Mio.is_single_objective());
        assert!(AlgorithmKind::NoveltySearch.is_genetic());
        assert!(!AlgorithmKind::OnePlusOne.is_genetic());
    }
}
