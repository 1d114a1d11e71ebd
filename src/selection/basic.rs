//! Random, sorted, tournament and crowded-tournament selection.

use std::cmp::Ordering;

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use super::SelectionFunction;
use crate::algorithm::pareto::{objective_matrix, rank_and_crowding};
use crate::chromosome::{Chromosome, Genotype};
use crate::fitness::{maximizing_score, FitnessFunction};

/// Sum of maximizing scores over all fitness functions.
fn aggregate_score<T: Genotype>(
    chromosome: &Chromosome<T>,
    fitness_functions: &[Box<dyn FitnessFunction<T>>],
) -> f64 {
    fitness_functions
        .iter()
        .map(|f| maximizing_score(f.as_ref(), chromosome))
        .sum()
}

/// Uniformly shuffled copy of the population. Ignores fitness.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelection;

impl<T: Genotype> SelectionFunction<T> for RandomSelection {
    fn select(
        &self,
        population: &[Chromosome<T>],
        _fitness_functions: &[Box<dyn FitnessFunction<T>>],
        rng: &mut dyn RngCore,
    ) -> Vec<Chromosome<T>> {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );
        let mut selected = population.to_vec();
        selected.shuffle(rng);
        selected
    }
}

/// Population sorted best-first by aggregated maximizing score.
///
/// The sort is stable, so equally fit chromosomes keep population order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FitnessSortedSelection;

impl<T: Genotype> SelectionFunction<T> for FitnessSortedSelection {
    fn select(
        &self,
        population: &[Chromosome<T>],
        fitness_functions: &[Box<dyn FitnessFunction<T>>],
        _rng: &mut dyn RngCore,
    ) -> Vec<Chromosome<T>> {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );
        let mut scored: Vec<(f64, &Chromosome<T>)> = population
            .iter()
            .map(|c| (aggregate_score(c, fitness_functions), c))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        scored.into_iter().map(|(_, c)| c.clone()).collect()
    }
}

/// Tournament selection: each round picks `k` chromosomes at random (with
/// replacement) and keeps the best by aggregated maximizing score.
///
/// Higher `k` = stronger selection pressure.
///
/// # Complexity
/// O(k) per round
#[derive(Debug, Clone, Copy)]
pub struct TournamentSelection {
    size: usize,
}

impl TournamentSelection {
    pub fn new(size: usize) -> Self {
        Self { size: size.max(1) }
    }
}

impl<T: Genotype> SelectionFunction<T> for TournamentSelection {
    fn select(
        &self,
        population: &[Chromosome<T>],
        fitness_functions: &[Box<dyn FitnessFunction<T>>],
        rng: &mut dyn RngCore,
    ) -> Vec<Chromosome<T>> {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );
        let n = population.len();
        let scores: Vec<f64> = population
            .iter()
            .map(|c| aggregate_score(c, fitness_functions))
            .collect();

        (0..n)
            .map(|_| {
                let mut best = rng.random_range(0..n);
                for _ in 1..self.size {
                    let idx = rng.random_range(0..n);
                    if scores[idx] > scores[best] {
                        best = idx;
                    }
                }
                population[best].clone()
            })
            .collect()
    }
}

/// Binary tournament on the crowded-comparison operator of NSGA-II.
///
/// Lower Pareto rank wins; equal ranks prefer the larger crowding distance;
/// full ties keep the first contender.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrowdedTournamentSelection;

impl<T: Genotype> SelectionFunction<T> for CrowdedTournamentSelection {
    fn select(
        &self,
        population: &[Chromosome<T>],
        fitness_functions: &[Box<dyn FitnessFunction<T>>],
        rng: &mut dyn RngCore,
    ) -> Vec<Chromosome<T>> {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );
        let n = population.len();
        let objectives = objective_matrix(population, fitness_functions);
        let (ranks, crowding) = rank_and_crowding(&objectives);

        (0..n)
            .map(|_| {
                let a = rng.random_range(0..n);
                let b = rng.random_range(0..n);
                let winner = match ranks[a].cmp(&ranks[b]) {
                    Ordering::Less => a,
                    Ordering::Greater => b,
                    Ordering::Equal if crowding[b] > crowding[a] => b,
                    Ordering::Equal => a,
                };
                population[winner].clone()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::testing::{scored, ScoreTable, TestFitness};
    use std::collections::HashSet;

    fn functions(table: ScoreTable) -> Vec<TestFitness> {
        vec![Box::new(table)]
    }

    #[test]
    fn test_random_is_permutation() {
        let (pop, table) = scored(&[0.1, 0.2, 0.3, 0.4, 0.5], true);
        let fs = functions(table);
        let mut rng = create_rng(42);
        let selected = RandomSelection.select(&pop, &fs, &mut rng);
        let ids: HashSet<_> = selected.iter().map(|c| c.id()).collect();
        assert_eq!(selected.len(), 5);
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_sorted_best_first() {
        let (pop, table) = scored(&[0.2, 0.9, 0.5], true);
        let fs = functions(table);
        let mut rng = create_rng(42);
        let selected = FitnessSortedSelection.select(&pop, &fs, &mut rng);
        assert!(selected[0].same_as(&pop[1]));
        assert!(selected[1].same_as(&pop[2]));
        assert!(selected[2].same_as(&pop[0]));
    }

    #[test]
    fn test_sorted_minimizing() {
        let (pop, table) = scored(&[0.2, 0.9, 0.5], false);
        let fs = functions(table);
        let mut rng = create_rng(42);
        let selected = FitnessSortedSelection.select(&pop, &fs, &mut rng);
        assert!(selected[0].same_as(&pop[0]));
    }

    #[test]
    fn test_tournament_favors_best() {
        let (pop, table) = scored(&[0.1, 0.5, 1.0, 0.2], true);
        let fs = functions(table);
        let mut rng = create_rng(42);

        let mut best = 0;
        let rounds = 500;
        for _ in 0..rounds {
            let selected = TournamentSelection::new(4).select(&pop, &fs, &mut rng);
            best += selected.iter().filter(|c| c.same_as(&pop[2])).count();
        }
        let share = best as f64 / (rounds * 4) as f64;
        assert!(share > 0.6, "expected best selected >60% of the time, got {share}");
    }

    #[test]
    fn test_crowded_tournament_prefers_front() {
        let (pop, a) = scored(&[1.0, 0.0, 0.1], true);
        let mut b = ScoreTable::new(true);
        b.set(&pop[0], 0.0);
        b.set(&pop[1], 1.0);
        b.set(&pop[2], 0.0);
        // pop[2] is dominated by pop[0]
        let fs: Vec<TestFitness> = vec![Box::new(a), Box::new(b)];
        let mut rng = create_rng(5);

        let mut dominated = 0;
        let mut total = 0;
        for _ in 0..200 {
            let selected = CrowdedTournamentSelection.select(&pop, &fs, &mut rng);
            total += selected.len();
            dominated += selected.iter().filter(|c| c.same_as(&pop[2])).count();
        }
        // only wins a tournament against itself: (1/3)^2
        let share = dominated as f64 / total as f64;
        assert!(share < 0.2, "dominated share {share}");
    }
}
