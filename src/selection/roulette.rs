//! Fitness-proportionate (roulette wheel) selection.

use rand::{Rng, RngCore};

use super::SelectionFunction;
use crate::chromosome::{Chromosome, Genotype};
use crate::fitness::{maximizing_score, FitnessFunction};

/// Roulette wheel selection without replacement.
///
/// Uses exactly one fitness function. Each round builds a cumulative wheel
/// over the candidates not drawn yet (weight = normalized fitness, inverted
/// for minimizing functions), draws `rnd` in `[0, Σw]` and takes the first
/// candidate whose cumulative end satisfies `rnd ≤ end`. When every weight
/// is zero this is always the first remaining candidate.
///
/// # Complexity
/// O(n²) per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct FitnessProportionateSelection;

impl<T: Genotype> SelectionFunction<T> for FitnessProportionateSelection {
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
        assert_eq!(
            fitness_functions.len(),
            1,
            "fitness-proportionate selection uses exactly one fitness function"
        );
        let function = fitness_functions[0].as_ref();

        let mut pool: Vec<(&Chromosome<T>, f64)> = population
            .iter()
            .map(|c| (c, maximizing_score(function, c)))
            .collect();
        let mut selected = Vec::with_capacity(population.len());

        while !pool.is_empty() {
            let total: f64 = pool.iter().map(|&(_, w)| w).sum();
            let rnd = if total > 0.0 {
                rng.random_range(0.0..=total)
            } else {
                0.0
            };

            let mut end = 0.0;
            let mut pick = pool.len() - 1; // floating-point fallback
            for (i, &(_, w)) in pool.iter().enumerate() {
                end += w;
                if rnd <= end {
                    pick = i;
                    break;
                }
            }
            selected.push(pool.remove(pick).0.clone());
        }

        selected
    }
}
