//! Pareto dominance utilities for multi-objective search.
//!
//! All objectives are **maximized** here: callers pass maximizing scores
//! (see [`maximizing_score`](crate::fitness::maximizing_score)).
//!
//! # Algorithms
//!
//! - [`non_dominated_sort`]: Fast non-dominated sorting (Deb et al., 2002)
//! - [`crowding_distance`]: Crowding distance within one front
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"

use std::cmp::Ordering;

use crate::chromosome::{Chromosome, Genotype};
use crate::fitness::{maximizing_score, FitnessFunction};

/// Result of non-dominated sorting.
#[derive(Debug, Clone)]
pub struct ParetoFronts {
    /// Pareto rank per solution (0 = non-dominated).
    pub ranks: Vec<usize>,

    /// Solution indices grouped by rank: `fronts[0]` holds rank 0.
    pub fronts: Vec<Vec<usize>>,
}

/// Objective matrix of a population: one row per chromosome, one maximizing
/// score per fitness function.
pub fn objective_matrix<T: Genotype>(
    population: &[Chromosome<T>],
    fitness_functions: &[Box<dyn FitnessFunction<T>>],
) -> Vec<Vec<f64>> {
    population
        .iter()
        .map(|c| {
            fitness_functions
                .iter()
                .map(|f| maximizing_score(f.as_ref(), c))
                .collect()
        })
        .collect()
}

/// Fast non-dominated sorting.
///
/// Solution `a` dominates `b` when it is at least as good in every objective
/// and strictly better in one. Identical solutions do not dominate each
/// other.
///
/// # Complexity
/// O(m · n²) for m objectives and n solutions.
pub fn non_dominated_sort(objectives: &[Vec<f64>]) -> ParetoFronts {
    let n = objectives.len();
    if n == 0 {
        return ParetoFronts {
            ranks: Vec::new(),
            fronts: Vec::new(),
        };
    }

    let mut dominated_count = vec![0usize; n];
    let mut dominates: Vec<Vec<usize>> = vec![Vec::new(); n];
    for i in 0..n {
        for j in (i + 1)..n {
            match dominance(&objectives[i], &objectives[j]) {
                Ordering::Greater => {
                    dominates[i].push(j);
                    dominated_count[j] += 1;
                }
                Ordering::Less => {
                    dominates[j].push(i);
                    dominated_count[i] += 1;
                }
                Ordering::Equal => {}
            }
        }
    }

    let mut ranks = vec![0usize; n];
    let mut current: Vec<usize> = (0..n).filter(|&i| dominated_count[i] == 0).collect();
    let mut fronts = Vec::new();
    while !current.is_empty() {
        let mut next = Vec::new();
        for &i in &current {
            for &j in &dominates[i] {
                dominated_count[j] -= 1;
                if dominated_count[j] == 0 {
                    ranks[j] = fronts.len() + 1;
                    next.push(j);
                }
            }
        }
        fronts.push(current);
        current = next;
    }

    ParetoFronts { ranks, fronts }
}

/// Dominance of `a` over `b` under maximization.
///
/// `Greater`: `a` dominates. `Less`: `b` dominates. `Equal`: neither.
pub fn dominance(a: &[f64], b: &[f64]) -> Ordering {
    let mut a_better = false;
    let mut b_better = false;
    for (&x, &y) in a.iter().zip(b) {
        if x > y {
            a_better = true;
        } else if y > x {
            b_better = true;
        }
    }
    match (a_better, b_better) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

/// Crowding distance of each solution of one front.
///
/// Boundary solutions of any objective get `f64::INFINITY`; fronts of up to
/// two solutions are all boundary.
pub fn crowding_distance(front: &[Vec<f64>]) -> Vec<f64> {
    let n = front.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let m = front[0].len();
    let mut distances = vec![0.0f64; n];
    let mut order: Vec<usize> = (0..n).collect();
    for obj in 0..m {
        order.sort_by(|&a, &b| {
            front[a][obj]
                .partial_cmp(&front[b][obj])
                .unwrap_or(Ordering::Equal)
        });
        distances[order[0]] = f64::INFINITY;
        distances[order[n - 1]] = f64::INFINITY;

        let range = front[order[n - 1]][obj] - front[order[0]][obj];
        if range <= 0.0 {
            continue;
        }
        for w in order.windows(3) {
            distances[w[1]] += (front[w[2]][obj] - front[w[0]][obj]) / range;
        }
    }
    distances
}

/// Pareto rank and crowding distance (computed per front) for every row.
pub fn rank_and_crowding(objectives: &[Vec<f64>]) -> (Vec<usize>, Vec<f64>) {
    let sorted = non_dominated_sort(objectives);
    let mut crowding = vec![0.0; objectives.len()];
    for front in &sorted.fronts {
        let rows: Vec<Vec<f64>> = front.iter().map(|&i| objectives[i].clone()).collect();
        for (&i, d) in front.iter().zip(crowding_distance(&rows)) {
            crowding[i] = d;
        }
    }
    (sorted.ranks, crowding)
}
