//! Bounded archive of novel chromosomes.

use log::debug;

use crate::chromosome::Chromosome;

/// Result of offering a chromosome to a [`NoveltyArchive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Stored, possibly displacing the least novel member.
    Accepted,
    /// Novelty is below the admission threshold.
    RejectedBelowThreshold,
    /// The archive is full and the novelty does not beat its worst member.
    RejectedNotBetterThanWorst,
}

/// Novelty archive with capacity `limit`.
///
/// A chromosome is admitted only if its novelty is at least `threshold`.
/// Once full, a newcomer replaces the least novel member only if it is
/// strictly more novel; otherwise it is discarded. The archive never holds
/// more than `limit` entries, and once full its minimum score never
/// decreases.
#[derive(Debug, Clone)]
pub struct NoveltyArchive<T> {
    entries: Vec<(Chromosome<T>, f64)>,
    limit: usize,
    threshold: f64,
}

impl<T> NoveltyArchive<T> {
    pub fn new(limit: usize, threshold: f64) -> Self {
        Self {
            entries: Vec::with_capacity(limit),
            limit,
            threshold,
        }
    }

    /// Offers `chromosome` with novelty `score`.
    pub fn admit(&mut self, chromosome: Chromosome<T>, score: f64) -> Admission {
        if score < self.threshold {
            debug!(
                "archive rejects {:?}: novelty {score:.4} below threshold {:.4}",
                chromosome.id(),
                self.threshold
            );
            return Admission::RejectedBelowThreshold;
        }
        if self.entries.len() < self.limit {
            debug!("archive admits {:?} with novelty {score:.4}", chromosome.id());
            self.entries.push((chromosome, score));
            return Admission::Accepted;
        }

        self.entries
            .sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        match self.entries.first_mut() {
            Some(worst) if score > worst.1 => {
                debug!(
                    "archive replaces {:?} ({:.4}) with {:?} ({score:.4})",
                    worst.0.id(),
                    worst.1,
                    chromosome.id()
                );
                *worst = (chromosome, score);
                Admission::Accepted
            }
            _ => {
                debug!(
                    "archive rejects {:?}: novelty {score:.4} not above worst",
                    chromosome.id()
                );
                Admission::RejectedNotBetterThanWorst
            }
        }
    }

    /// Archived chromosomes, in no particular order.
    pub fn chromosomes(&self) -> Vec<Chromosome<T>> {
        self.entries.iter().map(|(c, _)| c.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Lowest archived novelty, if any.
    pub fn min_score(&self) -> Option<f64> {
        self.entries.iter().map(|(_, s)| *s).reduce(f64::min)
    }
}
