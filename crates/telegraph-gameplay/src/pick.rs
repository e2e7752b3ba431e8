//! Weighted random selection for monster move tables.

use thiserror::Error;

/// Errors building a [`WeightedPool`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PickError {
    /// No candidates at all
    #[error("Weighted pool is empty")]
    Empty,
    /// A weight was negative, NaN or infinite
    #[error("Invalid weight {weight} at index {index}")]
    InvalidWeight {
        /// Candidate index
        index: usize,
        /// Offending weight
        weight: f32,
    },
    /// Every weight was zero
    #[error("Weighted pool has no positive weight")]
    NoPositiveWeight,
}

/// Result type for pool construction.
pub type PickResult<T> = Result<T, PickError>;

/// A set of candidates with positive weights.
///
/// Zero-weight candidates are dropped at construction; picking never
/// returns them.
#[derive(Debug, Clone)]
pub struct WeightedPool<T> {
    entries: Vec<(T, f32)>,
    total: f32,
}

impl<T> WeightedPool<T> {
    /// Builds a pool, failing on bad weights or a zero total.
    pub fn new(candidates: Vec<(T, f32)>) -> PickResult<Self> {
        if candidates.is_empty() {
            return Err(PickError::Empty);
        }
        if let Some((index, &(_, weight))) = candidates
            .iter()
            .enumerate()
            .find(|(_, (_, w))| !w.is_finite() || *w < 0.0)
        {
            return Err(PickError::InvalidWeight { index, weight });
        }

        let entries: Vec<(T, f32)> = candidates.into_iter().filter(|(_, w)| *w > 0.0).collect();
        let total: f32 = entries.iter().map(|(_, w)| w).sum();
        if entries.is_empty() || total <= 0.0 {
            return Err(PickError::NoPositiveWeight);
        }

        Ok(Self { entries, total })
    }

    /// Picks one candidate with probability proportional to its weight.
    pub fn pick(&self, rng: &mut fastrand::Rng) -> &T {
        let roll = rng.f32() * self.total;
        let mut cumulative = 0.0;
        for (item, weight) in &self.entries {
            cumulative += weight;
            if roll < cumulative {
                return item;
            }
        }
        // Rounding can leave the roll a hair past the last bucket
        let last = self.entries.len() - 1;
        &self.entries[last].0
    }

    /// Sum of all positive weights.
    #[must_use]
    pub fn total_weight(&self) -> f32 {
        self.total
    }

    /// Number of pickable candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; an empty pool cannot be built.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate candidates with their weights.
    pub fn iter(&self) -> impl Iterator<Item = (&T, f32)> {
        self.entries.iter().map(|(item, w)| (item, *w))
    }
}
