//! Persistence Intervals and Diagrams
//!
//! A persistence interval [b, d) represents a topological feature that
//! is "born" at filtration value b and "dies" at value d. In a reduced
//! boundary matrix, a column j with pivot row i pairs the simplex that
//! created a feature (i) with the simplex that destroyed it (j).
//!
//! ## Interpretation
//!
//! - Long-lived features (large d-b) represent robust topological structure
//! - Short-lived features may be noise or transient phenomena
//! - Features still alive at the end of the sweep are not reported; the
//!   scale window is bounded and every comparison works on finite pairs

use std::cmp::Ordering;

use super::boundary::ReducedMatrix;
use crate::error::{Result, TdaError};

/// A persistence interval [birth, death)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersistenceInterval {
    pub birth: f64,
    pub death: f64,
}

impl PersistenceInterval {
    pub fn new(birth: f64, death: f64) -> Self {
        Self { birth, death }
    }

    /// Lifetime of the feature
    pub fn persistence(&self) -> f64 {
        self.death - self.birth
    }

    /// Ascending lifespan, then ascending birth
    fn lifespan_order(&self, other: &Self) -> Ordering {
        self.persistence()
            .total_cmp(&other.persistence())
            .then(self.birth.total_cmp(&other.birth))
    }
}

/// Finite intervals sorted by ascending lifespan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistenceDiagram {
    intervals: Vec<PersistenceInterval>,
}

impl PersistenceDiagram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep intervals with death > birth and sort them by lifespan
    pub fn from_intervals(intervals: impl IntoIterator<Item = PersistenceInterval>) -> Self {
        let mut intervals: Vec<_> = intervals
            .into_iter()
            .filter(|i| i.death > i.birth)
            .collect();
        intervals.sort_by(|a, b| a.lifespan_order(b));
        Self { intervals }
    }

    pub fn intervals(&self) -> &[PersistenceInterval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PersistenceInterval> {
        self.intervals.iter()
    }

    /// The `k` longest-lived intervals, still in ascending order
    pub fn top_k(&self, k: usize) -> Result<&[PersistenceInterval]> {
        if k > self.intervals.len() {
            return Err(TdaError::InsufficientIntervals {
                required: k,
                available: self.intervals.len(),
            });
        }
        Ok(&self.intervals[self.intervals.len() - k..])
    }

    /// Total persistence
    pub fn total_persistence(&self) -> f64 {
        self.intervals.iter().map(|i| i.persistence()).sum()
    }

    /// Maximum persistence
    pub fn max_persistence(&self) -> f64 {
        self.intervals.last().map_or(0.0, |i| i.persistence())
    }

    /// Mean persistence
    pub fn mean_persistence(&self) -> f64 {
        if self.intervals.is_empty() {
            return 0.0;
        }
        self.total_persistence() / self.intervals.len() as f64
    }
}

/// Read birth/death pairs off a reduced boundary matrix.
///
/// `scales[i]` is the entry scale of the simplex at filtration index `i`.
pub fn extract_intervals(reduced: &ReducedMatrix, scales: &[f64]) -> Result<PersistenceDiagram> {
    if scales.len() != reduced.size() {
        return Err(TdaError::invalid(format!(
            "{} scales given for a {}-simplex filtration",
            scales.len(),
            reduced.size()
        )));
    }

    Ok(PersistenceDiagram::from_intervals(
        reduced
            .pivots()
            .pairs()
            .map(|(row, col)| PersistenceInterval::new(scales[row], scales[col])),
    ))
}
