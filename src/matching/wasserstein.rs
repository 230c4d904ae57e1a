//! Wasserstein-style Distance between Persistence Diagrams
//!
//! Two diagrams are compared on their `k` longest-lived intervals. Each
//! side is padded with the diagonal projections of the other side's
//! intervals so both hold 2k points; the distance is the cost of the
//! optimal bipartite matching between the padded sets under the
//! Euclidean metric on (birth, death).
//!
//! The diagonal projection of (b, d) is taken as (d, d), not the nearest
//! point of the diagonal ((b+d)/2, (b+d)/2). The metric computed here
//! depends on that rule.

use ndarray::Array2;

use super::hungarian::{solve_assignment, Assignment};
use crate::error::{Result, TdaError};
use crate::geometry::{euclidean, Point};
use crate::topology::{PersistenceDiagram, PersistenceInterval};

/// Interval as a point of the (birth, death) plane
fn as_point(interval: &PersistenceInterval) -> Point {
    Point::new(interval.birth, interval.death)
}

/// Projection of an interval onto the diagonal: (death, death)
pub fn diagonal_projection(interval: &PersistenceInterval) -> Point {
    Point::new(interval.death, interval.death)
}

/// `own` intervals followed by the diagonal projections of `other`
pub fn augment(own: &[PersistenceInterval], other: &[PersistenceInterval]) -> Vec<Point> {
    own.iter()
        .map(as_point)
        .chain(other.iter().map(diagonal_projection))
        .collect()
}

/// Pairwise Euclidean distances between two equal-size point sets
pub fn bipartite_cost_matrix(left: &[Point], right: &[Point]) -> Result<Array2<f64>> {
    if left.len() != right.len() {
        return Err(TdaError::NoFeasibleAssignment {
            rows: left.len(),
            cols: right.len(),
        });
    }
    Ok(Array2::from_shape_fn((left.len(), right.len()), |(i, j)| {
        euclidean(&left[i], &right[j])
    }))
}

/// Result of matching two diagrams
#[derive(Debug, Clone)]
pub struct DiagramMatching {
    /// Total matched cost
    pub distance: f64,
    /// Optimal row -> column matching of the augmented sets
    pub assignment: Assignment,
    /// Cost matrix the assignment was solved on
    pub cost: Array2<f64>,
}

/// Compares diagrams on their `top_k` longest intervals
#[derive(Debug, Clone, Copy)]
pub struct DiagramMatcher {
    top_k: usize,
}

impl DiagramMatcher {
    pub fn new(top_k: usize) -> Result<Self> {
        if top_k == 0 {
            return Err(TdaError::invalid("top_k must be at least 1"));
        }
        Ok(Self { top_k })
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Optimal matching between the augmented interval sets of `a` and `b`
    pub fn matching(&self, a: &PersistenceDiagram, b: &PersistenceDiagram) -> Result<DiagramMatching> {
        let top_a = a.top_k(self.top_k)?;
        let top_b = b.top_k(self.top_k)?;

        let left = augment(top_a, top_b);
        let right = augment(top_b, top_a);
        let cost = bipartite_cost_matrix(&left, &right)?;

        let assignment = solve_assignment(&cost)?;
        let distance = assignment.total_cost(&cost);

        Ok(DiagramMatching {
            distance,
            assignment,
            cost,
        })
    }

    /// Distance between two diagrams
    pub fn distance(&self, a: &PersistenceDiagram, b: &PersistenceDiagram) -> Result<f64> {
        Ok(self.matching(a, b)?.distance)
    }
}

/// Distance between `a` and `b` over their `k` longest intervals
pub fn diagram_distance(a: &PersistenceDiagram, b: &PersistenceDiagram, k: usize) -> Result<f64> {
    DiagramMatcher::new(k)?.distance(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagram(pairs: &[(f64, f64)]) -> PersistenceDiagram {
        PersistenceDiagram::from_intervals(pairs.iter().map(|&(b, d)| PersistenceInterval::new(b, d)))
    }

    #[test]
    fn test_projection_uses_death() {
        let p = diagonal_projection(&PersistenceInterval::new(0.2, 0.9));
        assert_eq!(p, Point::new(0.9, 0.9));
    }

    #[test]
    fn test_identical_diagrams_have_zero_distance() {
        let a = diagram(&[(0.1, 0.5), (0.2, 1.0), (0.3, 2.0)]);
        assert_eq!(diagram_distance(&a, &a, 3).unwrap(), 0.0);
    }

    #[test]
    fn test_single_interval_pair() {
        // A+ = {(0,1), (2,2)}, B+ = {(0,2), (1,1)}
        // identity: 1 + sqrt(2); swap: 1 + 2
        let a = diagram(&[(0.0, 1.0)]);
        let b = diagram(&[(0.0, 2.0)]);
        let d = diagram_distance(&a, &b, 1).unwrap();
        assert!((d - (1.0 + 2.0_f64.sqrt())).abs() < 1e-12);
    }

    #[test]
    fn test_only_top_k_are_compared() {
        let a = diagram(&[(0.0, 0.1), (0.0, 3.0)]);
        let b = diagram(&[(0.5, 0.55), (0.0, 3.0)]);
        assert_eq!(diagram_distance(&a, &b, 1).unwrap(), 0.0);
        assert!(diagram_distance(&a, &b, 2).unwrap() > 0.0);
    }

    #[test]
    fn test_symmetry() {
        let a = diagram(&[(0.1, 0.4), (0.2, 1.3), (0.05, 0.9)]);
        let b = diagram(&[(0.3, 0.5), (0.0, 1.1), (0.4, 2.0), (0.6, 0.7)]);
        let ab = diagram_distance(&a, &b, 3).unwrap();
        let ba = diagram_distance(&b, &a, 3).unwrap();
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_matching_shape() {
        let a = diagram(&[(0.1, 0.4), (0.2, 1.3)]);
        let b = diagram(&[(0.3, 0.5), (0.0, 1.1)]);
        let m = DiagramMatcher::new(2).unwrap().matching(&a, &b).unwrap();
        assert_eq!(m.cost.dim(), (4, 4));
        assert_eq!(m.assignment.len(), 4);
        assert!((m.assignment.total_cost(&m.cost) - m.distance).abs() < 1e-12);
    }

    #[test]
    fn test_insufficient_intervals() {
        let a = diagram(&[(0.0, 1.0)]);
        let b = diagram(&[(0.0, 1.0), (0.0, 2.0)]);
        assert!(matches!(
            diagram_distance(&a, &b, 2),
            Err(TdaError::InsufficientIntervals { required: 2, available: 1 })
        ));
        assert!(matches!(diagram_distance(&a, &b, 0), Err(TdaError::InvalidParameter(_))));
    }

    #[test]
    fn test_cost_matrix_requires_equal_sizes() {
        let left = vec![Point::new(0.0, 0.0)];
        assert!(bipartite_cost_matrix(&left, &[]).is_err());
    }
}
