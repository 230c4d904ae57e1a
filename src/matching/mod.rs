//! Matching Module: Comparing Persistence Diagrams
//!
//! - Hungarian solver for square minimum-cost assignment
//! - Diagram distance over the k longest-lived intervals, padded with
//!   diagonal projections
//! - Pairwise distance matrices over a batch of trials

mod hungarian;
mod wasserstein;
mod distance_matrix;

pub use hungarian::{reduce_cost_matrix, solve_assignment, Assignment};
pub use wasserstein::{
    augment, bipartite_cost_matrix, diagonal_projection, diagram_distance, DiagramMatcher,
    DiagramMatching,
};
pub use distance_matrix::{distance_matrix, DistanceMatrix, DistanceMatrixAssembler};
