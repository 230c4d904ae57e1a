//! Topology Module: Persistent Homology of Planar Point Clouds
//!
//! Implements the stages that turn a point cloud into a persistence
//! diagram:
//! - Landmark (witness) downsampling by farthest-point sampling
//! - Vietoris-Rips filtration over the landmarks
//! - Boundary matrix construction and standard reduction over Z/2Z
//! - Birth/death interval extraction
//!
//! ## Mathematical Background
//!
//! For a point cloud X we construct a filtration of simplicial complexes
//! VR_ε(X) indexed by the scale parameter ε. Persistent homology tracks
//! the birth and death of loops across this filtration; the lifespan of a
//! loop measures how robust it is.

mod landmarks;
mod vietoris_rips;
mod boundary;
mod persistence;

pub use landmarks::{seeded_rng, select_landmarks, LandmarkSelector};
pub use vietoris_rips::{FilteredSimplex, Filtration, Simplex, VietorisRips};
pub use boundary::{BoundaryMatrix, PivotMap, ReducedMatrix, SparseColumn};
pub use persistence::{extract_intervals, PersistenceDiagram, PersistenceInterval};
