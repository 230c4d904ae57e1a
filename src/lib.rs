//! # Phase-Space TDA
//!
//! Persistent homology of 2-D phase-space trajectories and an
//! optimal-matching distance between their persistence diagrams.
//!
//! ## Framework
//!
//! A trajectory sampled in a 2-D phase space (for gait, the continuous
//! relative phase of hip and knee against its time derivative) is treated
//! as a point cloud. Its shape is summarized by the loops that appear and
//! disappear as the cloud is thickened, and trajectories are compared by
//! how far apart those summaries are.
//!
//! ### Methodology
//!
//! 1. **Landmarks**: farthest-point sampling keeps a small set of witness
//!    points that span the cloud
//!
//! 2. **Vietoris-Rips filtration**: edges and triangles among the
//!    landmarks, each recorded at the first swept scale where it exists
//!
//! 3. **Boundary reduction**: column reduction over Z/2Z pairs the
//!    simplex creating each loop with the simplex filling it in, giving
//!    (birth, death) intervals
//!
//! 4. **Diagram distance**: the k longest intervals of two diagrams are
//!    padded with diagonal projections and matched by the Hungarian
//!    algorithm; the matching cost is the distance
//!
//! ## Example
//!
//! ```no_run
//! use phase_space_tda::{analyze_trials, FitzHughNagumo, PipelineConfig};
//!
//! # fn main() -> phase_space_tda::Result<()> {
//! let trials = vec![
//!     ("drive-0.5".to_string(), FitzHughNagumo::new(0.5).trajectory(200, 4)?),
//!     ("drive-0.9".to_string(), FitzHughNagumo::new(0.9).trajectory(200, 4)?),
//! ];
//! let report = analyze_trials(&trials, &PipelineConfig::default())?;
//! println!("{:?}", report.distances.values());
//! # Ok(())
//! # }
//! ```
//!
//! ## References
//!
//! - Edelsbrunner & Harer, "Computational Topology" (2010)
//! - de Silva & Carlsson, "Topological estimation using witness complexes" (2004)
//! - Kuhn, "The Hungarian method for the assignment problem" (1955)

pub mod error;
pub mod config;
pub mod geometry;
pub mod topology;
pub mod matching;
pub mod pipeline;
pub mod recording;
pub mod systems;

pub use error::{Result, TdaError};
pub use config::{PipelineConfig, ScaleSweep};

// Re-exports from geometry
pub use geometry::{euclidean, Point, PointCloud};

// Re-exports from topology
pub use topology::{
    // Landmarks
    select_landmarks,
    LandmarkSelector,
    // Filtration
    Filtration,
    Simplex,
    VietorisRips,
    // Reduction
    BoundaryMatrix,
    ReducedMatrix,
    // Intervals
    extract_intervals,
    PersistenceDiagram,
    PersistenceInterval,
};

// Re-exports from matching
pub use matching::{
    diagram_distance,
    solve_assignment,
    Assignment,
    DiagramMatcher,
    DistanceMatrix,
    DistanceMatrixAssembler,
};

pub use pipeline::{analyze_trials, persistent_homology, BatchReport};
pub use recording::{JointRecording, RelativePhase};
pub use systems::FitzHughNagumo;
