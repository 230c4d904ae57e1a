//! Pipeline: Point Cloud -> Persistence Diagram -> Trial Distances
//!
//! Per trial:
//!
//!   cloud --landmarks--> subset --Vietoris-Rips--> filtration
//!         --boundary--> reduced matrix --pivots--> diagram
//!
//! A batch of trials is processed in parallel, one task per trial, and
//! the resulting diagrams are compared pairwise.

use std::time::Instant;

use ndarray::Array2;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::error::{Result, TdaError};
use crate::geometry::PointCloud;
use crate::matching::{DistanceMatrix, DistanceMatrixAssembler};
use crate::topology::{
    extract_intervals, seeded_rng, select_landmarks, BoundaryMatrix, PersistenceDiagram,
    VietorisRips,
};

/// Persistence diagram of a single point cloud
pub fn persistent_homology(cloud: &PointCloud, config: &PipelineConfig) -> Result<PersistenceDiagram> {
    config.validate()?;

    let mut rng = seeded_rng(config.landmark_seed);
    let landmarks = select_landmarks(cloud, config.landmark_count, &mut rng)?;
    let witnesses = cloud.subset(&landmarks)?;

    let filtration = VietorisRips::from_cloud(&witnesses).filtration(&config.scale)?;
    info!(
        n_points = cloud.len(),
        n_landmarks = witnesses.len(),
        n_edges = filtration.count_dim(1),
        n_triangles = filtration.count_dim(2),
        "filtration built"
    );

    let scales = filtration.scales();
    let boundary = BoundaryMatrix::from_filtration(&filtration);

    let start = Instant::now();
    let reduced = boundary.into_reduced();
    debug!(
        size = reduced.size(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "boundary matrix reduced"
    );

    let diagram = extract_intervals(&reduced, &scales)?;
    info!(n_intervals = diagram.len(), max_persistence = diagram.max_persistence(), "diagram extracted");

    Ok(diagram)
}

/// Diagrams, distances and adjacency for a batch of trials
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub names: Vec<String>,
    pub diagrams: Vec<PersistenceDiagram>,
    pub distances: DistanceMatrix,
    pub normalized: DistanceMatrix,
    pub adjacency: Array2<u8>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Index of the trial called `name`
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Distance between two named trials
    pub fn distance_between(&self, a: &str, b: &str) -> Option<f64> {
        self.distances.get(self.position(a)?, self.position(b)?)
    }
}

/// Run the per-trial pipeline over every trial, then compare all pairs.
///
/// The first failing trial or pair aborts the batch.
pub fn analyze_trials(trials: &[(String, PointCloud)], config: &PipelineConfig) -> Result<BatchReport> {
    config.validate()?;
    if trials.is_empty() {
        return Err(TdaError::invalid("no trials to analyze"));
    }

    info!(n_trials = trials.len(), "computing persistence diagrams");
    let diagrams = trials
        .par_iter()
        .map(|(name, cloud)| {
            debug!(trial = %name, "trial started");
            persistent_homology(cloud, config)
        })
        .collect::<Result<Vec<_>>>()?;

    let distances = DistanceMatrixAssembler::new(config.top_k_intervals)?.assemble(&diagrams)?;
    let normalized = distances.normalized();
    let adjacency = distances.adjacency(config.adjacency_threshold);

    Ok(BatchReport {
        names: trials.iter().map(|(name, _)| name.clone()).collect(),
        diagrams,
        distances,
        normalized,
        adjacency,
    })
}
