//! Vietoris-Rips Filtration Construction
//!
//! The Vietoris-Rips complex VR_ε(X) holds an edge [i, j] when
//! d(i, j) < ε and a triangle [i, j, k] when all three pairwise distances
//! are below ε. Sweeping ε upward and recording the scale at which each
//! simplex first appears yields a filtration: an ordered list of
//! (simplex, entry scale) pairs.
//!
//! Within one scale, edges are emitted before triangles, each in
//! lexicographic vertex order. Vertices are not part of the filtration,
//! so the resulting diagram tracks 1-dimensional features (loops).

use ndarray::Array2;
use std::collections::{HashMap, HashSet};

use crate::config::ScaleSweep;
use crate::error::{Result, TdaError};
use crate::geometry::PointCloud;

/// A simplex represented by its sorted vertex indices
#[derive(Debug, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct Simplex {
    vertices: Vec<usize>,
}

impl Simplex {
    /// Canonical simplex from vertices in any order
    pub fn new(mut vertices: Vec<usize>) -> Self {
        vertices.sort_unstable();
        vertices.dedup();
        Self { vertices }
    }

    pub fn edge(a: usize, b: usize) -> Self {
        Self::new(vec![a, b])
    }

    pub fn triangle(a: usize, b: usize, c: usize) -> Self {
        Self::new(vec![a, b, c])
    }

    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    pub fn dimension(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    /// Codimension-1 faces, each dropping one vertex
    pub fn faces(&self) -> Vec<Simplex> {
        if self.vertices.len() < 2 {
            return Vec::new();
        }
        (0..self.vertices.len())
            .map(|skip| {
                let mut face = self.vertices.clone();
                face.remove(skip);
                Simplex { vertices: face }
            })
            .collect()
    }

    /// Is `self` a codimension-1 face of `other`?
    pub fn is_face_of(&self, other: &Simplex) -> bool {
        self.vertices.len() + 1 == other.vertices.len()
            && self.vertices.iter().all(|v| other.vertices.binary_search(v).is_ok())
    }
}

/// A simplex in the filtration with its entry scale
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredSimplex {
    pub simplex: Simplex,
    pub scale: f64,
}

/// Ordered (simplex, entry scale) sequence.
///
/// Entry scales never decrease along the sequence and no simplex repeats.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filtration {
    entries: Vec<FilteredSimplex>,
}

impl Filtration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from explicit entries, checking order and uniqueness.
    pub fn from_entries(entries: Vec<FilteredSimplex>) -> Result<Self> {
        let mut filtration = Self::new();
        let mut seen: HashSet<Simplex> = HashSet::with_capacity(entries.len());
        for entry in entries {
            if let Some(last) = filtration.entries.last() {
                if entry.scale < last.scale {
                    return Err(TdaError::invalid(format!(
                        "entry scale {} follows larger scale {}",
                        entry.scale, last.scale
                    )));
                }
            }
            if !seen.insert(entry.simplex.clone()) {
                return Err(TdaError::invalid(format!(
                    "simplex {:?} appears twice",
                    entry.simplex.vertices()
                )));
            }
            filtration.entries.push(entry);
        }
        Ok(filtration)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[FilteredSimplex] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilteredSimplex> {
        self.entries.iter()
    }

    /// Entry scale per filtration index
    pub fn scales(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.scale).collect()
    }

    /// Count of simplices of dimension `d`
    pub fn count_dim(&self, d: usize) -> usize {
        self.entries.iter().filter(|e| e.simplex.dimension() == d).count()
    }

    /// Does every recorded face of every simplex enter no later than it?
    ///
    /// Faces absent from the filtration (vertices, in particular) are not
    /// checked.
    pub fn is_monotone(&self) -> bool {
        let position: HashMap<&Simplex, usize> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (&e.simplex, i))
            .collect();

        self.entries.iter().enumerate().all(|(j, entry)| {
            entry.simplex.faces().iter().all(|face| match position.get(face) {
                Some(&i) => i < j && self.entries[i].scale <= entry.scale,
                None => face.dimension() == 0,
            })
        })
    }
}

/// Vietoris-Rips filtration builder
pub struct VietorisRips {
    /// Distance matrix (precomputed)
    distances: Array2<f64>,
}

impl VietorisRips {
    /// Create a new VR builder from a distance matrix
    pub fn new(distances: Array2<f64>) -> Self {
        Self { distances }
    }

    /// Create from point cloud (computes distance matrix)
    pub fn from_cloud(cloud: &PointCloud) -> Self {
        Self::new(cloud.distance_matrix())
    }

    /// Number of points
    pub fn n_points(&self) -> usize {
        self.distances.nrows()
    }

    pub fn distances(&self) -> &Array2<f64> {
        &self.distances
    }

    /// All edges strictly shorter than epsilon
    pub fn edges_below(&self, epsilon: f64) -> Vec<(usize, usize)> {
        let n = self.n_points();
        let mut edges = Vec::new();

        for i in 0..n {
            for j in i + 1..n {
                if self.distances[[i, j]] < epsilon {
                    edges.push((i, j));
                }
            }
        }

        edges
    }

    /// All triangles whose three sides are strictly shorter than epsilon
    pub fn triangles_below(&self, epsilon: f64) -> Vec<(usize, usize, usize)> {
        let n = self.n_points();
        let mut triangles = Vec::new();

        for i in 0..n {
            for j in i + 1..n {
                if self.distances[[i, j]] >= epsilon {
                    continue;
                }
                for k in j + 1..n {
                    if self.distances[[i, k]] < epsilon && self.distances[[j, k]] < epsilon {
                        triangles.push((i, j, k));
                    }
                }
            }
        }

        triangles
    }

    /// Sweep the scale and record each simplex at its first scale.
    pub fn filtration(&self, sweep: &ScaleSweep) -> Result<Filtration> {
        sweep.validate()?;

        let mut seen: HashSet<Simplex> = HashSet::new();
        let mut entries = Vec::new();

        for epsilon in sweep.values() {
            let edges = self.edges_below(epsilon).into_iter().map(|(a, b)| Simplex::edge(a, b));
            let triangles = self
                .triangles_below(epsilon)
                .into_iter()
                .map(|(a, b, c)| Simplex::triangle(a, b, c));

            for simplex in edges.chain(triangles) {
                if !seen.contains(&simplex) {
                    seen.insert(simplex.clone());
                    entries.push(FilteredSimplex { simplex, scale: epsilon });
                }
            }
        }

        Ok(Filtration { entries })
    }
}
