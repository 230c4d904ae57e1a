//! Boundary Matrix and Standard Reduction over Z/2Z
//!
//! Entry (i, j) of the boundary matrix is 1 when simplex i is a
//! codimension-1 face of simplex j and i < j in filtration order.
//! Columns are reduced left to right: while the lowest nonzero row of
//! column j equals the lowest row of an earlier column, that column is
//! added to j. Each addition lowers the pivot of j or empties it, so the
//! reduction terminates.
//!
//! ## Reference
//!
//! Edelsbrunner, Letscher, Zomorodian (2002). "Topological Persistence
//! and Simplification". Discrete & Computational Geometry.

use ndarray::Array2;
use std::collections::{BTreeSet, HashMap};

use super::vietoris_rips::{Filtration, Simplex};
use crate::error::{Result, TdaError};

/// Sparse column: set of nonzero row indices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseColumn {
    rows: BTreeSet<usize>,
}

impl SparseColumn {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        Self { rows: indices.into_iter().collect() }
    }

    pub fn is_zero(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, row: usize) -> bool {
        self.rows.contains(&row)
    }

    pub fn rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.iter().copied()
    }

    /// Get the lowest (maximum) non-zero index
    pub fn low(&self) -> Option<usize> {
        self.rows.iter().next_back().copied()
    }

    /// XOR (symmetric difference) with another column - addition in Z/2Z
    pub fn add_assign(&mut self, other: &SparseColumn) {
        for &row in &other.rows {
            if !self.rows.remove(&row) {
                self.rows.insert(row);
            }
        }
    }
}

/// Square boundary matrix indexed by filtration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundaryMatrix {
    columns: Vec<SparseColumn>,
}

impl BoundaryMatrix {
    /// Face incidences of a filtration
    pub fn from_filtration(filtration: &Filtration) -> Self {
        let index: HashMap<&Simplex, usize> = filtration
            .iter()
            .enumerate()
            .map(|(i, e)| (&e.simplex, i))
            .collect();

        let columns = filtration
            .iter()
            .enumerate()
            .map(|(j, entry)| {
                SparseColumn::from_indices(
                    entry
                        .simplex
                        .faces()
                        .iter()
                        .filter_map(|face| index.get(face).copied())
                        .filter(|&i| i < j),
                )
            })
            .collect();

        Self { columns }
    }

    /// Build from a dense square 0/1 matrix with nonzeros above the diagonal
    pub fn from_dense(dense: &Array2<u8>) -> Result<Self> {
        let (rows, cols) = dense.dim();
        if rows != cols {
            return Err(TdaError::invalid(format!(
                "boundary matrix must be square, got {rows}x{cols}"
            )));
        }

        let mut columns = vec![SparseColumn::new(); cols];
        for ((i, j), &value) in dense.indexed_iter() {
            match value {
                0 => {}
                1 if i < j => {
                    columns[j].rows.insert(i);
                }
                1 => {
                    return Err(TdaError::invalid(format!(
                        "nonzero entry ({i}, {j}) on or below the diagonal"
                    )))
                }
                other => {
                    return Err(TdaError::invalid(format!(
                        "entry ({i}, {j}) = {other} is not binary"
                    )))
                }
            }
        }

        Ok(Self { columns })
    }

    /// Dense 0/1 rendering
    pub fn to_dense(&self) -> Array2<u8> {
        let n = self.columns.len();
        let mut dense = Array2::<u8>::zeros((n, n));
        for (j, column) in self.columns.iter().enumerate() {
            for i in column.rows() {
                dense[[i, j]] = 1;
            }
        }
        dense
    }

    /// Number of rows (= number of columns)
    pub fn size(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, j: usize) -> Option<&SparseColumn> {
        self.columns.get(j)
    }

    pub fn entry(&self, i: usize, j: usize) -> bool {
        self.columns.get(j).is_some_and(|c| c.contains(i))
    }

    /// Lowest nonzero row of every column
    pub fn pivots(&self) -> PivotMap {
        PivotMap {
            pivots: self.columns.iter().map(SparseColumn::low).collect(),
        }
    }

    /// Reduce a copy, leaving `self` untouched
    pub fn reduce(&self) -> ReducedMatrix {
        self.clone().into_reduced()
    }

    /// Reduce in place, consuming the matrix
    pub fn into_reduced(mut self) -> ReducedMatrix {
        let mut low_to_col: HashMap<usize, usize> = HashMap::new();

        for j in 0..self.columns.len() {
            let mut column = std::mem::take(&mut self.columns[j]);

            while let Some(low_idx) = column.low() {
                match low_to_col.get(&low_idx) {
                    Some(&pivot_col) => column.add_assign(&self.columns[pivot_col]),
                    None => break,
                }
            }

            if let Some(low_idx) = column.low() {
                low_to_col.insert(low_idx, j);
            }
            self.columns[j] = column;
        }

        let pivots = self.pivots();
        ReducedMatrix { matrix: self, pivots }
    }
}

/// Column index -> lowest nonzero row, or `None` for a zero column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PivotMap {
    pivots: Vec<Option<usize>>,
}

impl PivotMap {
    pub fn get(&self, col: usize) -> Option<usize> {
        self.pivots.get(col).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.pivots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pivots.is_empty()
    }

    /// (pivot row, column) for every nonzero column, in column order
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pivots
            .iter()
            .enumerate()
            .filter_map(|(col, row)| row.map(|row| (row, col)))
    }

    pub fn as_slice(&self) -> &[Option<usize>] {
        &self.pivots
    }
}

/// Output of the standard reduction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducedMatrix {
    matrix: BoundaryMatrix,
    pivots: PivotMap,
}

impl ReducedMatrix {
    pub fn matrix(&self) -> &BoundaryMatrix {
        &self.matrix
    }

    pub fn pivots(&self) -> &PivotMap {
        &self.pivots
    }

    pub fn size(&self) -> usize {
        self.matrix.size()
    }

    pub fn to_dense(&self) -> Array2<u8> {
        self.matrix.to_dense()
    }

    pub fn into_matrix(self) -> BoundaryMatrix {
        self.matrix
    }
}
