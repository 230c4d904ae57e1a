//! Trial-to-trial distance matrices
//!
//! Every unordered pair of diagrams is matched independently, so pairs are
//! distributed over the rayon pool; each task returns its own cell and
//! the symmetric matrix is filled once all tasks are done.

use ndarray::Array2;
use rayon::prelude::*;
use tracing::{debug, info};

use super::wasserstein::DiagramMatcher;
use crate::error::{Result, TdaError};
use crate::topology::PersistenceDiagram;

/// Symmetric N x N matrix of trial distances with zero diagonal
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    values: Array2<f64>,
}

impl DistanceMatrix {
    /// Wrap an array, checking shape, symmetry and the zero diagonal
    pub fn from_array(values: Array2<f64>) -> Result<Self> {
        let (rows, cols) = values.dim();
        if rows != cols {
            return Err(TdaError::invalid(format!(
                "distance matrix must be square, got {rows}x{cols}"
            )));
        }
        for i in 0..rows {
            if values[[i, i]] != 0.0 {
                return Err(TdaError::invalid(format!("diagonal entry {i} is nonzero")));
            }
            for j in i + 1..cols {
                if values[[i, j]] != values[[j, i]] {
                    return Err(TdaError::invalid(format!("entries ({i}, {j}) are not symmetric")));
                }
            }
        }
        Ok(Self { values })
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn into_array(self) -> Array2<f64> {
        self.values
    }

    /// Number of trials
    pub fn size(&self) -> usize {
        self.values.nrows()
    }

    pub fn get(&self, a: usize, b: usize) -> Option<f64> {
        self.values.get([a, b]).copied()
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Scale into [0, 1] by the largest entry; an all-zero matrix stays zero
    pub fn normalized(&self) -> Self {
        let max = self.max();
        if max <= 0.0 {
            return self.clone();
        }
        Self {
            values: self.values.mapv(|v| v / max),
        }
    }

    /// 1 where the normalized distance is below `threshold`, off the diagonal
    pub fn adjacency(&self, threshold: f64) -> Array2<u8> {
        let normalized = self.normalized();
        let mut adjacency = normalized.values.mapv(|v| u8::from(v < threshold));
        adjacency.diag_mut().fill(0);
        adjacency
    }
}

/// Builds distance matrices from per-trial diagrams
#[derive(Debug, Clone, Copy)]
pub struct DistanceMatrixAssembler {
    matcher: DiagramMatcher,
}

impl DistanceMatrixAssembler {
    pub fn new(top_k: usize) -> Result<Self> {
        Ok(Self {
            matcher: DiagramMatcher::new(top_k)?,
        })
    }

    pub fn matcher(&self) -> &DiagramMatcher {
        &self.matcher
    }

    /// Match every pair of diagrams. The first failing pair aborts the batch.
    pub fn assemble(&self, diagrams: &[PersistenceDiagram]) -> Result<DistanceMatrix> {
        let n = diagrams.len();
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|a| (a + 1..n).map(move |b| (a, b)))
            .collect();
        info!(n_trials = n, n_pairs = pairs.len(), "assembling distance matrix");

        let cells = pairs
            .par_iter()
            .map(|&(a, b)| {
                self.matcher
                    .distance(&diagrams[a], &diagrams[b])
                    .map(|d| (a, b, d))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut values = Array2::<f64>::zeros((n, n));
        for (a, b, d) in cells {
            debug!(a, b, distance = d, "pair matched");
            values[[a, b]] = d;
            values[[b, a]] = d;
        }

        let matrix = DistanceMatrix { values };
        info!(n_trials = n, max_distance = matrix.max(), "distance matrix assembled");
        Ok(matrix)
    }
}

/// Distance matrix over `diagrams` using their `k` longest intervals
pub fn distance_matrix(diagrams: &[PersistenceDiagram], k: usize) -> Result<DistanceMatrix> {
    DistanceMatrixAssembler::new(k)?.assemble(diagrams)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::PersistenceInterval;
    use ndarray::array;

    fn diagram(pairs: &[(f64, f64)]) -> PersistenceDiagram {
        PersistenceDiagram::from_intervals(pairs.iter().map(|&(b, d)| PersistenceInterval::new(b, d)))
    }

    fn diagrams() -> Vec<PersistenceDiagram> {
        vec![
            diagram(&[(0.1, 0.5), (0.2, 1.0)]),
            diagram(&[(0.1, 0.5), (0.2, 1.1)]),
            diagram(&[(0.0, 2.0), (0.5, 2.9)]),
        ]
    }

    #[test]
    fn test_assemble_symmetric() {
        let dm = distance_matrix(&diagrams(), 2).unwrap();
        assert_eq!(dm.size(), 3);
        let v = dm.values();
        assert_eq!(v, &v.t());
        assert!((0..3).all(|i| v[[i, i]] == 0.0));

        // Near-identical diagrams are closer than dissimilar ones
        assert!(v[[0, 1]] < v[[0, 2]]);
        assert!(v[[0, 1]] < v[[1, 2]]);
    }

    #[test]
    fn test_assemble_aborts_on_short_diagram() {
        let mut all = diagrams();
        all.push(diagram(&[(0.0, 1.0)]));
        assert!(matches!(
            distance_matrix(&all, 2),
            Err(TdaError::InsufficientIntervals { .. })
        ));
    }

    #[test]
    fn test_normalized_and_adjacency() {
        let dm = DistanceMatrix::from_array(array![
            [0.0, 1.0, 4.0],
            [1.0, 0.0, 2.0],
            [4.0, 2.0, 0.0]
        ])
        .unwrap();

        let norm = dm.normalized();
        assert_eq!(norm.get(0, 2), Some(1.0));
        assert_eq!(norm.get(0, 1), Some(0.25));

        let adjacency = dm.adjacency(0.5);
        assert_eq!(adjacency, array![[0, 1, 0], [1, 0, 0], [0, 0, 0]]);
    }

    #[test]
    fn test_zero_matrix_normalizes_to_zero() {
        let dm = DistanceMatrix::from_array(Array2::zeros((2, 2))).unwrap();
        assert_eq!(dm.normalized(), dm);
        assert_eq!(dm.adjacency(0.5), array![[0, 1], [1, 0]]);
    }

    #[derive(Clone, Default)]
    struct SharedBuf(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_assemble_logs_pairs_and_summary() {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            distance_matrix(&diagrams(), 2).unwrap();
        });

        let log = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(log.matches("pair matched").count(), 3);
        assert!(log.contains("distance matrix assembled"));
        assert!(log.contains("n_trials=3"));
    }

    #[test]
    fn test_from_array_validation() {
        assert!(DistanceMatrix::from_array(array![[0.0, 1.0], [2.0, 0.0]]).is_err());
        assert!(DistanceMatrix::from_array(array![[1.0, 0.0], [0.0, 0.0]]).is_err());
    }
}
