//! Points in the plane and ordered point clouds.

use ndarray::Array2;

use crate::error::{Result, TdaError};

/// A point of a 2-D phase space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        euclidean(self, other)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Euclidean 2-norm of `a - b`.
pub fn euclidean(a: &Point, b: &Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Ordered sequence of points; simplices refer to points by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    points: Vec<Point>,
}

impl PointCloud {
    /// Build a cloud, rejecting non-finite coordinates.
    pub fn new(points: Vec<Point>) -> Result<Self> {
        if let Some(idx) = points.iter().position(|p| !p.is_finite()) {
            return Err(TdaError::degenerate(format!(
                "point {idx} has a non-finite coordinate"
            )));
        }
        Ok(Self { points })
    }

    /// Zip two coordinate series into a cloud.
    pub fn from_xy(x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(TdaError::invalid(format!(
                "coordinate series differ in length ({} vs {})",
                x.len(),
                y.len()
            )));
        }
        Self::new(x.iter().zip(y).map(|(&x, &y)| Point::new(x, y)).collect())
    }

    /// Build from an `n x 2` array, one point per row.
    pub fn from_array(points: &Array2<f64>) -> Result<Self> {
        if points.ncols() != 2 {
            return Err(TdaError::invalid(format!(
                "expected 2 columns, found {}",
                points.ncols()
            )));
        }
        Self::new(
            points
                .rows()
                .into_iter()
                .map(|row| Point::new(row[0], row[1]))
                .collect(),
        )
    }

    /// Rows of `[x, y]`.
    pub fn to_array(&self) -> Array2<f64> {
        let mut out = Array2::<f64>::zeros((self.points.len(), 2));
        for (i, p) in self.points.iter().enumerate() {
            out[[i, 0]] = p.x;
            out[[i, 1]] = p.y;
        }
        out
    }

    /// Pick the points at `indices`, in that order.
    pub fn subset(&self, indices: &[usize]) -> Result<Self> {
        let points = indices
            .iter()
            .map(|&i| {
                self.points.get(i).copied().ok_or_else(|| {
                    TdaError::invalid(format!(
                        "index {i} out of range for cloud of {} points",
                        self.points.len()
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { points })
    }

    /// Symmetric Euclidean distance matrix with zero diagonal
    pub fn distance_matrix(&self) -> Array2<f64> {
        let n = self.points.len();
        let mut dm = Array2::<f64>::zeros((n, n));

        for i in 0..n {
            for j in i + 1..n {
                let dist = euclidean(&self.points[i], &self.points[j]);
                dm[[i, j]] = dist;
                dm[[j, i]] = dist;
            }
        }

        dm
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Point> {
        self.points.get(idx)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_euclidean() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((euclidean(&a, &b) - 5.0).abs() < 1e-12);
        assert_eq!(euclidean(&a, &b), euclidean(&b, &a));
    }

    #[test]
    fn test_distance_matrix() {
        let cloud = PointCloud::from_array(&array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]).unwrap();
        let dm = cloud.distance_matrix();

        assert_eq!(dm[[0, 0]], 0.0);
        assert!((dm[[0, 1]] - 1.0).abs() < 1e-12);
        assert!((dm[[1, 2]] - 2.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(dm, dm.t());
    }

    #[test]
    fn test_rejects_non_finite() {
        let err = PointCloud::from_xy(&[0.0, f64::NAN], &[0.0, 1.0]).unwrap_err();
        assert!(matches!(err, TdaError::DegenerateInput(_)));
    }

    #[test]
    fn test_subset_and_roundtrip() {
        let cloud = PointCloud::from_xy(&[0.0, 1.0, 2.0], &[5.0, 6.0, 7.0]).unwrap();
        let sub = cloud.subset(&[2, 0]).unwrap();
        assert_eq!(sub.points(), &[Point::new(2.0, 7.0), Point::new(0.0, 5.0)]);
        assert!(cloud.subset(&[3]).is_err());

        let back = PointCloud::from_array(&cloud.to_array()).unwrap();
        assert_eq!(back, cloud);
    }
}
