//! Landmark (witness) downsampling
//!
//! Farthest-point (max-min) sampling: the first landmark is drawn from a
//! caller-supplied PRNG, each following landmark is the point whose
//! distance to its nearest landmark is largest. Ties go to the lowest
//! point index. The result approximates the shape of the cloud with far
//! fewer points, which keeps the cubic filtration construction cheap.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::DEFAULT_LANDMARK_SEED;
use crate::error::{Result, TdaError};
use crate::geometry::{euclidean, PointCloud};

/// PRNG used for the first-landmark draw.
///
/// `StdRng::seed_from_u64(seed)` is reproducible for a fixed `rand` release,
/// which is all the test suite relies on.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Farthest-point landmark selector
#[derive(Debug, Clone, Copy)]
pub struct LandmarkSelector {
    count: usize,
}

impl LandmarkSelector {
    pub fn new(count: usize) -> Self {
        Self { count }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Select landmarks using the default seed
    pub fn select_seeded(&self, cloud: &PointCloud) -> Result<Vec<usize>> {
        self.select(cloud, &mut seeded_rng(DEFAULT_LANDMARK_SEED))
    }

    pub fn select<R: Rng + ?Sized>(&self, cloud: &PointCloud, rng: &mut R) -> Result<Vec<usize>> {
        select_landmarks(cloud, self.count, rng)
    }
}

/// Choose `k` landmark indices from `cloud` by max-min sampling.
///
/// Requires `1 <= k <= cloud.len()`. Fails with `DegenerateInput` when the
/// cloud has fewer than `k` distinct locations.
pub fn select_landmarks<R: Rng + ?Sized>(
    cloud: &PointCloud,
    k: usize,
    rng: &mut R,
) -> Result<Vec<usize>> {
    let n = cloud.len();
    if k == 0 {
        return Err(TdaError::invalid("landmark count must be at least 1"));
    }
    if k > n {
        return Err(TdaError::invalid(format!(
            "requested {k} landmarks from a cloud of {n} points"
        )));
    }

    let points = cloud.points();
    let first = rng.random_range(0..n);
    let mut landmarks = Vec::with_capacity(k);
    landmarks.push(first);

    // Distance from each point to its nearest landmark; landmarks hold -1
    let mut nearest: Vec<f64> = points.iter().map(|p| euclidean(p, &points[first])).collect();
    nearest[first] = -1.0;

    for _ in 1..k {
        let mut best = 0;
        let mut best_dist = f64::NEG_INFINITY;
        for (i, &d) in nearest.iter().enumerate() {
            if d > best_dist {
                best = i;
                best_dist = d;
            }
        }

        if best_dist <= 0.0 {
            return Err(TdaError::degenerate(format!(
                "only {} distinct locations available for {k} landmarks",
                landmarks.len()
            )));
        }

        landmarks.push(best);
        nearest[best] = -1.0;
        for (i, p) in points.iter().enumerate() {
            if nearest[i] >= 0.0 {
                nearest[i] = nearest[i].min(euclidean(p, &points[best]));
            }
        }
    }

    debug!(n_points = n, n_landmarks = k, first, "selected landmarks");
    Ok(landmarks)
}
