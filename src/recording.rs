//! Joint-angle recordings
//!
//! A recording is a plain text table with one observation per row and four
//! whitespace-separated columns:
//!
//! | column | quantity |
//! |---|---|
//! | 1 | hip angle |
//! | 2 | hip angular velocity |
//! | 3 | knee angle |
//! | 4 | knee angular velocity |
//!
//! Blank lines and lines starting with `#` are ignored.

use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::error::{Result, TdaError};
use crate::geometry::phase::{continuous_relative_phase, gradient, normalize, normalized_cloud, range};
use crate::geometry::PointCloud;

const COLUMNS: usize = 4;

/// Hip and knee phase-space series of one trial
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JointRecording {
    pub hip_angle: Vec<f64>,
    pub hip_velocity: Vec<f64>,
    pub knee_angle: Vec<f64>,
    pub knee_velocity: Vec<f64>,
}

impl JointRecording {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let recording: Self = text.parse()?;
        debug!(path = %path.display(), n_samples = recording.len(), "loaded recording");
        Ok(recording)
    }

    pub fn len(&self) -> usize {
        self.hip_angle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hip_angle.is_empty()
    }

    /// Continuous relative phase of hip against knee, and its derivative.
    ///
    /// Every series is first normalized to [-1, 1] against its own range.
    pub fn relative_phase(&self) -> Result<RelativePhase> {
        let own = |series: &[f64]| -> Result<Vec<f64>> {
            let bounds = range(series).ok_or_else(|| TdaError::degenerate("empty recording"))?;
            normalize(series, bounds)
        };

        let crp = continuous_relative_phase(
            &own(&self.hip_angle[..])?,
            &own(&self.hip_velocity[..])?,
            &own(&self.knee_angle[..])?,
            &own(&self.knee_velocity[..])?,
        )?;
        let crp_dot = gradient(&crp);
        Ok(RelativePhase { crp, crp_dot })
    }
}

impl FromStr for JointRecording {
    type Err = TdaError;

    fn from_str(text: &str) -> Result<Self> {
        let mut recording = Self::default();

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let values = line
                .split_whitespace()
                .map(|field| {
                    field.parse::<f64>().map_err(|e| TdaError::Parse {
                        line: line_no,
                        message: format!("{field:?}: {e}"),
                    })
                })
                .collect::<Result<Vec<f64>>>()?;

            if values.len() != COLUMNS {
                return Err(TdaError::Parse {
                    line: line_no,
                    message: format!("expected {COLUMNS} columns, found {}", values.len()),
                });
            }

            recording.hip_angle.push(values[0]);
            recording.hip_velocity.push(values[1]);
            recording.knee_angle.push(values[2]);
            recording.knee_velocity.push(values[3]);
        }

        if recording.is_empty() {
            return Err(TdaError::degenerate("recording holds no samples"));
        }
        Ok(recording)
    }
}

/// (CRP, dCRP) series of a trial, in degrees and degrees per sample
#[derive(Debug, Clone, PartialEq)]
pub struct RelativePhase {
    pub crp: Vec<f64>,
    pub crp_dot: Vec<f64>,
}

impl RelativePhase {
    /// Point cloud normalized against ranges shared by a set of trials
    pub fn to_cloud(&self, crp_range: (f64, f64), crp_dot_range: (f64, f64)) -> Result<PointCloud> {
        normalized_cloud(&self.crp, &self.crp_dot, crp_range, crp_dot_range)
    }
}

/// Ranges of CRP and dCRP pooled over every trial
pub fn pooled_ranges(phases: &[RelativePhase]) -> Result<((f64, f64), (f64, f64))> {
    let crp = pooled_range(phases.iter().map(|p| p.crp.as_slice()));
    let crp_dot = pooled_range(phases.iter().map(|p| p.crp_dot.as_slice()));
    match (crp, crp_dot) {
        (Some(crp), Some(crp_dot)) => Ok((crp, crp_dot)),
        _ => Err(TdaError::invalid("no samples to pool")),
    }
}

fn pooled_range<'a>(series: impl Iterator<Item = &'a [f64]>) -> Option<(f64, f64)> {
    series
        .filter_map(range)
        .reduce(|(lo1, hi1), (lo2, hi2)| (lo1.min(lo2), hi1.max(hi2)))
}
