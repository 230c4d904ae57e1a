//! Phase-angle helpers for joint-coordination trajectories
//!
//! A joint is described by its angle θ and angular velocity ω. After
//! normalizing both to [-1, 1], the phase angle of the joint is
//! atan2(ω, θ); the continuous relative phase (CRP) of two joints is the
//! difference of their phase angles. The (CRP, dCRP/dt) plane is the
//! point cloud whose topology is compared across trials.

use std::f64::consts::PI;

use super::PointCloud;
use crate::error::{Result, TdaError};

/// Minimum and maximum of a series, `None` when empty.
pub fn range(series: &[f64]) -> Option<(f64, f64)> {
    let first = *series.first()?;
    Some(
        series
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

/// Linearly map `series` so that `min -> -1` and `max -> 1`.
pub fn normalize(series: &[f64], (min, max): (f64, f64)) -> Result<Vec<f64>> {
    let span = max - min;
    if !span.is_finite() || span == 0.0 {
        return Err(TdaError::degenerate(format!(
            "cannot normalize against range [{min}, {max}]"
        )));
    }
    Ok(series
        .iter()
        .map(|&v| 2.0 * (v - min) / span - 1.0)
        .collect())
}

/// Relative phase of two phase spaces, in degrees.
///
/// Values below -180° are wrapped by +360°.
pub fn continuous_relative_phase(
    x: &[f64],
    x_dot: &[f64],
    y: &[f64],
    y_dot: &[f64],
) -> Result<Vec<f64>> {
    let n = x.len();
    if x_dot.len() != n || y.len() != n || y_dot.len() != n {
        return Err(TdaError::invalid("phase series must share one length"));
    }

    Ok((0..n)
        .map(|i| {
            let phase_x = x_dot[i].atan2(x[i]);
            let phase_y = y_dot[i].atan2(y[i]);
            let omega = (phase_x - phase_y) * 180.0 / PI;
            if omega < -180.0 {
                omega + 360.0
            } else {
                omega
            }
        })
        .collect())
}

/// Discrete derivative with unit spacing.
///
/// Central differences inside, one-sided differences at both ends.
pub fn gradient(series: &[f64]) -> Vec<f64> {
    let n = series.len();
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let mut out = Vec::with_capacity(n);
            out.push(series[1] - series[0]);
            for i in 1..n - 1 {
                out.push((series[i + 1] - series[i - 1]) / 2.0);
            }
            out.push(series[n - 1] - series[n - 2]);
            out
        }
    }
}

/// Point cloud of `(x, y)` normalized against shared ranges.
///
/// Trials are normalized against ranges pooled over every trial so that
/// their diagrams live on a common scale.
pub fn normalized_cloud(
    x: &[f64],
    y: &[f64],
    x_range: (f64, f64),
    y_range: (f64, f64),
) -> Result<PointCloud> {
    let xn = normalize(x, x_range)?;
    let yn = normalize(y, y_range)?;
    PointCloud::from_xy(&xn, &yn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_endpoints() {
        let out = normalize(&[2.0, 3.0, 4.0], (2.0, 4.0)).unwrap();
        assert_eq!(out, vec![-1.0, 0.0, 1.0]);
        assert!(normalize(&[1.0], (1.0, 1.0)).is_err());
    }

    #[test]
    fn test_range() {
        assert_eq!(range(&[3.0, -1.0, 2.0]), Some((-1.0, 3.0)));
        assert_eq!(range(&[]), None);
    }

    #[test]
    fn test_relative_phase_wraps() {
        // phase_x = 170°, phase_y = -170° -> 340° stays, reverse gives -340° -> 20°
        let a = 170.0_f64.to_radians();
        let b = (-170.0_f64).to_radians();
        let crp = continuous_relative_phase(
            &[b.cos(), a.cos()],
            &[b.sin(), a.sin()],
            &[a.cos(), b.cos()],
            &[a.sin(), b.sin()],
        )
        .unwrap();
        assert!((crp[0] - 20.0).abs() < 1e-9);
        assert!((crp[1] - 340.0).abs() < 1e-9);
    }

    #[test]
    fn test_relative_phase_in_phase_is_zero() {
        let s = [0.5, -0.2, 0.9];
        let crp = continuous_relative_phase(&s, &s, &s, &s).unwrap();
        assert!(crp.iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn test_gradient() {
        assert_eq!(gradient(&[1.0, 2.0, 4.0, 7.0]), vec![1.0, 1.5, 2.5, 3.0]);
        assert_eq!(gradient(&[5.0]), vec![0.0]);
        assert!(gradient(&[]).is_empty());
    }
}
