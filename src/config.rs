//! Pipeline configuration.
//!
//! Values can be built in code or read from TOML:
//!
//! ```toml
//! landmark_count = 10
//! top_k_intervals = 3
//!
//! [scale]
//! start = 0.0
//! stop = 3.0
//! step = 0.01
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TdaError};

/// Seed of the first-landmark draw when none is configured.
pub const DEFAULT_LANDMARK_SEED: u64 = 1;

/// Largest number of scale values a sweep may visit.
pub const MAX_SWEEP_LEN: usize = 1_000_000;

/// Scale sweep of a Vietoris-Rips filtration.
///
/// The sweep is inclusive of `stop`: it visits `start + i * step` for
/// `i in 0..ceil((stop + step - start) / step)`, so the final value may
/// overshoot `stop` by less than one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleSweep {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl Default for ScaleSweep {
    fn default() -> Self {
        Self {
            start: 0.0,
            stop: 3.0,
            step: 0.01,
        }
    }
}

impl ScaleSweep {
    /// Create a validated sweep
    pub fn new(start: f64, stop: f64, step: f64) -> Result<Self> {
        let sweep = Self { start, stop, step };
        sweep.validate()?;
        Ok(sweep)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.start.is_finite() && self.stop.is_finite() && self.step.is_finite()) {
            return Err(TdaError::invalid("scale bounds must be finite"));
        }
        if self.step <= 0.0 {
            return Err(TdaError::invalid(format!(
                "scale step must be positive, got {}",
                self.step
            )));
        }
        if self.stop < self.start {
            return Err(TdaError::invalid(format!(
                "scale stop {} is below start {}",
                self.stop, self.start
            )));
        }
        if self.checked_len().is_none() {
            return Err(TdaError::invalid(format!(
                "scale sweep {} .. {} step {} visits more than {MAX_SWEEP_LEN} values",
                self.start, self.stop, self.step
            )));
        }
        Ok(())
    }

    /// Number of scale values, `None` past `MAX_SWEEP_LEN`
    fn checked_len(&self) -> Option<usize> {
        let count = ((self.stop + self.step - self.start) / self.step).ceil().max(0.0);
        if count.is_finite() && count <= MAX_SWEEP_LEN as f64 {
            Some(count as usize)
        } else {
            None
        }
    }

    /// Number of scale values visited; zero for a sweep that fails validation
    pub fn len(&self) -> usize {
        self.checked_len().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scale value at sweep position `i`
    pub fn value_at(&self, i: usize) -> f64 {
        self.start + i as f64 * self.step
    }

    /// Ascending scale values.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).map(move |i| self.value_at(i))
    }
}

/// Parameters of the per-trial homology pipeline and the cross-trial comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of landmarks kept from each cloud
    pub landmark_count: usize,
    /// Filtration scale sweep
    pub scale: ScaleSweep,
    /// Longest intervals compared per diagram
    pub top_k_intervals: usize,
    /// Seed of the PRNG drawing the first landmark
    pub landmark_seed: u64,
    /// Normalized distance below which two trials are adjacent
    pub adjacency_threshold: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            landmark_count: 10,
            scale: ScaleSweep::default(),
            top_k_intervals: 3,
            landmark_seed: DEFAULT_LANDMARK_SEED,
            adjacency_threshold: 0.5,
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| TdaError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.landmark_count == 0 {
            return Err(TdaError::invalid("landmark_count must be at least 1"));
        }
        if self.top_k_intervals == 0 {
            return Err(TdaError::invalid("top_k_intervals must be at least 1"));
        }
        if !(self.adjacency_threshold > 0.0 && self.adjacency_threshold <= 1.0) {
            return Err(TdaError::invalid(format!(
                "adjacency_threshold must lie in (0, 1], got {}",
                self.adjacency_threshold
            )));
        }
        self.scale.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_is_inclusive() {
        let sweep = ScaleSweep::new(0.0, 1.0, 0.25).unwrap();
        let values: Vec<f64> = sweep.values().collect();
        assert_eq!(values, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_sweep_overshoots_stop() {
        // 0.0, 0.4, 0.8, 1.2: the last value passes stop by less than a step
        let sweep = ScaleSweep::new(0.0, 1.0, 0.4).unwrap();
        assert_eq!(sweep.len(), 4);
        assert!((sweep.value_at(3) - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_sweep_rejects_bad_bounds() {
        assert!(matches!(ScaleSweep::new(0.0, 1.0, 0.0), Err(TdaError::InvalidParameter(_))));
        assert!(matches!(ScaleSweep::new(0.0, 1.0, -0.1), Err(TdaError::InvalidParameter(_))));
        assert!(matches!(ScaleSweep::new(2.0, 1.0, 0.1), Err(TdaError::InvalidParameter(_))));
    }

    #[test]
    fn test_default_sweep_length() {
        // arange(0, 3.01, 0.01)
        let sweep = ScaleSweep::default();
        assert_eq!(sweep.len(), 301);
        assert_eq!(sweep.value_at(0), 0.0);
        assert!((sweep.value_at(300) - 3.0).abs() < 1e-12);
        assert_eq!(sweep.values().count(), 301);
    }

    #[test]
    fn test_sweep_rejects_too_many_steps() {
        assert!(matches!(
            ScaleSweep::new(0.0, 3.0, 1e-300),
            Err(TdaError::InvalidParameter(_))
        ));
        assert!(matches!(
            PipelineConfig::from_toml_str("[scale]\nstep = 1e-300"),
            Err(TdaError::InvalidParameter(_))
        ));

        let unchecked = ScaleSweep { start: 0.0, stop: 3.0, step: 1e-300 };
        assert_eq!(unchecked.len(), 0);
        assert!(ScaleSweep::new(0.0, 1.0, 1e-5).is_ok());
    }

    #[test]
    fn test_toml_partial_override() {
        let config = PipelineConfig::from_toml_str(
            r#"
            landmark_count = 12

            [scale]
            stop = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(config.landmark_count, 12);
        assert_eq!(config.scale.stop, 2.0);
        assert_eq!(config.scale.step, 0.01);
        assert_eq!(config.top_k_intervals, 3);
    }

    #[test]
    fn test_toml_rejects_invalid() {
        assert!(matches!(
            PipelineConfig::from_toml_str("landmark_count = 0"),
            Err(TdaError::InvalidParameter(_))
        ));
        assert!(matches!(
            PipelineConfig::from_toml_str("landmark_count = \"ten\""),
            Err(TdaError::Config(_))
        ));
    }
}
