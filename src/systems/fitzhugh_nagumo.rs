//! FitzHugh-Nagumo Oscillator: Synthetic Phase-Space Trajectories
//!
//! The FitzHugh-Nagumo model is a 2D excitable system:
//!
//!   dv/dt = v - v³/3 - w + I_ext
//!   dw/dt = ε(v + a - b·w)
//!
//! where:
//! - v: fast variable
//! - w: slow recovery variable
//! - ε: timescale separation (small, ~0.08)
//! - a, b: shape parameters
//! - I_ext: external drive (control parameter)
//!
//! ## Topological Signatures
//!
//! - **Resting** (I_ext below the Hopf point): the (v, w) trajectory
//!   collapses to a point, so its diagram holds only short intervals
//! - **Spiking** (I_ext above it): the trajectory settles on a limit cycle
//!   and the diagram carries one long-lived loop
//!
//! Sampled (v, w) trajectories stand in for recorded joint phase spaces
//! when no recordings are at hand.
//!
//! ## References
//!
//! - FitzHugh, R. (1961). Impulses and physiological states in theoretical
//!   models of nerve membrane. Biophysical Journal, 1(6), 445-466.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{Result, TdaError};
use crate::geometry::{Point, PointCloud};

/// Single FitzHugh-Nagumo oscillator integrated with RK4
#[derive(Debug, Clone)]
pub struct FitzHughNagumo {
    /// Fast variable
    v: f64,
    /// Recovery variable
    w: f64,
    /// Timescale separation ε
    epsilon: f64,
    a: f64,
    b: f64,
    /// External drive
    i_ext: f64,
    /// Integration timestep
    dt: f64,
    time: f64,
}

impl FitzHughNagumo {
    /// Oscillator with the standard parameters ε = 0.08, a = 0.7, b = 0.8
    pub fn new(i_ext: f64) -> Self {
        Self::with_params(i_ext, 0.08, 0.7, 0.8)
    }

    pub fn with_params(i_ext: f64, epsilon: f64, a: f64, b: f64) -> Self {
        Self {
            v: -1.0,
            w: -0.5,
            epsilon,
            a,
            b,
            i_ext,
            dt: 0.05,
            time: 0.0,
        }
    }

    /// Start from `(v, w)` instead of the default resting point
    pub fn with_initial_state(mut self, v: f64, w: f64) -> Self {
        self.v = v;
        self.w = w;
        self
    }

    pub fn with_timestep(mut self, dt: f64) -> Result<Self> {
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(TdaError::invalid(format!("timestep must be positive, got {dt}")));
        }
        self.dt = dt;
        Ok(self)
    }

    pub fn state(&self) -> (f64, f64) {
        (self.v, self.w)
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn current(&self) -> f64 {
        self.i_ext
    }

    pub fn set_current(&mut self, i_ext: f64) {
        self.i_ext = i_ext;
    }

    fn derivatives(&self, v: f64, w: f64) -> (f64, f64) {
        let dv = v - v.powi(3) / 3.0 - w + self.i_ext;
        let dw = self.epsilon * (v + self.a - self.b * w);
        (dv, dw)
    }

    /// One RK4 step
    pub fn step(&mut self) {
        let dt = self.dt;
        let (v, w) = (self.v, self.w);

        let (k1v, k1w) = self.derivatives(v, w);
        let (k2v, k2w) = self.derivatives(v + k1v * dt / 2.0, w + k1w * dt / 2.0);
        let (k3v, k3w) = self.derivatives(v + k2v * dt / 2.0, w + k2w * dt / 2.0);
        let (k4v, k4w) = self.derivatives(v + k3v * dt, w + k3w * dt);

        self.v = v + (k1v + 2.0 * k2v + 2.0 * k3v + k4v) * dt / 6.0;
        self.w = w + (k1w + 2.0 * k2w + 2.0 * k3w + k4w) * dt / 6.0;
        self.time += dt;
    }

    pub fn run(&mut self, steps: usize) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Record `n` states, integrating `stride` steps between samples
    pub fn trajectory(&mut self, n: usize, stride: usize) -> Result<PointCloud> {
        self.sample(n, stride, |v, w| Point::new(v, w))
    }

    /// Like [`trajectory`](Self::trajectory), with Gaussian measurement
    /// noise of standard deviation `noise_std` added to every coordinate
    pub fn noisy_trajectory<R: Rng + ?Sized>(
        &mut self,
        n: usize,
        stride: usize,
        noise_std: f64,
        rng: &mut R,
    ) -> Result<PointCloud> {
        if !(noise_std >= 0.0 && noise_std.is_finite()) {
            return Err(TdaError::invalid(format!(
                "noise level must be finite and non-negative, got {noise_std}"
            )));
        }
        let normal = Normal::new(0.0, noise_std)
            .map_err(|e| TdaError::invalid(format!("noise level {noise_std}: {e}")))?;
        self.sample(n, stride, |v, w| {
            Point::new(v + normal.sample(rng), w + normal.sample(rng))
        })
    }

    fn sample(
        &mut self,
        n: usize,
        stride: usize,
        mut observe: impl FnMut(f64, f64) -> Point,
    ) -> Result<PointCloud> {
        if n == 0 || stride == 0 {
            return Err(TdaError::invalid(
                "trajectory needs at least one sample and a positive stride",
            ));
        }
        let mut points = Vec::with_capacity(n);
        for _ in 0..n {
            self.run(stride);
            points.push(observe(self.v, self.w));
        }
        PointCloud::new(points)
    }
}
