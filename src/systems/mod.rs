//! Dynamical Systems Module: Synthetic Phase-Space Trajectories
//!
//! - **FitzHugh-Nagumo**: excitable oscillator whose (v, w) trajectory is
//!   a point for sub-threshold drive and a limit cycle above it
//!
//! Trajectories feed the pipeline in place of recorded joint phase spaces.

mod fitzhugh_nagumo;

pub use fitzhugh_nagumo::FitzHughNagumo;
