//! Geometry Module: Points, Clouds and Phase-Space Preparation
//!
//! All point clouds in this crate are planar: each point is a sample of a
//! 2-D phase-space trajectory. Distances are Euclidean throughout.

mod point;
pub mod phase;

pub use point::{euclidean, Point, PointCloud};
