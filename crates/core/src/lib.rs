#![deny(unsafe_code)]
//! Core types for the leapfrog point-vortex simulator.
//!
//! Provides `VortexSystem` (pairwise induction and explicit Euler stepping),
//! `FieldSampler` (masked velocity-field sampling on a `GridSpec`), the
//! `Simulation` driver with its `Visualizer` seam, named `Scenario` presets,
//! and JSON parameter helpers.

pub mod error;
pub mod field;
pub mod grid;
pub mod params;
pub mod sampler;
pub mod scenario;
pub mod simulation;
pub mod vortex;

pub use error::SimError;
pub use field::VelocityField;
pub use grid::GridSpec;
pub use sampler::{sample_field, FieldSampler};
pub use scenario::Scenario;
pub use simulation::{Frame, Simulation, SimulationParams, Visualizer};
pub use vortex::{Vortex, VortexSystem};
