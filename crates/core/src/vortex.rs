//! Point vortices and the ensemble that advects them.
//!
//! Each vortex induces a velocity perpendicular to the separation vector with
//! magnitude `k / r` (2D Biot-Savart). The ensemble advances by explicit Euler
//! steps in which every vortex moves with the velocity induced by all the
//! others, evaluated at the pre-step positions.

use crate::error::SimError;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A single point vortex: a position and a signed circulation.
///
/// Positive circulation rotates counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vortex {
    pub position: DVec2,
    pub circulation: f64,
}

impl Vortex {
    pub fn new(x: f64, y: f64, circulation: f64) -> Self {
        Self {
            position: DVec2::new(x, y),
            circulation,
        }
    }

    /// Velocity this vortex induces at `query`.
    ///
    /// Singular when `query` equals the vortex position; the result is then
    /// NaN rather than a panic.
    pub fn induced_at(&self, query: DVec2) -> DVec2 {
        let d = query - self.position;
        d.perp() * (self.circulation / d.length_squared())
    }
}

/// An ordered, fixed-size ensemble of point vortices.
///
/// The length and circulations never change after construction; only
/// positions are updated by [`VortexSystem::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct VortexSystem {
    vortices: Vec<Vortex>,
}

impl VortexSystem {
    /// Creates an ensemble, rejecting empty input, non-finite values and
    /// vortices that share an exact position.
    pub fn new(vortices: Vec<Vortex>) -> Result<Self, SimError> {
        if vortices.is_empty() {
            return Err(SimError::EmptyEnsemble);
        }
        for (i, v) in vortices.iter().enumerate() {
            if !v.position.is_finite() {
                return Err(SimError::invalid_parameter(
                    "vortices",
                    format!("vortex {i} has a non-finite position"),
                ));
            }
            if !v.circulation.is_finite() {
                return Err(SimError::invalid_parameter(
                    "vortices",
                    format!("vortex {i} has a non-finite circulation"),
                ));
            }
        }
        for i in 0..vortices.len() {
            for j in (i + 1)..vortices.len() {
                if vortices[i].position == vortices[j].position {
                    return Err(SimError::CoincidentVortices {
                        first: i,
                        second: j,
                    });
                }
            }
        }
        Ok(Self { vortices })
    }

    /// Builds an ensemble from `(x, y, k)` triples.
    pub fn from_triples(triples: &[(f64, f64, f64)]) -> Result<Self, SimError> {
        Self::new(
            triples
                .iter()
                .map(|&(x, y, k)| Vortex::new(x, y, k))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.vortices.len()
    }

    /// Always false for a constructed ensemble.
    pub fn is_empty(&self) -> bool {
        self.vortices.is_empty()
    }

    pub fn vortices(&self) -> &[Vortex] {
        &self.vortices
    }

    /// Current positions in ensemble order.
    pub fn positions(&self) -> Vec<DVec2> {
        self.vortices.iter().map(|v| v.position).collect()
    }

    /// Circulations in ensemble order.
    pub fn circulations(&self) -> Vec<f64> {
        self.vortices.iter().map(|v| v.circulation).collect()
    }

    /// Velocity induced at `query` by every vortex except `exclude`.
    pub fn induced_velocity(&self, query: DVec2, exclude: Option<usize>) -> DVec2 {
        self.vortices
            .iter()
            .enumerate()
            .filter(|&(j, _)| Some(j) != exclude)
            .fold(DVec2::ZERO, |acc, (_, v)| acc + v.induced_at(query))
    }

    /// Advection velocity of each vortex: the velocity induced at its own
    /// position by all the other vortices.
    pub fn advection_velocities(&self) -> Vec<DVec2> {
        self.vortices
            .iter()
            .enumerate()
            .map(|(i, v)| self.induced_velocity(v.position, Some(i)))
            .collect()
    }

    /// Advances every vortex by one explicit Euler step of size `dt`.
    ///
    /// All velocities are computed before any position is written.
    pub fn step(&mut self, dt: f64) {
        let advection = self.advection_velocities();
        for (v, u) in self.vortices.iter_mut().zip(advection) {
            v.position += u * dt;
        }
    }

    /// Sum of circulations.
    pub fn total_circulation(&self) -> f64 {
        self.vortices.iter().map(|v| v.circulation).sum()
    }

    /// Circulation-weighted sum of positions, `Σ k·position`.
    pub fn linear_impulse(&self) -> DVec2 {
        self.vortices
            .iter()
            .fold(DVec2::ZERO, |acc, v| acc + v.position * v.circulation)
    }

    /// True while every position is finite.
    pub fn is_finite(&self) -> bool {
        self.vortices.iter().all(|v| v.position.is_finite())
    }
}
