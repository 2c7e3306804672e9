//! Square sampling grid centred on the origin.

use crate::error::SimError;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A square domain `[-half_width, half_width]²` sampled at `resolution`
/// points per axis, endpoints included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    half_width: f64,
    resolution: usize,
}

impl GridSpec {
    /// Returns `SimError::InvalidGrid` if `resolution < 2` or the point count
    /// overflows `usize`, or `SimError::InvalidParameter` if `half_width` is
    /// not positive and finite.
    pub fn new(half_width: f64, resolution: usize) -> Result<Self, SimError> {
        if resolution < 2 || resolution.checked_mul(resolution).is_none() {
            return Err(SimError::InvalidGrid { resolution });
        }
        if !half_width.is_finite() || half_width <= 0.0 {
            return Err(SimError::invalid_parameter(
                "half_width",
                format!("must be positive and finite, got {half_width}"),
            ));
        }
        Ok(Self {
            half_width,
            resolution,
        })
    }

    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    /// Samples per axis.
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.resolution * self.resolution
    }

    /// Always false; a valid grid has at least 2×2 points.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Distance between adjacent samples.
    pub fn spacing(&self) -> f64 {
        2.0 * self.half_width / (self.resolution - 1) as f64
    }

    /// Coordinate of sample `i` along either axis.
    ///
    /// The last sample lands exactly on `half_width`.
    pub fn coordinate(&self, i: usize) -> f64 {
        if i + 1 == self.resolution {
            self.half_width
        } else {
            -self.half_width + i as f64 * self.spacing()
        }
    }

    /// World position of the grid point at column `col`, row `row`.
    pub fn point(&self, col: usize, row: usize) -> DVec2 {
        DVec2::new(self.coordinate(col), self.coordinate(row))
    }

    /// Iterates over all points as `(col, row, position)` in row-major order.
    pub fn points(&self) -> impl Iterator<Item = (usize, usize, DVec2)> + '_ {
        (0..self.resolution).flat_map(move |row| {
            (0..self.resolution).map(move |col| (col, row, self.point(col, row)))
        })
    }
}
