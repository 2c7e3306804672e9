//! Sampled two-component velocity field with masked cells.
//!
//! A `VelocityField` stores `vel_x` and `vel_y` in row-major order with one
//! row per y sample. Cells near a vortex core are masked: they hold NaN in
//! both components and report `None` from [`VelocityField::get`].

use crate::grid::GridSpec;
use glam::DVec2;
use serde::Serialize;

/// A velocity field sampled on a rectangular grid.
#[derive(Debug, Clone, Serialize)]
pub struct VelocityField {
    width: usize,
    height: usize,
    vel_x: Vec<f64>,
    vel_y: Vec<f64>,
    masked: Vec<bool>,
}

impl VelocityField {
    /// Zero field shaped like `grid`. A `GridSpec` is already validated, so
    /// this cannot fail.
    pub(crate) fn for_grid(grid: &GridSpec) -> Self {
        let len = grid.len();
        Self {
            width: grid.resolution(),
            height: grid.resolution(),
            vel_x: vec![0.0; len],
            vel_y: vec![0.0; len],
            masked: vec![false; len],
        }
    }

    /// Samples per row (x axis).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows (y axis).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major x components; NaN where masked.
    pub fn vel_x(&self) -> &[f64] {
        &self.vel_x
    }

    /// Row-major y components; NaN where masked.
    pub fn vel_y(&self) -> &[f64] {
        &self.vel_y
    }

    /// Row-major mask flags.
    pub fn mask(&self) -> &[bool] {
        &self.masked
    }

    fn index(&self, col: usize, row: usize) -> usize {
        debug_assert!(col < self.width && row < self.height);
        row * self.width + col
    }

    /// Velocity at `(col, row)`, or `None` if the cell is masked.
    ///
    /// Panics if the coordinates are out of bounds.
    pub fn get(&self, col: usize, row: usize) -> Option<DVec2> {
        let idx = self.index(col, row);
        (!self.masked[idx]).then(|| DVec2::new(self.vel_x[idx], self.vel_y[idx]))
    }

    /// Writes a velocity, clearing the mask. Non-finite values mask the cell.
    pub(crate) fn set(&mut self, col: usize, row: usize, velocity: DVec2) {
        let idx = self.index(col, row);
        if velocity.is_finite() {
            self.vel_x[idx] = velocity.x;
            self.vel_y[idx] = velocity.y;
            self.masked[idx] = false;
        } else {
            self.mask_index(idx);
        }
    }

    /// Marks `(col, row)` undefined. There is no way to unmask a cell other
    /// than writing a fresh value with [`set`](Self::set).
    pub(crate) fn mask_cell(&mut self, col: usize, row: usize) {
        let idx = self.index(col, row);
        self.mask_index(idx);
    }

    fn mask_index(&mut self, idx: usize) {
        self.vel_x[idx] = f64::NAN;
        self.vel_y[idx] = f64::NAN;
        self.masked[idx] = true;
    }

    pub fn is_masked(&self, col: usize, row: usize) -> bool {
        self.masked[self.index(col, row)]
    }

    pub fn masked_count(&self) -> usize {
        self.masked.iter().filter(|&&m| m).count()
    }

    /// Speed per cell in row-major order, `None` where masked.
    pub fn speeds(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.vel_x
            .iter()
            .zip(&self.vel_y)
            .zip(&self.masked)
            .map(|((&vx, &vy), &m)| (!m).then(|| vx.hypot(vy)))
    }

    /// Largest speed over unmasked cells, or `None` if every cell is masked.
    pub fn max_speed(&self) -> Option<f64> {
        self.speeds().flatten().reduce(f64::max)
    }
}
