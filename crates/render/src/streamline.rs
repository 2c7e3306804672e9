//! Streamline tracing through a sampled [`VelocityField`].
//!
//! Seeds sit at the centres of a coarse occupancy grid. Each seed is
//! integrated forwards and backwards with a midpoint step along the
//! normalised, bilinearly interpolated velocity. A trace stops when it leaves
//! the grid, touches a masked cell, stalls, runs out of steps, or enters a
//! coarse cell already claimed by another trace.
//!
//! Points are in cell coordinates: `x` is the column, `y` the grid row.

use crate::palette::Rgb;
use glam::DVec2;
use leapfrog_core::VelocityField;

/// Seeds per axis at `density == 1.0`.
const BASE_SEEDS: f64 = 30.0;

#[derive(Debug, Clone, Copy)]
pub struct StreamlineOptions {
    /// Seed grid scale; `1.3` gives 39 seeds per axis.
    pub density: f64,
    /// Integration step, in cells.
    pub step: f64,
    /// Step limit per direction.
    pub max_steps: usize,
    pub color: Rgb,
}

impl Default for StreamlineOptions {
    fn default() -> Self {
        Self {
            density: 1.3,
            step: 0.25,
            max_steps: 2000,
            color: Rgb::CORNFLOWER,
        }
    }
}

/// Bilinear velocity at `p`, or `None` outside the grid or when any of the
/// four surrounding cells is masked.
pub fn interpolate(field: &VelocityField, p: DVec2) -> Option<DVec2> {
    let (w, h) = (field.width(), field.height());
    let inside = p.x >= 0.0 && p.y >= 0.0 && p.x <= (w - 1) as f64 && p.y <= (h - 1) as f64;
    if !inside {
        return None;
    }
    let c0 = (p.x.floor() as usize).min(w - 2);
    let r0 = (p.y.floor() as usize).min(h - 2);
    let fx = p.x - c0 as f64;
    let fy = p.y - r0 as f64;
    let bottom = field.get(c0, r0)?.lerp(field.get(c0 + 1, r0)?, fx);
    let top = field.get(c0, r0 + 1)?.lerp(field.get(c0 + 1, r0 + 1)?, fx);
    Some(bottom.lerp(top, fy))
}

fn direction(field: &VelocityField, p: DVec2, sign: f64) -> Option<DVec2> {
    interpolate(field, p)?.try_normalize().map(|d| d * sign)
}

/// One midpoint step; `None` if the step would land somewhere undefined.
fn advance(field: &VelocityField, p: DVec2, h: f64, sign: f64) -> Option<DVec2> {
    let k1 = direction(field, p, sign)?;
    let k2 = direction(field, p + k1 * (h / 2.0), sign)?;
    let next = p + k2 * h;
    interpolate(field, next).map(|_| next)
}

struct Occupancy {
    cells: Vec<bool>,
    n: usize,
    scale: DVec2,
}

impl Occupancy {
    fn new(field: &VelocityField, n: usize) -> Self {
        Self {
            cells: vec![false; n * n],
            n,
            scale: DVec2::new(
                n as f64 / (field.width() - 1) as f64,
                n as f64 / (field.height() - 1) as f64,
            ),
        }
    }

    fn cell(&self, p: DVec2) -> usize {
        let c = (p * self.scale).floor();
        let col = (c.x.max(0.0) as usize).min(self.n - 1);
        let row = (c.y.max(0.0) as usize).min(self.n - 1);
        row * self.n + col
    }

    /// Centre of coarse cell `idx`, in field cell coordinates.
    fn centre(&self, idx: usize) -> DVec2 {
        let col = (idx % self.n) as f64 + 0.5;
        let row = (idx / self.n) as f64 + 0.5;
        DVec2::new(col, row) / self.scale
    }
}

fn trace_one(
    field: &VelocityField,
    occupancy: &mut Occupancy,
    seed: DVec2,
    sign: f64,
    options: &StreamlineOptions,
) -> Vec<DVec2> {
    let mut points = Vec::new();
    let mut p = seed;
    let mut current = occupancy.cell(seed);
    for _ in 0..options.max_steps {
        let Some(next) = advance(field, p, options.step, sign) else {
            break;
        };
        let cell = occupancy.cell(next);
        if cell != current {
            if occupancy.cells[cell] {
                break;
            }
            occupancy.cells[cell] = true;
            current = cell;
        }
        points.push(next);
        p = next;
    }
    points
}

/// Traces streamlines over the whole field.
///
/// Every returned point has an unmasked bilinear stencil, so no line passes
/// through a masked cell. Lines shorter than two points are dropped.
pub fn trace_streamlines(field: &VelocityField, options: &StreamlineOptions) -> Vec<Vec<DVec2>> {
    let n = (BASE_SEEDS * options.density).round().max(1.0) as usize;
    let mut occupancy = Occupancy::new(field, n);
    let mut lines = Vec::new();

    for idx in 0..n * n {
        if occupancy.cells[idx] {
            continue;
        }
        let seed = occupancy.centre(idx);
        if interpolate(field, seed).is_none() {
            continue;
        }
        occupancy.cells[idx] = true;
        let forward = trace_one(field, &mut occupancy, seed, 1.0, options);
        let backward = trace_one(field, &mut occupancy, seed, -1.0, options);

        let mut line: Vec<DVec2> = backward.into_iter().rev().collect();
        line.push(seed);
        line.extend(forward);
        if line.len() >= 2 {
            lines.push(line);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use leapfrog_core::{Frame, Scenario, Simulation, SimulationParams, VortexSystem};

    fn snapshot(system: VortexSystem, half_width: f64, resolution: usize, mask_radius: f64) -> Frame {
        let params = SimulationParams {
            half_width,
            resolution,
            mask_radius,
            ..SimulationParams::default()
        };
        Simulation::new(system, params).unwrap().snapshot()
    }

    fn single_vortex() -> Frame {
        let system = VortexSystem::from_triples(&[(0.0, 0.0, 1.0)]).unwrap();
        snapshot(system, 10.0, 41, 3.0)
    }

    fn stencil_is_unmasked(field: &VelocityField, p: DVec2) -> bool {
        let c0 = (p.x.floor() as usize).min(field.width() - 2);
        let r0 = (p.y.floor() as usize).min(field.height() - 2);
        [(c0, r0), (c0 + 1, r0), (c0, r0 + 1), (c0 + 1, r0 + 1)]
            .iter()
            .all(|&(c, r)| !field.is_masked(c, r))
    }

    #[test]
    fn interpolation_matches_field_at_nodes() {
        let frame = single_vortex();
        let field = &frame.field;
        let v = interpolate(field, DVec2::new(30.0, 20.0)).unwrap();
        assert_eq!(Some(v), field.get(30, 20));
    }

    #[test]
    fn interpolation_averages_between_nodes() {
        let frame = single_vortex();
        let field = &frame.field;
        let mid = interpolate(field, DVec2::new(30.5, 20.0)).unwrap();
        let expected = (field.get(30, 20).unwrap() + field.get(31, 20).unwrap()) / 2.0;
        assert!((mid - expected).length() < 1e-12);
    }

    #[test]
    fn interpolation_is_undefined_outside_grid_or_near_mask() {
        let frame = single_vortex();
        let field = &frame.field;
        assert_eq!(interpolate(field, DVec2::new(-0.1, 3.0)), None);
        assert_eq!(interpolate(field, DVec2::new(3.0, 40.5)), None);
        assert_eq!(interpolate(field, DVec2::new(f64::NAN, 3.0)), None);
        // Cell (20, 20) is the masked vortex core.
        assert_eq!(interpolate(field, DVec2::new(19.5, 20.5)), None);
        assert!(interpolate(field, DVec2::new(40.0, 40.0)).is_some());
    }

    #[test]
    fn streamlines_never_enter_masked_cells() {
        let frame = snapshot(Scenario::Leapfrog.build().unwrap(), 30.0, 90, 3.0);
        let field = &frame.field;
        assert!(field.masked_count() > 0);

        let lines = trace_streamlines(field, &StreamlineOptions::default());
        assert!(!lines.is_empty());
        for line in &lines {
            for &p in line {
                assert!(stencil_is_unmasked(field, p), "point {p} touches a masked cell");
                assert!(!field.is_masked(p.x.round() as usize, p.y.round() as usize));
            }
        }
    }

    #[test]
    fn streamlines_around_a_single_vortex_are_circles() {
        let frame = single_vortex();
        let centre = DVec2::new(20.0, 20.0);
        let lines = trace_streamlines(&frame.field, &StreamlineOptions::default());
        assert!(!lines.is_empty());
        for line in lines.iter().filter(|l| l.len() > 8) {
            let radii: Vec<f64> = line.iter().map(|p| p.distance(centre)).collect();
            let min = radii.iter().copied().fold(f64::INFINITY, f64::min);
            let max = radii.iter().copied().fold(0.0, f64::max);
            // Lines clipped by the domain edge are arcs, still of constant radius.
            assert!((max - min) / max < 0.1, "radius varies from {min} to {max}");
        }
    }

    #[test]
    fn consecutive_points_are_one_step_apart() {
        let frame = single_vortex();
        let options = StreamlineOptions::default();
        for line in trace_streamlines(&frame.field, &options) {
            for pair in line.windows(2) {
                let d = pair[0].distance(pair[1]);
                assert!((d - options.step).abs() < 1e-6, "step length {d}");
            }
        }
    }

    #[test]
    fn fully_masked_field_has_no_streamlines() {
        let system = VortexSystem::from_triples(&[(0.0, 0.0, 1.0)]).unwrap();
        let frame = snapshot(system, 1.0, 8, 5.0);
        assert_eq!(frame.field.masked_count(), 64);
        assert!(trace_streamlines(&frame.field, &StreamlineOptions::default()).is_empty());
    }

    #[test]
    fn step_limit_bounds_line_length() {
        let frame = single_vortex();
        let options = StreamlineOptions {
            max_steps: 5,
            ..StreamlineOptions::default()
        };
        for line in trace_streamlines(&frame.field, &options) {
            assert!(line.len() <= 11);
        }
    }
}
