//! Pure-computation pixel buffer conversion from a [`Frame`].
//!
//! This module is always available (no feature gate) so callers without the
//! `png` feature can still produce raw RGBA buffers.
//!
//! One grid cell becomes one pixel. Image row 0 is the top of the domain,
//! i.e. the largest y sample.

use crate::palette::{Palette, Rgb};
use crate::streamline::{trace_streamlines, StreamlineOptions};
use glam::DVec2;
use leapfrog_core::{Frame, GridSpec, VelocityField};

/// How the velocity field is drawn underneath the vortex markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStyle {
    /// Palette-mapped speed per cell.
    Speed,
    /// Streamlines over the background colour.
    Streamlines,
    /// Streamlines over the speed map.
    Both,
}

impl FieldStyle {
    fn speed(self) -> bool {
        matches!(self, FieldStyle::Speed | FieldStyle::Both)
    }

    fn streamlines(self) -> bool {
        matches!(self, FieldStyle::Streamlines | FieldStyle::Both)
    }
}

/// Appearance knobs for [`frame_to_rgba`].
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub style: FieldStyle,
    pub streamlines: StreamlineOptions,
    /// Compress speeds logarithmically so the far field stays visible.
    pub log_scale: bool,
    /// Colour of masked cells, and of every cell when the speed map is off.
    pub background: Rgb,
    /// Colour of the `+` drawn at each vortex centre.
    pub marker: Rgb,
    /// Arm length of the `+` in pixels.
    pub marker_arm: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            style: FieldStyle::Streamlines,
            streamlines: StreamlineOptions::default(),
            log_scale: true,
            background: Rgb::WHITE,
            marker: Rgb::BLACK,
            marker_arm: 4,
        }
    }
}

/// Maps a speed in `[0, max]` to a palette parameter in [0, 1].
fn normalize(speed: f64, max: f64, log_scale: bool) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    let t = (speed / max).clamp(0.0, 1.0);
    if log_scale {
        (1.0 + 99.0 * t).log10() / 2.0
    } else {
        t
    }
}

/// Pixel containing `position`, or `None` if it lies outside the domain.
pub fn pixel_of(grid: &GridSpec, position: DVec2) -> Option<(usize, usize)> {
    let n = grid.resolution();
    let to_index = |c: f64| {
        let i = ((c + grid.half_width()) / grid.spacing()).round();
        (i >= 0.0 && i < n as f64).then_some(i as usize)
    };
    let col = to_index(position.x)?;
    let row = to_index(position.y)?;
    Some((col, n - 1 - row))
}

/// Paints each line segment cell by cell, skipping masked cells.
fn draw_lines(rgba: &mut [u8], field: &VelocityField, lines: &[Vec<DVec2>], color: Rgb) {
    let (w, h) = (field.width(), field.height());
    let [r, g, b] = color.to_bytes();
    for line in lines {
        for pair in line.windows(2) {
            let (a, z) = (pair[0], pair[1]);
            let n = ((z - a).abs().max_element().ceil() as usize).max(1);
            for i in 0..=n {
                let p = a.lerp(z, i as f64 / n as f64).round();
                let (col, row) = (p.x as usize, p.y as usize);
                if col >= w || row >= h || field.is_masked(col, row) {
                    continue;
                }
                let idx = ((h - 1 - row) * w + col) * 4;
                rgba[idx..idx + 3].copy_from_slice(&[r, g, b]);
            }
        }
    }
}

/// Renders a frame's field (speed map and/or streamlines) and vortex markers
/// as an RGBA8 buffer of `width * height * 4` bytes.
pub fn frame_to_rgba(frame: &Frame, palette: &Palette, options: &RenderOptions) -> Vec<u8> {
    let field = &frame.field;
    let (w, h) = (field.width(), field.height());
    let max = field.max_speed().unwrap_or(0.0);
    let speeds: Vec<Option<f64>> = field.speeds().collect();

    let mut rgba = Vec::with_capacity(w * h * 4);
    for img_row in 0..h {
        let row = h - 1 - img_row;
        for speed in &speeds[row * w..(row + 1) * w] {
            let color = match speed {
                Some(s) if options.style.speed() => {
                    palette.sample(normalize(*s, max, options.log_scale))
                }
                _ => options.background,
            };
            let [r, g, b] = color.to_bytes();
            rgba.extend_from_slice(&[r, g, b, 255]);
        }
    }

    if options.style.streamlines() {
        let lines = trace_streamlines(field, &options.streamlines);
        draw_lines(&mut rgba, field, &lines, options.streamlines.color);
    }

    let [mr, mg, mb] = options.marker.to_bytes();
    let arm = options.marker_arm as isize;
    for &position in &frame.positions {
        let Some((px, py)) = pixel_of(&frame.grid, position) else {
            continue;
        };
        for d in -arm..=arm {
            for (x, y) in [(px as isize + d, py as isize), (px as isize, py as isize + d)] {
                if x >= 0 && y >= 0 && (x as usize) < w && (y as usize) < h {
                    let idx = (y as usize * w + x as usize) * 4;
                    rgba[idx..idx + 3].copy_from_slice(&[mr, mg, mb]);
                }
            }
        }
    }

    rgba
}
