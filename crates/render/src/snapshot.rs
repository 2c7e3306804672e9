//! CPU-side PNG rendering of a [`Frame`].
//!
//! This module is feature-gated behind `png` (default on) so consumers that
//! only need raw buffers or JSON can skip the `image` crate. The pixel buffer
//! conversion itself lives in [`crate::pixel`] (always available).

use crate::palette::Palette;
use crate::pixel::{frame_to_rgba, RenderOptions};
use leapfrog_core::{Frame, SimError, Visualizer};
use log::debug;
use std::path::{Path, PathBuf};

/// Writes a frame as a PNG image.
///
/// Returns `SimError::InvalidGrid` if the field dimensions overflow `u32`,
/// or `SimError::Io` on write failure.
pub fn write_png(
    frame: &Frame,
    palette: &Palette,
    options: &RenderOptions,
    path: &Path,
) -> Result<(), SimError> {
    let rgba = frame_to_rgba(frame, palette, options);
    let invalid = || SimError::InvalidGrid {
        resolution: frame.field.width(),
    };
    let w = u32::try_from(frame.field.width()).map_err(|_| invalid())?;
    let h = u32::try_from(frame.field.height()).map_err(|_| invalid())?;
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| SimError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| SimError::Io(e.to_string()))
}

/// Visualizer that writes every frame to `dir/frame_NNNN.png`.
pub struct PngSequence {
    dir: PathBuf,
    palette: Palette,
    options: RenderOptions,
    written: Vec<PathBuf>,
}

impl PngSequence {
    /// Creates `dir` if needed.
    pub fn new(
        dir: impl Into<PathBuf>,
        palette: Palette,
        options: RenderOptions,
    ) -> Result<Self, SimError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| SimError::Io(format!("{}: {e}", dir.display())))?;
        Ok(Self {
            dir,
            palette,
            options,
            written: Vec::new(),
        })
    }

    /// Paths written so far, in frame order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl Visualizer for PngSequence {
    fn render(&mut self, frame: &Frame) -> Result<(), SimError> {
        let path = self.dir.join(format!("frame_{:04}.png", frame.index));
        write_png(frame, &self.palette, &self.options, &path)?;
        debug!("wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }
}
