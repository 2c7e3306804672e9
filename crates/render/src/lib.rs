#![deny(unsafe_code)]
//! Frame consumers for the leapfrog simulator: CPU rendering (speed maps and
//! streamlines) and trajectory recording.
//!
//! This crate sits outside `leapfrog-core` (which owns the kinematics and the
//! `Visualizer` trait) and provides concrete visualizers. The CLI composes
//! them with [`Outputs`].

pub mod palette;
pub mod pixel;
pub mod streamline;
pub mod trajectory;

#[cfg(feature = "png")]
pub mod snapshot;

use leapfrog_core::{Frame, SimError, Visualizer};

pub use palette::{Palette, Rgb};
pub use pixel::{frame_to_rgba, FieldStyle, RenderOptions};
pub use streamline::{trace_streamlines, StreamlineOptions};
pub use trajectory::TrajectoryRecorder;

#[cfg(feature = "png")]
pub use snapshot::{write_png, PngSequence};

/// Fans every frame out to a list of visualizers, in order.
///
/// Stops at the first error.
#[derive(Default)]
pub struct Outputs {
    sinks: Vec<Box<dyn Visualizer>>,
}

impl Outputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: Box<dyn Visualizer>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Visualizer for Outputs {
    fn render(&mut self, frame: &Frame) -> Result<(), SimError> {
        self.sinks.iter_mut().try_for_each(|s| s.render(frame))
    }

    fn finish(&mut self) -> Result<(), SimError> {
        self.sinks.iter_mut().try_for_each(|s| s.finish())
    }
}
