//! JSON recording of vortex trajectories.
//!
//! Output layout:
//!
//! ```json
//! {
//!   "circulations": [-2.0, 2.0],
//!   "frames": [{"index": 0, "time": 0.0, "positions": [[x, y], ...], "field": {...}}]
//! }
//! ```
//!
//! `field` is only present when requested; masked cells serialize as `null`.

use leapfrog_core::{Frame, SimError, Visualizer};
use log::info;
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct FrameRecord {
    index: usize,
    time: f64,
    positions: Vec<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<Value>,
}

#[derive(Debug, Default, Serialize)]
struct Trajectory {
    circulations: Vec<f64>,
    frames: Vec<FrameRecord>,
}

/// Visualizer that accumulates frames and writes them as JSON on `finish()`.
pub struct TrajectoryRecorder {
    path: PathBuf,
    include_field: bool,
    trajectory: Trajectory,
}

impl TrajectoryRecorder {
    pub fn new(path: impl Into<PathBuf>, include_field: bool) -> Self {
        Self {
            path: path.into(),
            include_field,
            trajectory: Trajectory::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of frames recorded so far.
    pub fn len(&self) -> usize {
        self.trajectory.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectory.frames.is_empty()
    }

    /// The recording as a JSON value.
    pub fn to_json(&self) -> Result<Value, SimError> {
        serde_json::to_value(&self.trajectory).map_err(|e| SimError::Io(e.to_string()))
    }
}

impl Visualizer for TrajectoryRecorder {
    fn render(&mut self, frame: &Frame) -> Result<(), SimError> {
        if self.trajectory.frames.is_empty() {
            self.trajectory.circulations = frame.circulations.clone();
        }
        let field = if self.include_field {
            Some(serde_json::to_value(&frame.field).map_err(|e| SimError::Io(e.to_string()))?)
        } else {
            None
        };
        self.trajectory.frames.push(FrameRecord {
            index: frame.index,
            time: frame.time,
            positions: frame.positions.iter().map(|p| p.to_array()).collect(),
            field,
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SimError> {
        let file = File::create(&self.path)
            .map_err(|e| SimError::Io(format!("{}: {e}", self.path.display())))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.trajectory)
            .map_err(|e| SimError::Io(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| SimError::Io(format!("{}: {e}", self.path.display())))?;
        info!(
            "wrote {} frames to {}",
            self.trajectory.frames.len(),
            self.path.display()
        );
        Ok(())
    }
}
