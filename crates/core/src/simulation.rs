//! The simulation driver and the `Visualizer` seam.
//!
//! A [`Simulation`] owns the vortex ensemble and the field sampler, and runs
//! the loop `sample → render → [step → sample → render] × steps`, handing
//! each immutable [`Frame`] to a [`Visualizer`]. The core never draws or
//! paces frames itself.

use crate::error::SimError;
use crate::field::VelocityField;
use crate::grid::GridSpec;
use crate::params::{param_f64, param_f64_any, param_string, param_usize, param_vortices};
use crate::sampler::FieldSampler;
use crate::scenario::Scenario;
use crate::vortex::VortexSystem;
use glam::DVec2;
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::{json, Value};

const DEFAULT_DT: f64 = 5.0;
const DEFAULT_STEPS: usize = 40;
const DEFAULT_HALF_WIDTH: f64 = 30.0;
const DEFAULT_RESOLUTION: usize = 360;
const DEFAULT_MASK_RADIUS: f64 = 1.0;
const DEFAULT_SCENARIO: &str = "leapfrog";

/// Time stepping and sampling parameters.
///
/// [`Default`] gives the classic leapfrog settings: dt = 5 over 40 steps on a
/// 360×360 grid spanning [-30, 30]², masking within radius 1 of each core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationParams {
    /// Euler time step.
    pub dt: f64,
    /// Number of steps performed by [`Simulation::run`].
    pub steps: usize,
    /// Half-width of the square sampling domain.
    pub half_width: f64,
    /// Grid samples per axis.
    pub resolution: usize,
    /// Cells closer than this to any vortex are masked.
    pub mask_radius: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT,
            steps: DEFAULT_STEPS,
            half_width: DEFAULT_HALF_WIDTH,
            resolution: DEFAULT_RESOLUTION,
            mask_radius: DEFAULT_MASK_RADIUS,
        }
    }
}

impl SimulationParams {
    /// Extracts parameters from a JSON object; missing keys take defaults.
    ///
    /// `ngrid` and `r_mask` are accepted as aliases for `half_width` and
    /// `mask_radius`. A key of the wrong type (say `"steps": -1`) is an
    /// `InvalidParameter` error. Ranges are checked by [`validate`](Self::validate).
    pub fn from_json(params: &Value) -> Result<Self, SimError> {
        Ok(Self {
            dt: param_f64(params, "dt", DEFAULT_DT)?,
            steps: param_usize(params, "steps", DEFAULT_STEPS)?,
            half_width: param_f64_any(params, &["half_width", "ngrid"], DEFAULT_HALF_WIDTH)?,
            resolution: param_usize(params, "resolution", DEFAULT_RESOLUTION)?,
            mask_radius: param_f64_any(params, &["mask_radius", "r_mask"], DEFAULT_MASK_RADIUS)?,
        })
    }

    /// Checks ranges; the grid and sampler constructors repeat their own checks.
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.dt.is_finite() {
            return Err(SimError::invalid_parameter(
                "dt",
                format!("must be finite, got {}", self.dt),
            ));
        }
        GridSpec::new(self.half_width, self.resolution)?;
        if !self.mask_radius.is_finite() || self.mask_radius < 0.0 {
            return Err(SimError::invalid_parameter(
                "mask_radius",
                format!("must be non-negative and finite, got {}", self.mask_radius),
            ));
        }
        Ok(())
    }

    /// Current values as a JSON object.
    pub fn to_json(&self) -> Value {
        json!({
            "dt": self.dt,
            "steps": self.steps,
            "half_width": self.half_width,
            "resolution": self.resolution,
            "mask_radius": self.mask_radius,
        })
    }

    /// Schema describing every parameter, its type, range, and default.
    pub fn schema() -> Value {
        json!({
            "scenario": {
                "type": "string",
                "default": DEFAULT_SCENARIO,
                "options": Scenario::list_names(),
                "description": "Named initial ensemble; ignored when 'vortices' is given"
            },
            "vortices": {
                "type": "array",
                "items": "[x, y, k]",
                "description": "Explicit initial ensemble of (x, y, circulation) triples"
            },
            "dt": {
                "type": "number",
                "default": DEFAULT_DT,
                "description": "Explicit Euler time step"
            },
            "steps": {
                "type": "integer",
                "default": DEFAULT_STEPS,
                "min": 0,
                "description": "Number of steps after the initial frame"
            },
            "half_width": {
                "type": "number",
                "default": DEFAULT_HALF_WIDTH,
                "min": 0.0,
                "aliases": ["ngrid"],
                "description": "Half-width of the square sampling domain"
            },
            "resolution": {
                "type": "integer",
                "default": DEFAULT_RESOLUTION,
                "min": 2,
                "description": "Grid samples per axis"
            },
            "mask_radius": {
                "type": "number",
                "default": DEFAULT_MASK_RADIUS,
                "min": 0.0,
                "aliases": ["r_mask"],
                "description": "Field samples closer than this to a vortex are undefined"
            }
        })
    }
}

/// One immutable snapshot of the simulation.
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    /// 0 for the initial state, then one per step.
    pub index: usize,
    pub time: f64,
    pub positions: Vec<DVec2>,
    /// Circulations in the same order as `positions`.
    pub circulations: Vec<f64>,
    pub field: VelocityField,
    /// Domain the field was sampled on.
    pub grid: GridSpec,
}

/// Consumer of simulation frames.
///
/// This trait is **object-safe** so drivers can hold `&mut dyn Visualizer`.
pub trait Visualizer {
    /// Called once per frame, in order, starting with the initial state.
    fn render(&mut self, frame: &Frame) -> Result<(), SimError>;

    /// Called once after the last frame. Does nothing by default.
    fn finish(&mut self) -> Result<(), SimError> {
        Ok(())
    }
}

/// A vortex ensemble together with the sampler that turns it into frames.
#[derive(Debug, Clone)]
pub struct Simulation {
    system: VortexSystem,
    sampler: FieldSampler,
    params: SimulationParams,
    step_index: usize,
}

impl Simulation {
    /// Returns an error if any parameter is out of range.
    pub fn new(system: VortexSystem, params: SimulationParams) -> Result<Self, SimError> {
        params.validate()?;
        let grid = GridSpec::new(params.half_width, params.resolution)?;
        let sampler = FieldSampler::new(grid, params.mask_radius)?;
        Ok(Self {
            system,
            sampler,
            params,
            step_index: 0,
        })
    }

    /// Creates a simulation from a JSON params object.
    ///
    /// An explicit `vortices` array takes precedence over `scenario`.
    pub fn from_json(json_params: &Value) -> Result<Self, SimError> {
        let params = SimulationParams::from_json(json_params)?;
        let system = match param_vortices(json_params, "vortices")? {
            Some(triples) => VortexSystem::from_triples(&triples)?,
            None => {
                let name = param_string(json_params, "scenario", DEFAULT_SCENARIO)?;
                Scenario::from_name(&name)?.build()?
            }
        };
        Self::new(system, params)
    }

    pub fn system(&self) -> &VortexSystem {
        &self.system
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn sampler(&self) -> &FieldSampler {
        &self.sampler
    }

    /// Steps taken so far.
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// Simulated time, `step_index * dt`.
    pub fn time(&self) -> f64 {
        self.step_index as f64 * self.params.dt
    }

    /// Samples the current state into a frame.
    pub fn snapshot(&self) -> Frame {
        Frame {
            index: self.step_index,
            time: self.time(),
            positions: self.system.positions(),
            circulations: self.system.circulations(),
            field: self.sampler.sample(&self.system),
            grid: *self.sampler.grid(),
        }
    }

    /// Performs one step and returns the resulting frame.
    ///
    /// Returns `SimError::NonFiniteState` if a vortex position became NaN or
    /// infinite, which happens when two vortices collide.
    pub fn advance(&mut self) -> Result<Frame, SimError> {
        self.system.step(self.params.dt);
        self.step_index += 1;
        if !self.system.is_finite() {
            warn!("vortex positions became non-finite at step {}", self.step_index);
            return Err(SimError::NonFiniteState {
                step: self.step_index,
            });
        }
        debug!(
            "step {}: t={} circulation={} impulse={}",
            self.step_index,
            self.time(),
            self.system.total_circulation(),
            self.system.linear_impulse()
        );
        Ok(self.snapshot())
    }

    /// Renders the current frame, then `params.steps` further frames.
    pub fn run(&mut self, visualizer: &mut dyn Visualizer) -> Result<(), SimError> {
        info!(
            "running {} vortices for {} steps (dt={}, grid {}x{})",
            self.system.len(),
            self.params.steps,
            self.params.dt,
            self.params.resolution,
            self.params.resolution
        );
        visualizer.render(&self.snapshot())?;
        for _ in 0..self.params.steps {
            let frame = self.advance()?;
            visualizer.render(&frame)?;
        }
        visualizer.finish()?;
        info!("finished at t={}", self.time());
        Ok(())
    }
}
