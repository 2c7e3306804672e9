//! Error types for the leapfrog core.

use thiserror::Error;

/// Errors produced by simulation setup and driver operations.
///
/// The kinematics themselves never fail: `VortexSystem::step` and the field
/// sampler propagate non-finite values instead. These variants cover invalid
/// initial conditions, invalid parameters and faults detected by the driver.
#[derive(Debug, Error)]
pub enum SimError {
    /// The sampling grid needs at least two samples per axis.
    #[error("invalid grid: resolution must be at least 2, got {resolution}")]
    InvalidGrid { resolution: usize },

    /// A numeric parameter was out of range or not finite.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The vortex ensemble had no members.
    #[error("vortex ensemble must contain at least one vortex")]
    EmptyEnsemble,

    /// Two distinct vortices share an exact position.
    #[error("vortices {first} and {second} coincide")]
    CoincidentVortices { first: usize, second: usize },

    /// A vortex position became NaN or infinite during a step.
    #[error("non-finite vortex position after step {step}")]
    NonFiniteState { step: usize },

    /// A scenario name was not recognized.
    #[error("unknown scenario: {0}")]
    UnknownScenario(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A palette could not be constructed from the given colors.
    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    /// A visualizer failed to write its output.
    #[error("I/O error: {0}")]
    Io(String),
}

impl SimError {
    /// Shorthand for an [`SimError::InvalidParameter`].
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        SimError::InvalidParameter {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}
