//! Error type for the `leapfrog` binary.
//!
//! | code | meaning |
//! |------|---------|
//! | 0  | run finished |
//! | 2  | bad command line (reported by clap) |
//! | 10 | simulation rejected its input or diverged |
//! | 11 | a frame or trajectory could not be written |
//! | 12 | unknown scenario or palette, malformed `--params` |
//! | 13 | summary could not be serialized |

use leapfrog_core::SimError;
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    Sim(SimError),
    Io(String),
    Input(String),
    Serialization(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Sim(_) => 10,
            Self::Io(_) => 11,
            Self::Input(_) => 12,
            Self::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sim(e) => write!(f, "{e}"),
            Self::Io(msg) => write!(f, "cannot write output: {msg}"),
            Self::Input(msg) => f.write_str(msg),
            Self::Serialization(msg) => write!(f, "cannot serialize summary: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Output failures become exit code 11; a bad name the user typed becomes 12.
impl From<SimError> for CliError {
    fn from(e: SimError) -> Self {
        match e {
            SimError::Io(msg) => Self::Io(msg),
            SimError::UnknownScenario(_) | SimError::InvalidPalette(_) | SimError::InvalidColor(_) => {
                Self::Input(e.to_string())
            }
            other => Self::Sim(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
