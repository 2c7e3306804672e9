//! Named initial vortex configurations.

use crate::error::SimError;
use crate::vortex::VortexSystem;

const SCENARIO_NAMES: &[&str] = &["leapfrog", "pair", "corotating"];

/// A named set of initial conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Two coaxial counter-rotating pairs that alternately pass through each other.
    Leapfrog,
    /// One counter-rotating pair translating along +x.
    Pair,
    /// Two equal vortices orbiting their midpoint.
    Corotating,
}

impl Scenario {
    /// Looks up a scenario by name.
    ///
    /// Returns `SimError::UnknownScenario` if the name is not recognized.
    pub fn from_name(name: &str) -> Result<Self, SimError> {
        match name {
            "leapfrog" => Ok(Scenario::Leapfrog),
            "pair" => Ok(Scenario::Pair),
            "corotating" => Ok(Scenario::Corotating),
            _ => Err(SimError::UnknownScenario(name.to_string())),
        }
    }

    pub fn list_names() -> &'static [&'static str] {
        SCENARIO_NAMES
    }

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Leapfrog => "leapfrog",
            Scenario::Pair => "pair",
            Scenario::Corotating => "corotating",
        }
    }

    /// Initial `(x, y, k)` triples.
    pub fn triples(&self) -> &'static [(f64, f64, f64)] {
        match self {
            Scenario::Leapfrog => &[
                (-28.0, -10.0, -2.0),
                (-28.0, 10.0, 2.0),
                (-20.0, -10.0, -2.0),
                (-20.0, 10.0, 2.0),
            ],
            Scenario::Pair => &[(0.0, -10.0, -2.0), (0.0, 10.0, 2.0)],
            Scenario::Corotating => &[(-5.0, 0.0, 2.0), (5.0, 0.0, 2.0)],
        }
    }

    pub fn build(&self) -> Result<VortexSystem, SimError> {
        VortexSystem::from_triples(self.triples())
    }
}
