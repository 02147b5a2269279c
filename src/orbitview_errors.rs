use thiserror::Error;

use crate::kepler::OrbitKind;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrbitViewError {
    // Configuration errors: the body cannot be built from its parameters.
    #[error("Required parameter '{0}' not found")]
    MissingParameter(&'static str),

    #[error("Invalid value for parameter '{name}': {value:?}")]
    InvalidParameter { name: &'static str, value: String },

    #[error("Orbit is parabolic, but 'q' not found")]
    ParabolicWithoutPerihelionDistance,

    #[error("Orbit is nearly parabolic (e = {0}), but 'T' not found")]
    NearParabolicWithoutPerihelionTime(f64),

    #[error("Too small perihelion distance: {0} AU")]
    PerihelionTooSmall(f64),

    #[error("Invalid orbit: {0}")]
    InvalidOrbit(String),

    // Convergence errors: the position at this epoch cannot be trusted.
    #[error("{kind:?} Kepler solver did not converge after {iterations} iterations")]
    KeplerNotConverged { kind: OrbitKind, iterations: usize },

    #[error("Playback task terminated abnormally: {0}")]
    PlaybackTaskFailed(String),
}

impl OrbitViewError {
    /// True for the errors raised while resolving orbital parameters.
    pub fn is_configuration(&self) -> bool {
        use OrbitViewError::*;
        matches!(
            self,
            MissingParameter(_)
                | InvalidParameter { .. }
                | ParabolicWithoutPerihelionDistance
                | NearParabolicWithoutPerihelionTime(_)
                | PerihelionTooSmall(_)
                | InvalidOrbit(_)
        )
    }

    /// True when a Kepler iteration exceeded its bound.
    pub fn is_convergence(&self) -> bool {
        matches!(self, OrbitViewError::KeplerNotConverged { .. })
    }
}
