//! Error types for the sloshing core.

use thiserror::Error;

/// Result type alias for core operations.
pub type SimResult<T> = Result<T, SimError>;

/// A parameter that failed validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("dt must be > 0 (got {0})")]
    TimeStep(f32),

    #[error("speed_sq must be > 0 (got {0})")]
    WaveSpeed(f32),

    #[error("damping must be >= 0.0 (got {0})")]
    Damping(f32),

    #[error("level must be 0.0-1.0 (got {0})")]
    Level(f32),

    #[error("tilt must be 0.0-1.0 (got {0})")]
    Tilt(f32),

    #[error("sleep ms must be >= 0 (got {0})")]
    FrameDelay(i64),

    #[error("{name} must be a finite number")]
    NonFinite { name: &'static str },

    /// Only produced when stability is enforced.
    #[error("(speed_sq * dt^2) = {metric:.3} exceeds the stability limit of {limit}")]
    Unstable { metric: f32, limit: f32 },
}

/// Errors raised while building or running a simulation.
#[derive(Error, Debug)]
pub enum SimError {
    /// Configuration rejected before the simulation starts.
    #[error("invalid parameter: {0}")]
    InvalidParam(#[from] ParamError),

    /// Zero-sized domain.
    #[error("invalid domain {width}x{height}: both dimensions must be positive")]
    InvalidDomain { width: usize, height: usize },

    /// The grid buffers could not be obtained.
    #[error("memory allocation failed for a {width}x{height} grid")]
    Allocation { width: usize, height: usize },
}
