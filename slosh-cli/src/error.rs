//! Error types for the slosh CLI.

use slosh_core::{ParamError, SimError};
use thiserror::Error;

/// CLI result type alias.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// Parameter rejected during startup validation.
    #[error("{0}")]
    Param(#[from] ParamError),

    /// Simulation could not be built (bad domain, allocation failure).
    #[error("{0}")]
    Sim(#[from] SimError),

    /// Terminal or stdout failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stats row could not be encoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
