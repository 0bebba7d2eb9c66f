//! Error types for collision_lab.

use thiserror::Error;

/// Reasons a run can be refused at start. Stepping itself never fails.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("masses must be positive.")]
    InvalidMass,

    #[error("initial velocities must differ.")]
    EqualVelocities,

    #[error("object 1 must be faster than object 2 to collide.")]
    WrongOrderVelocities,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid parameter: {0}")]
    Invalid(String),
}
