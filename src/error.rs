//! Error types for membrane.
//!
//! This module provides error types for configuration validation. The
//! per-tick hot path is infallible by design: anything that could make it
//! fail (a degenerate radius, an empty lookup table) is rejected or clamped
//! here, at construction time.

use std::fmt;

/// Errors that can occur while validating a membrane configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Radius is NaN, infinite, or below the minimum positive value.
    InvalidRadius(f32),
    /// Curve table resolution must be at least 1.
    ZeroTableResolution,
    /// A response curve needs at least one keyframe.
    EmptyCurve,
    /// The mesh has no vertices.
    EmptyMesh,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidRadius(r) => {
                write!(f, "Radius {} is not a positive finite value", r)
            }
            ConfigError::ZeroTableResolution => {
                write!(f, "Curve table resolution must be at least 1")
            }
            ConfigError::EmptyCurve => {
                write!(f, "Response curve needs at least one keyframe")
            }
            ConfigError::EmptyMesh => {
                write!(f, "Mesh has no vertices")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
