//! Error types for the generation pipeline.

use mesh_kernel::{Axis, MeshError};
use thiserror::Error;

/// Out-of-range or contradictory configuration, detected before any mesh
/// work starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name}: minimum {min} is greater than maximum {max}")]
    InvertedRange { name: &'static str, min: f64, max: f64 },

    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidLength { name: &'static str, value: f32 },

    #[error("{name} must lie in [0, 1], got {value}")]
    Probability { name: &'static str, value: f64 },

    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("asymmetry_decay must lie in (0, 1], got {0}")]
    Decay(f32),
}

/// Mirror step failures. Always recovered by skipping that mirror.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SymmetryError {
    #[error("could not weld the {axis:?} mirror seam")]
    WeldFailure {
        axis: Axis,
        #[source]
        source: MeshError,
    },
}

/// Fatal errors: no mesh is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerateError {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    /// The hull or an asymmetry protrusion stayed degenerate after every
    /// resample.
    #[error("{stage} could not produce a valid segment after {retries} retries")]
    HullGeneration { stage: &'static str, retries: u32 },

    /// The finished mesh failed validation.
    #[error("generated mesh is invalid: {0}")]
    InvalidMesh(#[source] MeshError),

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts() {
        let err: GenerateError = ConfigError::Decay(2.0).into();
        assert!(matches!(err, GenerateError::Configuration(ConfigError::Decay(_))));
        assert!(err.to_string().contains("asymmetry_decay"));
    }

    #[test]
    fn weld_failure_keeps_source() {
        use std::error::Error as _;
        let err = SymmetryError::WeldFailure {
            axis: Axis::Y,
            source: MeshError::OpenSeam(3),
        };
        assert!(err.source().is_some());
    }
}
