//! Error types for the cape simulation.
//!
//! Only configuration problems are errors. Numerical divergence is reported
//! through [`crate::world::StepOutcome`] instead, and degenerate collision
//! geometry is resolved in place.

use thiserror::Error;

/// Configuration error raised while building or reconfiguring the simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClothError {
    #[error("sample count {requested} outside supported range [{min}, {max}]")]
    InvalidSampleCount {
        requested: usize,
        min: usize,
        max: usize,
    },
    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(f32),
    #[error("total mass must be positive and finite, got {0}")]
    InvalidMass(f32),
    #[error("stiffness must be non-negative and finite, got {0}")]
    InvalidStiffness(f32),
    #[error("damping must be non-negative and finite, got {0}")]
    InvalidDamping(f32),
    #[error("wind magnitude and direction must be finite")]
    InvalidWind,
    #[error("gravity must be finite")]
    InvalidGravity,
    #[error("obstacle radius must be positive and finite, got {0}")]
    InvalidRadius(f32),
    #[error("obstacle {index} cannot be appended to a list of {len}")]
    ObstacleOutOfOrder { index: usize, len: usize },
    #[error("grid coordinate ({ku}, {kv}) outside {sample_count}x{sample_count} cloth")]
    CoordinateOutOfBounds {
        ku: usize,
        kv: usize,
        sample_count: usize,
    },
    #[error("joint index {index} out of range (skeleton has {count} joints)")]
    JointOutOfRange { index: usize, count: usize },
    #[error("cloth layout is degenerate: {0}")]
    InvalidLayout(&'static str),
}

/// Convenient Result alias for fallible cloth operations.
pub type Result<T> = std::result::Result<T, ClothError>;
