//! Configuration error types

use thiserror::Error;

/// Invalid widget configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Elastic snap-back time must be finite and non-negative
    #[error("Elasticity must be a finite, non-negative time in seconds, got {0}")]
    InvalidElasticity(f32),

    /// Velocity retained per second must be a fraction
    #[error("Deceleration rate must be within [0, 1], got {0}")]
    InvalidDecelerationRate(f32),

    /// Carousel pool size outside the supported range
    #[error("Carousel item count must be within 1..=9, got {0}")]
    ItemCountOutOfRange(usize),

    /// Carousel size falloff base outside the supported range
    #[error("Carousel size base must be within [0, 5], got {0}")]
    SizeBaseOutOfRange(f32),

    /// Carousel settle speed outside the supported range
    #[error("Carousel speed must be within 0..=10, got {0}")]
    SpeedOutOfRange(u32),

    /// Layout metrics that cannot produce a usable widget
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
}

/// Result type for configuration validation
pub type Result<T> = std::result::Result<T, ConfigError>;
