//! Fueling error types

use thiserror::Error;

/// Errors surfaced by the fueling core and its input boundary
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FuelingError {
    /// The sport is not one of the registered sport profiles
    #[error("Unknown sport profile: '{0}'. Valid sports: marathon_running, track_and_field_distance, track_and_field_power, track_and_field_mid")]
    UnknownSport(String),

    /// A numeric input failed a boundary check
    #[error("Invalid input for {field}: {value}")]
    InvalidInput { field: &'static str, value: f64 },

    /// A weight unit string could not be recognized
    #[error("Unknown weight unit: '{0}'. Valid units: kg, lb")]
    UnknownWeightUnit(String),
}

/// Result type for fueling operations
pub type FuelingResult<T> = Result<T, FuelingError>;
