//! Input boundary checks
//!
//! The core accepts any number; these checks run where raw input enters the
//! service so nonsensical plans are rejected with a clear error instead.

use super::error::{FuelingError, FuelingResult};

/// Body weight must be a finite, positive number
pub fn validate_weight(weight_kg: f64) -> FuelingResult<f64> {
    if weight_kg.is_finite() && weight_kg > 0.0 {
        Ok(weight_kg)
    } else {
        Err(FuelingError::InvalidInput {
            field: "weight_kg",
            value: weight_kg,
        })
    }
}

/// Calories burned must be a finite, non-negative number
pub fn validate_calories(calories_burned: f64) -> FuelingResult<f64> {
    if calories_burned.is_finite() && calories_burned >= 0.0 {
        Ok(calories_burned)
    } else {
        Err(FuelingError::InvalidInput {
            field: "calories_burned",
            value: calories_burned,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_weight() {
        assert_eq!(validate_weight(72.5), Ok(72.5));
        assert!(validate_weight(0.0).is_err());
        assert!(validate_weight(-3.0).is_err());
        assert!(validate_weight(f64::NAN).is_err());
        assert!(validate_weight(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_calories() {
        assert_eq!(validate_calories(0.0), Ok(0.0));
        assert_eq!(validate_calories(612.3), Ok(612.3));
        assert_eq!(
            validate_calories(-1.0),
            Err(FuelingError::InvalidInput { field: "calories_burned", value: -1.0 })
        );
        assert!(validate_calories(f64::NAN).is_err());
    }
}
