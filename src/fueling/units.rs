//! Body weight units
//!
//! The fueling core works in kilograms. Pound readings are converted here,
//! before they reach goal resolution.

use serde::{Deserialize, Serialize};

use super::error::{FuelingError, FuelingResult};

/// Kilograms per pound
pub const KG_PER_LB: f64 = 0.453592;

/// Unit a body weight reading was taken in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kilograms,
    Pounds,
}

impl WeightUnit {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "kg" | "kgs" | "kilogram" | "kilograms" => Some(WeightUnit::Kilograms),
            "lb" | "lbs" | "pound" | "pounds" => Some(WeightUnit::Pounds),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Kilograms => "kg",
            WeightUnit::Pounds => "lb",
        }
    }

    /// Conversion factor to kilograms
    pub fn kg_factor(&self) -> f64 {
        match self {
            WeightUnit::Kilograms => 1.0,
            WeightUnit::Pounds => KG_PER_LB,
        }
    }
}

/// Convert a weight reading to kilograms
pub fn to_kilograms(value: f64, unit: WeightUnit) -> f64 {
    value * unit.kg_factor()
}

/// Convert a weight reading given with a unit string to kilograms
pub fn parse_weight_kg(value: f64, unit: &str) -> FuelingResult<f64> {
    let unit = WeightUnit::from_str(unit)
        .ok_or_else(|| FuelingError::UnknownWeightUnit(unit.to_string()))?;
    Ok(to_kilograms(value, unit))
}
