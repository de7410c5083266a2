//! Sport taxonomy and macro-ratio profiles
//!
//! One registry drives both goal eligibility (through the sport category)
//! and macro planning (through the ratio split).

use serde::{Deserialize, Serialize};

use super::error::{FuelingError, FuelingResult};
use super::goals::Goal;

/// Coarse sport archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SportCategory {
    Endurance,
    Power,
    Hybrid,
}

impl SportCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SportCategory::Endurance => "endurance",
            SportCategory::Power => "power",
            SportCategory::Hybrid => "hybrid",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "endurance" => Some(SportCategory::Endurance),
            "power" => Some(SportCategory::Power),
            "hybrid" => Some(SportCategory::Hybrid),
            _ => None,
        }
    }
}

/// Registered sports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sport {
    MarathonRunning = 0,
    TrackAndFieldDistance = 1,
    TrackAndFieldPower = 2,
    TrackAndFieldMid = 3,
}

impl Sport {
    pub const ALL: [Sport; 4] = [
        Sport::MarathonRunning,
        Sport::TrackAndFieldDistance,
        Sport::TrackAndFieldPower,
        Sport::TrackAndFieldMid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sport::MarathonRunning => "marathon_running",
            Sport::TrackAndFieldDistance => "track_and_field_distance",
            Sport::TrackAndFieldPower => "track_and_field_power",
            Sport::TrackAndFieldMid => "track_and_field_mid",
        }
    }

    /// Parse from string (trimmed, case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "marathon_running" => Some(Sport::MarathonRunning),
            "track_and_field_distance" => Some(Sport::TrackAndFieldDistance),
            "track_and_field_power" => Some(Sport::TrackAndFieldPower),
            "track_and_field_mid" => Some(Sport::TrackAndFieldMid),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Sport::MarathonRunning => "Marathon Running",
            Sport::TrackAndFieldDistance => "Track & Field (Distance)",
            Sport::TrackAndFieldPower => "Track & Field (Power)",
            Sport::TrackAndFieldMid => "Track & Field (Middle Distance)",
        }
    }

    /// The macro-ratio profile registered for this sport
    pub fn profile(&self) -> &'static SportProfile {
        &SPORT_PROFILES[*self as usize]
    }

    pub fn category(&self) -> SportCategory {
        self.profile().category
    }
}

/// Macro split for a sport, as integer percentages of replenishment kcal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SportProfile {
    pub sport: Sport,
    pub category: SportCategory,
    pub carb_ratio: u8,
    pub protein_ratio: u8,
    pub fat_ratio: u8,
    pub default_goal: Goal,
}

impl SportProfile {
    pub const fn ratio_sum(&self) -> u32 {
        self.carb_ratio as u32 + self.protein_ratio as u32 + self.fat_ratio as u32
    }
}

// Indexed by `Sport` discriminant
const PROFILES: [SportProfile; 4] = [
    SportProfile {
        sport: Sport::MarathonRunning,
        category: SportCategory::Endurance,
        carb_ratio: 60,
        protein_ratio: 20,
        fat_ratio: 20,
        default_goal: Goal::Maintain,
    },
    SportProfile {
        sport: Sport::TrackAndFieldDistance,
        category: SportCategory::Endurance,
        carb_ratio: 60,
        protein_ratio: 20,
        fat_ratio: 20,
        default_goal: Goal::Maintain,
    },
    SportProfile {
        sport: Sport::TrackAndFieldPower,
        category: SportCategory::Power,
        carb_ratio: 45,
        protein_ratio: 30,
        fat_ratio: 25,
        default_goal: Goal::Maintain,
    },
    SportProfile {
        sport: Sport::TrackAndFieldMid,
        category: SportCategory::Hybrid,
        carb_ratio: 50,
        protein_ratio: 25,
        fat_ratio: 25,
        default_goal: Goal::Maintain,
    },
];

const fn ratios_balanced(profiles: &[SportProfile]) -> bool {
    let mut i = 0;
    while i < profiles.len() {
        if profiles[i].ratio_sum() != 100 {
            return false;
        }
        i += 1;
    }
    true
}

const _: () = assert!(
    ratios_balanced(&PROFILES),
    "every sport profile must split exactly 100% of replenishment kcal"
);

/// Read-only sport registry
pub static SPORT_PROFILES: [SportProfile; 4] = PROFILES;

/// Look up the profile for a sport identifier
pub fn lookup(sport: &str) -> FuelingResult<&'static SportProfile> {
    Sport::from_str(sport)
        .map(|s| s.profile())
        .ok_or_else(|| FuelingError::UnknownSport(sport.to_string()))
}

/// Category of a sport identifier, `None` when the sport is not registered
pub fn classify(sport: &str) -> Option<SportCategory> {
    Sport::from_str(sport).map(|s| s.category())
}
