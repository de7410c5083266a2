//! Fueling core
//!
//! Goal resolution and macro planning over the static sport registry.
//! Everything here is pure and safe to call concurrently.

pub mod error;
pub mod goals;
pub mod planner;
pub mod sports;
pub mod units;
pub mod validation;

pub use error::{FuelingError, FuelingResult};
pub use goals::{
    explain_goal, resolve_goal, resolve_goal_str, AthleteStats, Goal, GoalEligibility,
    GoalResolution, WEIGHT_THRESHOLD_KG,
};
pub use planner::{plan_session, recommend_macros, replenish_ratio, round_to, MacroPlan, SessionPlan};
pub use sports::{classify, lookup, Sport, SportCategory, SportProfile, SPORT_PROFILES};
pub use units::{parse_weight_kg, to_kilograms, WeightUnit};
pub use validation::{validate_calories, validate_weight};
