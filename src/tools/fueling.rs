//! Fueling tools
//!
//! Goal resolution and macro planning behind the input boundary: weights
//! are converted to kilograms and numeric inputs are checked before the
//! pure core runs.

use serde::Serialize;
use thiserror::Error;

use crate::db::Database;
use crate::fueling::{
    self, parse_weight_kg, FuelingError, validate_calories, validate_weight, AthleteStats, Goal, MacroPlan,
    SessionPlan, SPORT_PROFILES, WEIGHT_THRESHOLD_KG,
};
use crate::models::{SessionLogCreate, SessionLogEntry};

// ============================================================================
// Response Structs
// ============================================================================

/// Response for resolve_goal
#[derive(Debug, Serialize)]
pub struct ResolveGoalResponse {
    pub athlete_id: String,
    pub weight_kg: f64,
    pub sport: String,
    pub requested_goal: String,
    pub resolved_goal: Goal,
    pub fell_back: bool,
    pub allowed_goals: Vec<Goal>,
}

/// Response for plan_session
#[derive(Debug, Serialize)]
pub struct PlanSessionResponse {
    #[serde(flatten)]
    pub session: SessionPlan,
    /// Session log entry ID when the plan was logged
    pub logged_session_id: Option<i64>,
}

/// One registered sport
#[derive(Debug, Serialize)]
pub struct SportSummary {
    pub sport: &'static str,
    pub display_name: &'static str,
    pub category: &'static str,
    pub carb_ratio: u8,
    pub protein_ratio: u8,
    pub fat_ratio: u8,
    pub default_goal: Goal,
    pub bulking_allowed: bool,
}

/// Response for list_sports
#[derive(Debug, Serialize)]
pub struct ListSportsResponse {
    pub sports: Vec<SportSummary>,
    pub goals: Vec<Goal>,
    pub weight_threshold_kg: f64,
}

/// Failure of plan_session, split by whose fault it is
#[derive(Error, Debug)]
pub enum PlanSessionError {
    /// The caller's inputs were rejected
    #[error("{0}")]
    Invalid(#[from] FuelingError),

    /// The plan was computed but could not be logged
    #[error("Failed to log session: {0}")]
    Storage(#[from] crate::db::DbError),
}

// ============================================================================
// Tool Functions
// ============================================================================

/// Build checked athlete stats, converting the weight to kilograms
pub fn athlete_stats(
    athlete_id: &str,
    age_years: f64,
    height_cm: f64,
    weight: f64,
    weight_unit: Option<&str>,
) -> Result<AthleteStats, String> {
    let weight_kg = parse_weight_kg(weight, weight_unit.unwrap_or("kg")).map_err(|e| e.to_string())?;
    let weight_kg = validate_weight(weight_kg).map_err(|e| e.to_string())?;

    Ok(AthleteStats::new(athlete_id, age_years, height_cm, weight_kg))
}

/// Resolve an athlete's requested goal
pub fn resolve_goal(
    athlete_id: &str,
    age_years: f64,
    height_cm: f64,
    weight: f64,
    weight_unit: Option<&str>,
    goal: &str,
    sport: &str,
) -> Result<ResolveGoalResponse, String> {
    let stats = athlete_stats(athlete_id, age_years, height_cm, weight, weight_unit)?;
    let resolution = fueling::explain_goal(&stats, goal, sport);

    Ok(ResolveGoalResponse {
        athlete_id: resolution.athlete_id,
        weight_kg: stats.weight_kg,
        sport: sport.to_string(),
        requested_goal: resolution.requested,
        resolved_goal: resolution.resolved,
        fell_back: resolution.fell_back,
        allowed_goals: resolution.allowed_goals,
    })
}

/// Compute a macro plan for an already resolved goal
pub fn recommend_macros(calories_burned: f64, sport: &str, goal: &str) -> Result<MacroPlan, String> {
    let calories_burned = validate_calories(calories_burned).map_err(|e| e.to_string())?;
    fueling::recommend_macros(calories_burned, sport, goal).map_err(|e| e.to_string())
}

/// Resolve the goal and plan macros, appending the result to the session log
/// when a database is given
pub fn plan_session(
    log_to: Option<&Database>,
    stats: &AthleteStats,
    goal: &str,
    sport: &str,
    calories_burned: f64,
) -> Result<PlanSessionResponse, PlanSessionError> {
    let calories_burned = validate_calories(calories_burned)?;
    let session = fueling::plan_session(stats, goal, sport, calories_burned)?;

    let logged_session_id = match log_to {
        Some(db) => {
            let entry = db.with_conn(|conn| {
                SessionLogEntry::append(conn, &SessionLogCreate::from_plan(&session, None))
            })?;
            Some(entry.id)
        }
        None => None,
    };

    Ok(PlanSessionResponse {
        session,
        logged_session_id,
    })
}

/// List registered sports with their macro splits
pub fn list_sports() -> ListSportsResponse {
    let sports = SPORT_PROFILES
        .iter()
        .map(|p| SportSummary {
            sport: p.sport.as_str(),
            display_name: p.sport.display_name(),
            category: p.category.as_str(),
            carb_ratio: p.carb_ratio,
            protein_ratio: p.protein_ratio,
            fat_ratio: p.fat_ratio,
            default_goal: p.default_goal,
            bulking_allowed: fueling::GoalEligibility::for_athlete(0.0, p.sport.as_str()).bulking,
        })
        .collect();

    ListSportsResponse {
        sports,
        goals: Goal::ALL.to_vec(),
        weight_threshold_kg: WEIGHT_THRESHOLD_KG,
    }
}
