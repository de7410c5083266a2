//! Macro planning
//!
//! Turns a calories-burned estimate into a per-macronutrient replenishment
//! plan using the sport's macro split and the goal's replenish ratio.

use serde::{Deserialize, Serialize};

use super::error::FuelingResult;
use super::goals::{explain_goal, AthleteStats, Goal, GoalResolution};
use super::sports::{lookup, SportCategory, SportProfile};

/// Atwater factors
pub const KCAL_PER_GRAM_CARB: f64 = 4.0;
pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Post-session nutrition plan. Every numeric field is rounded to one decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroPlan {
    pub total_kcal_to_replenish: f64,
    pub carbs_g: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbs_kcal: f64,
    pub protein_kcal: f64,
    pub fat_kcal: f64,
    pub profile_type: SportCategory,
    pub goal: String,
}

impl MacroPlan {
    /// Sum of the per-macro kcal, equal to the replenish total within 0.1
    pub fn macro_kcal_sum(&self) -> f64 {
        self.carbs_kcal + self.protein_kcal + self.fat_kcal
    }
}

/// Replenish ratio for a goal string, 1.0 for anything unrecognized
pub fn replenish_ratio(goal: &str) -> f64 {
    Goal::from_str(goal).map_or(1.0, |g| g.replenish_ratio())
}

/// Round to `decimals` places from the exact stored value, ties to even.
/// 105.14999... stays 105.1 even though it prints as 105.15.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

fn round1(value: f64) -> f64 {
    round_to(value, 1)
}

fn build_plan(calories_burned: f64, profile: &SportProfile, goal: &str) -> MacroPlan {
    let total = calories_burned * replenish_ratio(goal);

    let carbs_kcal = total * (profile.carb_ratio as f64 / 100.0);
    let protein_kcal = total * (profile.protein_ratio as f64 / 100.0);
    let fat_kcal = total * (profile.fat_ratio as f64 / 100.0);

    MacroPlan {
        total_kcal_to_replenish: round1(total),
        carbs_g: round1(carbs_kcal / KCAL_PER_GRAM_CARB),
        protein_g: round1(protein_kcal / KCAL_PER_GRAM_PROTEIN),
        fat_g: round1(fat_kcal / KCAL_PER_GRAM_FAT),
        carbs_kcal: round1(carbs_kcal),
        protein_kcal: round1(protein_kcal),
        fat_kcal: round1(fat_kcal),
        profile_type: profile.category,
        goal: goal.trim().to_lowercase(),
    }
}

/// Compute the macro plan for a session.
///
/// Fails with `FuelingError::UnknownSport` for unregistered sports. An
/// unrecognized goal replenishes 1:1.
pub fn recommend_macros(calories_burned: f64, sport: &str, goal: &str) -> FuelingResult<MacroPlan> {
    let profile = lookup(sport)?;
    let plan = build_plan(calories_burned, profile, goal);

    tracing::debug!(
        "Macro plan for {} ({}): {:.1} kcal burned -> {:.1} kcal to replenish",
        profile.sport.as_str(),
        plan.goal,
        calories_burned,
        plan.total_kcal_to_replenish
    );

    Ok(plan)
}

/// Goal resolution and macro plan for one session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionPlan {
    pub athlete_id: String,
    pub sport: String,
    pub calories_burned: f64,
    pub goal_resolution: GoalResolution,
    pub plan: MacroPlan,
}

/// Resolve the athlete's goal, then plan macros for the resolved goal
pub fn plan_session(
    stats: &AthleteStats,
    requested_goal: &str,
    sport: &str,
    calories_burned: f64,
) -> FuelingResult<SessionPlan> {
    let goal_resolution = explain_goal(stats, requested_goal, sport);
    let plan = recommend_macros(calories_burned, sport, goal_resolution.resolved.as_str())?;

    Ok(SessionPlan {
        athlete_id: stats.athlete_id.clone(),
        sport: sport.trim().to_lowercase(),
        calories_burned,
        goal_resolution,
        plan,
    })
}
