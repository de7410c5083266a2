//! Goal resolution
//!
//! Validates a requested dietary goal against an athlete's body weight and
//! sport, falling back to `maintain` whenever the request is not allowed.
//! Goal resolution never fails: malformed goal text resolves to `maintain`.

use serde::{Deserialize, Serialize};

use super::sports::{classify, SportCategory};

/// Body weight at or below which cutting is not allowed, and at or above
/// which bulking is not allowed. Kilograms, like every weight in the core.
pub const WEIGHT_THRESHOLD_KG: f64 = 150.0;

/// Dietary goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Cutting,
    Maintain,
    Bulking,
}

impl Goal {
    pub const ALL: [Goal; 3] = [Goal::Cutting, Goal::Maintain, Goal::Bulking];

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::Cutting => "cutting",
            Goal::Maintain => "maintain",
            Goal::Bulking => "bulking",
        }
    }

    /// Parse from untrusted text (trimmed, case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cutting" => Some(Goal::Cutting),
            "maintain" => Some(Goal::Maintain),
            "bulking" => Some(Goal::Bulking),
            _ => None,
        }
    }

    /// Share of burned calories to give back for this goal
    pub fn replenish_ratio(&self) -> f64 {
        match self {
            Goal::Maintain => 1.0,
            Goal::Cutting => 0.75,
            Goal::Bulking => 1.15,
        }
    }
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which goals an athlete may pick, computed per request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalEligibility {
    pub cutting: bool,
    pub maintain: bool,
    pub bulking: bool,
}

impl Default for GoalEligibility {
    fn default() -> Self {
        Self {
            cutting: true,
            maintain: true,
            bulking: true,
        }
    }
}

impl GoalEligibility {
    /// Apply the weight and sport rules.
    ///
    /// Unregistered sports carry no category and never restrict bulking.
    pub fn for_athlete(weight_kg: f64, sport: &str) -> Self {
        let mut eligibility = Self::default();

        if weight_kg <= WEIGHT_THRESHOLD_KG {
            eligibility.cutting = false;
        }
        if weight_kg >= WEIGHT_THRESHOLD_KG {
            eligibility.bulking = false;
        }
        if classify(sport) == Some(SportCategory::Endurance) {
            eligibility.bulking = false;
        }

        eligibility
    }

    pub fn allows(&self, goal: Goal) -> bool {
        match goal {
            Goal::Cutting => self.cutting,
            Goal::Maintain => self.maintain,
            Goal::Bulking => self.bulking,
        }
    }

    pub fn allowed_goals(&self) -> Vec<Goal> {
        Goal::ALL.into_iter().filter(|g| self.allows(*g)).collect()
    }
}

/// Physical stats of the athlete making a request.
///
/// `age_years` and `height_cm` are carried for future rules and do not
/// currently affect resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteStats {
    pub athlete_id: String,
    pub age_years: f64,
    pub height_cm: f64,
    pub weight_kg: f64,
}

impl AthleteStats {
    pub fn new(athlete_id: impl Into<String>, age_years: f64, height_cm: f64, weight_kg: f64) -> Self {
        Self {
            athlete_id: athlete_id.into(),
            age_years,
            height_cm,
            weight_kg,
        }
    }
}

/// Full trace of a goal resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalResolution {
    pub athlete_id: String,
    pub requested: String,
    pub eligibility: GoalEligibility,
    pub allowed_goals: Vec<Goal>,
    pub resolved: Goal,
    /// True when the requested goal was unrecognized or not allowed
    pub fell_back: bool,
}

/// Resolve a requested goal and keep the decision trace
pub fn explain_goal(stats: &AthleteStats, requested_goal: &str, sport: &str) -> GoalResolution {
    let eligibility = GoalEligibility::for_athlete(stats.weight_kg, sport);
    tracing::debug!(
        "{}'s allowed goals for {} kg / '{}': {:?}",
        stats.athlete_id,
        stats.weight_kg,
        sport,
        eligibility
    );

    let validated = Goal::from_str(requested_goal).filter(|goal| eligibility.allows(*goal));

    let (resolved, fell_back) = match validated {
        Some(goal) => {
            tracing::debug!("Goal '{}' validated for {}", goal, stats.athlete_id);
            (goal, false)
        }
        None => {
            tracing::info!(
                "Goal '{}' is not allowed for {}. Defaulting to maintain.",
                requested_goal,
                stats.athlete_id
            );
            (Goal::Maintain, true)
        }
    };

    GoalResolution {
        athlete_id: stats.athlete_id.clone(),
        requested: requested_goal.to_string(),
        eligibility,
        allowed_goals: eligibility.allowed_goals(),
        resolved,
        fell_back,
    }
}

/// Resolve a requested goal to one that is guaranteed valid
pub fn resolve_goal(stats: &AthleteStats, requested_goal: &str, sport: &str) -> Goal {
    explain_goal(stats, requested_goal, sport).resolved
}

/// Flat form of [`resolve_goal`] returning the canonical goal string
pub fn resolve_goal_str(
    athlete_id: &str,
    age_years: f64,
    height_cm: f64,
    weight_kg: f64,
    requested_goal: &str,
    sport: &str,
) -> &'static str {
    let stats = AthleteStats::new(athlete_id, age_years, height_cm, weight_kg);
    resolve_goal(&stats, requested_goal, sport).as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn athlete(weight_kg: f64) -> AthleteStats {
        AthleteStats::new("A1", 23.0, 180.0, weight_kg)
    }

    #[test]
    fn test_goal_from_str_is_case_insensitive() {
        assert_eq!(Goal::from_str("Cutting"), Some(Goal::Cutting));
        assert_eq!(Goal::from_str("MAINTAIN"), Some(Goal::Maintain));
        assert_eq!(Goal::from_str(" bulking "), Some(Goal::Bulking));
        assert_eq!(Goal::from_str("shred"), None);
        assert_eq!(Goal::from_str(""), None);
    }

    #[test]
    fn test_eligibility_weight_rules() {
        let light = GoalEligibility::for_athlete(140.0, "track_and_field_power");
        assert!(!light.cutting);
        assert!(light.maintain);
        assert!(light.bulking);

        let heavy = GoalEligibility::for_athlete(160.0, "track_and_field_power");
        assert!(heavy.cutting);
        assert!(heavy.maintain);
        assert!(!heavy.bulking);

        // Both boundaries are inclusive
        let exact = GoalEligibility::for_athlete(150.0, "track_and_field_mid");
        assert!(!exact.cutting);
        assert!(!exact.bulking);
        assert_eq!(exact.allowed_goals(), vec![Goal::Maintain]);
    }

    #[test]
    fn test_eligibility_endurance_blocks_bulking() {
        assert!(!GoalEligibility::for_athlete(60.0, "marathon_running").bulking);
        assert!(!GoalEligibility::for_athlete(60.0, "track_and_field_distance").bulking);
        assert!(GoalEligibility::for_athlete(60.0, "track_and_field_mid").bulking);
        assert!(GoalEligibility::for_athlete(60.0, "unregistered").bulking);
    }

    #[test]
    fn test_cutting_at_or_below_threshold_falls_back() {
        for weight in [-10.0, 0.0, 45.5, 100.0, 149.9, 150.0] {
            assert_eq!(resolve_goal(&athlete(weight), "cutting", "track_and_field_mid"), Goal::Maintain);
        }
        assert_eq!(resolve_goal(&athlete(150.1), "cutting", "track_and_field_mid"), Goal::Cutting);
    }

    #[test]
    fn test_bulking_at_or_above_threshold_falls_back() {
        for weight in [150.0, 150.1, 200.0, 1000.0] {
            assert_eq!(resolve_goal(&athlete(weight), "bulking", "track_and_field_power"), Goal::Maintain);
        }
        assert_eq!(resolve_goal(&athlete(149.9), "bulking", "track_and_field_power"), Goal::Bulking);
    }

    #[test]
    fn test_endurance_bulking_falls_back_regardless_of_weight() {
        for weight in [40.0, 90.0, 149.0, 200.0] {
            assert_eq!(resolve_goal(&athlete(weight), "bulking", "marathon_running"), Goal::Maintain);
            assert_eq!(resolve_goal(&athlete(weight), "Bulking", "track_and_field_distance"), Goal::Maintain);
        }
    }

    #[test]
    fn test_reference_scenario() {
        assert_eq!(resolve_goal_str("A1", 23.0, 180.0, 140.0, "bulking", "marathon_running"), "maintain");
        assert_eq!(resolve_goal_str("A001", 23.0, 183.0, 160.0, "Cutting", "marathon_running"), "cutting");
    }

    #[test]
    fn test_malformed_goal_always_resolves_to_canonical_value() {
        let inputs = ["", "   ", "CUT", "bulk", "maintain; DROP TABLE", "🏃", "cutting\n", "null"];
        for input in inputs {
            for weight in [50.0, 150.0, 250.0] {
                for sport in ["marathon_running", "track_and_field_power", "", "???"] {
                    let goal = resolve_goal_str("A1", 30.0, 170.0, weight, input, sport);
                    assert!(["cutting", "maintain", "bulking"].contains(&goal));
                }
            }
        }
        assert_eq!(resolve_goal(&athlete(200.0), "CUT", "track_and_field_mid"), Goal::Maintain);
    }

    #[test]
    fn test_maintain_always_allowed() {
        for weight in [f64::NAN, -1.0, 0.0, 150.0, 400.0] {
            assert_eq!(resolve_goal(&athlete(weight), "maintain", "marathon_running"), Goal::Maintain);
        }
    }

    #[test]
    fn test_age_and_height_are_inert() {
        let a = AthleteStats::new("A1", 18.0, 150.0, 170.0);
        let b = AthleteStats::new("A1", 65.0, 210.0, 170.0);
        assert_eq!(explain_goal(&a, "cutting", "track_and_field_mid").resolved,
                   explain_goal(&b, "cutting", "track_and_field_mid").resolved);
    }

    #[test]
    fn test_explain_goal_trace() {
        let resolution = explain_goal(&athlete(120.0), "Bulking", "marathon_running");
        assert_eq!(resolution.requested, "Bulking");
        assert_eq!(resolution.resolved, Goal::Maintain);
        assert!(resolution.fell_back);
        assert_eq!(resolution.allowed_goals, vec![Goal::Maintain]);

        let resolution = explain_goal(&athlete(120.0), "bulking", "track_and_field_power");
        assert_eq!(resolution.resolved, Goal::Bulking);
        assert!(!resolution.fell_back);
    }
}
