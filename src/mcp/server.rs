//! Endurithm MCP Server Implementation
//!
//! Implements the MCP server with all Endurithm tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::tools::fueling::{self, PlanSessionError};
use crate::tools::sessions;
use crate::tools::status::StatusTracker;

/// Endurithm MCP Service
#[derive(Clone)]
pub struct FuelingService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<FuelingService>,
}

impl FuelingService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Fueling Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ResolveGoalParams {
    /// Athlete identifier
    pub athlete_id: String,
    /// Age in years (recorded, does not affect the decision)
    #[serde(default)]
    pub age_years: f64,
    /// Height in centimeters (recorded, does not affect the decision)
    #[serde(default)]
    pub height_cm: f64,
    /// Body weight, in kilograms unless weight_unit says otherwise
    pub weight: f64,
    /// "kg" (default) or "lb"
    pub weight_unit: Option<String>,
    /// Requested goal: cutting, maintain or bulking (case-insensitive)
    pub goal: String,
    /// Sport identifier, e.g. marathon_running
    pub sport: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecommendMacrosParams {
    /// Calories burned during the session (kcal)
    pub calories_burned: f64,
    /// Sport identifier: marathon_running, track_and_field_distance, track_and_field_power, track_and_field_mid
    pub sport: String,
    /// Goal: cutting, maintain or bulking. Unrecognized goals replenish 1:1.
    #[serde(default = "default_goal")]
    pub goal: String,
}

fn default_goal() -> String { "maintain".to_string() }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PlanSessionParams {
    /// Athlete identifier
    pub athlete_id: String,
    /// Age in years (recorded, does not affect the decision)
    #[serde(default)]
    pub age_years: f64,
    /// Height in centimeters (recorded, does not affect the decision)
    #[serde(default)]
    pub height_cm: f64,
    /// Body weight, in kilograms unless weight_unit says otherwise
    pub weight: f64,
    /// "kg" (default) or "lb"
    pub weight_unit: Option<String>,
    /// Requested goal: cutting, maintain or bulking (case-insensitive)
    pub goal: String,
    /// Sport identifier
    pub sport: String,
    /// Calories burned during the session (kcal)
    pub calories_burned: f64,
    /// Append the plan to the session log (default false)
    #[serde(default)]
    pub log: bool,
}

// ============================================================================
// Session Log Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListSessionsParams {
    /// Only sessions for this athlete (optional)
    pub athlete_id: Option<String>,
    /// Maximum results (default 50)
    #[serde(default = "default_list_limit")]
    pub limit: i64,
}

fn default_list_limit() -> i64 { 50 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetSessionParams {
    /// Session log entry ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SessionSummaryParams {
    /// Only sessions for this athlete (optional)
    pub athlete_id: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExportSessionsCsvParams {
    /// Destination file path; overwritten if it exists
    pub file_path: String,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl FuelingService {
    // --- Status ---

    #[tool(description = "Get the current status of the Endurithm service including build info, database status, and process information")]
    async fn endurithm_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        to_json(&tracker.get_status())
    }

    #[tool(description = "Get instructions for planning post-session fueling. Call this before using the fueling tools for the first time.")]
    fn fueling_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::FUELING_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(FUELING_INSTRUCTIONS)]))
    }

    // --- Fueling ---

    #[tool(description = "List registered sports with their category and carb/protein/fat split, plus the goal rules")]
    fn list_sports(&self) -> Result<CallToolResult, McpError> {
        to_json(&fueling::list_sports())
    }

    #[tool(description = "Validate a requested goal (cutting, maintain, bulking) against the athlete's weight and sport. Goals that are not allowed resolve to maintain.")]
    fn resolve_goal(&self, Parameters(p): Parameters<ResolveGoalParams>) -> Result<CallToolResult, McpError> {
        let result = fueling::resolve_goal(
            &p.athlete_id, p.age_years, p.height_cm, p.weight, p.weight_unit.as_deref(), &p.goal, &p.sport,
        )
        .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Compute the macro replenishment plan (grams and kcal of carbs, protein, fat) for calories burned, sport and an already resolved goal")]
    fn recommend_macros(&self, Parameters(p): Parameters<RecommendMacrosParams>) -> Result<CallToolResult, McpError> {
        let result = fueling::recommend_macros(p.calories_burned, &p.sport, &p.goal)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Resolve the athlete's goal and compute the macro plan in one step. Set log=true to append the plan to the session log.")]
    fn plan_session(&self, Parameters(p): Parameters<PlanSessionParams>) -> Result<CallToolResult, McpError> {
        let stats = fueling::athlete_stats(&p.athlete_id, p.age_years, p.height_cm, p.weight, p.weight_unit.as_deref())
            .map_err(|e| McpError::invalid_params(e, None))?;
        let log_to = p.log.then_some(&self.database);
        let result = fueling::plan_session(log_to, &stats, &p.goal, &p.sport, p.calories_burned)
            .map_err(|e| match e {
                PlanSessionError::Invalid(_) => McpError::invalid_params(e.to_string(), None),
                PlanSessionError::Storage(_) => McpError::internal_error(e.to_string(), None),
            })?;
        to_json(&result)
    }

    // --- Session Log ---

    #[tool(description = "List logged sessions, newest first, optionally for one athlete")]
    fn list_sessions(&self, Parameters(p): Parameters<ListSessionsParams>) -> Result<CallToolResult, McpError> {
        let result = sessions::list_sessions(&self.database, p.athlete_id.as_deref(), Some(p.limit))
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get one logged session by ID")]
    fn get_session(&self, Parameters(p): Parameters<GetSessionParams>) -> Result<CallToolResult, McpError> {
        let result = sessions::get_session(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(entry) => to_json(&entry),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Session not found", "id": {}}}"#,
                p.id
            ))])),
        }
    }

    #[tool(description = "Session count and calories burned/replenished totals, optionally for one athlete")]
    fn session_summary(&self, Parameters(p): Parameters<SessionSummaryParams>) -> Result<CallToolResult, McpError> {
        let result = sessions::session_summary(&self.database, p.athlete_id.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Export the whole session log to a CSV file (timestamp, athlete_id, calories_burned, goal, replenish_kcal, macros, profile_type)")]
    fn export_sessions_csv(&self, Parameters(p): Parameters<ExportSessionsCsvParams>) -> Result<CallToolResult, McpError> {
        let result = sessions::export_sessions_csv(&self.database, &p.file_path)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for FuelingService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "endurithm".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Endurithm Fueling Engine".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Endurithm - post-session fueling plans for athletes. \
                 Call fueling_instructions first. \
                 Fueling: list_sports, resolve_goal, recommend_macros, plan_session (log=true to record). \
                 Session log (append-only): list_sessions, get_session, session_summary, export_sessions_csv."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorCode;

    fn service() -> FuelingService {
        let database = Database::open_in_memory().unwrap();
        database
            .with_conn(|conn| crate::db::migrations::run_migrations(conn))
            .unwrap();
        FuelingService::new(PathBuf::from(":memory:"), database)
    }

    fn params(sport: &str, calories_burned: f64) -> Parameters<PlanSessionParams> {
        Parameters(PlanSessionParams {
            athlete_id: "A1".to_string(),
            age_years: 23.0,
            height_cm: 180.0,
            weight: 160.0,
            weight_unit: None,
            goal: "cutting".to_string(),
            sport: sport.to_string(),
            calories_burned,
            log: true,
        })
    }

    #[test]
    fn test_plan_session_caller_errors_are_invalid_params() {
        let service = service();

        let err = service.plan_session(params("rowing", 600.0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);

        let err = service.plan_session(params("marathon_running", -10.0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);

        assert!(service.plan_session(params("marathon_running", 600.0)).is_ok());
    }
}
