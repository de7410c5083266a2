//! Session log model
//!
//! Append-only record of planned sessions: one flattened row per plan,
//! stamped with the time it was logged and the athlete it belongs to.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::fueling::{round_to, SessionPlan, SportCategory};

/// Column order of the flat CSV export
pub const CSV_HEADER: &str = "timestamp,athlete_id,calories_burned,goal,replenish_kcal,carbs_g,protein_g,fat_g,carbs_kcal,protein_kcal,fat_kcal,profile_type";

/// A logged session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionLogEntry {
    pub id: i64,
    pub timestamp: String,
    pub athlete_id: String,
    pub sport: String,
    pub calories_burned: f64,
    pub goal: String,
    pub replenish_kcal: f64,
    pub carbs_g: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbs_kcal: f64,
    pub protein_kcal: f64,
    pub fat_kcal: f64,
    pub profile_type: SportCategory,
}

/// Data for appending a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionLogCreate {
    /// Defaults to the current UTC time
    pub timestamp: Option<String>,
    pub athlete_id: String,
    pub sport: String,
    pub calories_burned: f64,
    pub goal: String,
    pub replenish_kcal: f64,
    pub carbs_g: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbs_kcal: f64,
    pub protein_kcal: f64,
    pub fat_kcal: f64,
    pub profile_type: SportCategory,
}

impl SessionLogCreate {
    /// Flatten a session plan into a log row
    pub fn from_plan(session: &SessionPlan, timestamp: Option<String>) -> Self {
        let plan = &session.plan;
        Self {
            timestamp,
            athlete_id: session.athlete_id.clone(),
            sport: session.sport.clone(),
            // Stored at the same precision as the plan fields
            calories_burned: round_to(session.calories_burned, 2),
            goal: session.goal_resolution.resolved.as_str().to_string(),
            replenish_kcal: plan.total_kcal_to_replenish,
            carbs_g: plan.carbs_g,
            protein_g: plan.protein_g,
            fat_g: plan.fat_g,
            carbs_kcal: plan.carbs_kcal,
            protein_kcal: plan.protein_kcal,
            fat_kcal: plan.fat_kcal,
            profile_type: plan.profile_type,
        }
    }
}

/// Aggregate over logged sessions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub athlete_id: Option<String>,
    pub session_count: i64,
    pub total_calories_burned: f64,
    pub average_calories_burned: f64,
    pub total_replenish_kcal: f64,
    pub first_timestamp: Option<String>,
    pub last_timestamp: Option<String>,
}

fn parse_profile_type(column: usize, s: &str) -> rusqlite::Result<SportCategory> {
    SportCategory::from_str(s).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Text,
            format!("Unknown profile type: '{}'", s).into(),
        )
    })
}

impl SessionLogEntry {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let profile_column = row.as_ref().column_index("profile_type")?;
        let profile_type: String = row.get(profile_column)?;

        Ok(Self {
            id: row.get("id")?,
            timestamp: row.get("timestamp")?,
            athlete_id: row.get("athlete_id")?,
            sport: row.get("sport")?,
            calories_burned: row.get("calories_burned")?,
            goal: row.get("goal")?,
            replenish_kcal: row.get("replenish_kcal")?,
            carbs_g: row.get("carbs_g")?,
            protein_g: row.get("protein_g")?,
            fat_g: row.get("fat_g")?,
            carbs_kcal: row.get("carbs_kcal")?,
            protein_kcal: row.get("protein_kcal")?,
            fat_kcal: row.get("fat_kcal")?,
            profile_type: parse_profile_type(profile_column, &profile_type)?,
        })
    }

    /// Append a session to the log
    pub fn append(conn: &Connection, data: &SessionLogCreate) -> DbResult<Self> {
        let timestamp = data.timestamp.clone().unwrap_or_else(|| {
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
        });

        conn.execute(
            r#"
            INSERT INTO session_log
            (timestamp, athlete_id, sport, calories_burned, goal, replenish_kcal,
             carbs_g, protein_g, fat_g, carbs_kcal, protein_kcal, fat_kcal, profile_type)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                timestamp,
                data.athlete_id,
                data.sport,
                data.calories_burned,
                data.goal,
                data.replenish_kcal,
                data.carbs_g,
                data.protein_g,
                data.fat_g,
                data.carbs_kcal,
                data.protein_kcal,
                data.fat_kcal,
                data.profile_type.as_str(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        tracing::info!("Logged session {} for athlete {}", id, data.athlete_id);

        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a logged session by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM session_log WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List logged sessions, newest first
    pub fn list(conn: &Connection, limit: Option<i64>) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM session_log ORDER BY timestamp DESC, id DESC LIMIT ?1",
        )?;
        // SQLite treats a negative LIMIT as unbounded
        let entries = stmt
            .query_map([limit.unwrap_or(-1)], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// List logged sessions for one athlete, newest first
    pub fn list_for_athlete(
        conn: &Connection,
        athlete_id: &str,
        limit: Option<i64>,
    ) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM session_log
            WHERE athlete_id = ?1
            ORDER BY timestamp DESC, id DESC
            LIMIT ?2
            "#,
        )?;
        let entries = stmt
            .query_map(params![athlete_id, limit.unwrap_or(-1)], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// List all logged sessions in the order they were appended
    pub fn list_chronological(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM session_log ORDER BY id")?;
        let entries = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Summarize logged sessions, optionally for one athlete
    pub fn summary(conn: &Connection, athlete_id: Option<&str>) -> DbResult<SessionSummary> {
        let summary = conn.query_row(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(calories_burned), 0),
                   COALESCE(AVG(calories_burned), 0),
                   COALESCE(SUM(replenish_kcal), 0),
                   MIN(timestamp),
                   MAX(timestamp)
            FROM session_log
            WHERE ?1 IS NULL OR athlete_id = ?1
            "#,
            [athlete_id],
            |row| {
                Ok(SessionSummary {
                    athlete_id: athlete_id.map(String::from),
                    session_count: row.get(0)?,
                    total_calories_burned: row.get(1)?,
                    average_calories_burned: row.get(2)?,
                    total_replenish_kcal: row.get(3)?,
                    first_timestamp: row.get(4)?,
                    last_timestamp: row.get(5)?,
                })
            },
        )?;

        Ok(summary)
    }

    /// Render as a CSV row matching [`CSV_HEADER`]
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{},{},{}",
            self.timestamp,
            csv_field(&self.athlete_id),
            self.calories_burned,
            self.goal,
            self.replenish_kcal,
            self.carbs_g,
            self.protein_g,
            self.fat_g,
            self.carbs_kcal,
            self.protein_kcal,
            self.fat_kcal,
            self.profile_type.as_str(),
        )
    }
}

/// Quote a free-text field when it would break the row
fn csv_field(value: &str) -> String {
    if value.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::fueling::{plan_session, AthleteStats};

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn entry(athlete_id: &str, timestamp: &str, weight_kg: f64, calories: f64) -> SessionLogCreate {
        let stats = AthleteStats::new(athlete_id, 23.0, 180.0, weight_kg);
        let session = plan_session(&stats, "cutting", "marathon_running", calories).unwrap();
        SessionLogCreate::from_plan(&session, Some(timestamp.to_string()))
    }

    #[test]
    fn test_append_and_get() {
        let conn = setup();
        let logged = SessionLogEntry::append(&conn, &entry("A1", "2026-01-10 07:30:00", 160.0, 600.0)).unwrap();

        assert_eq!(logged.athlete_id, "A1");
        assert_eq!(logged.goal, "cutting");
        assert_eq!(logged.replenish_kcal, 450.0);
        assert_eq!(logged.carbs_g, 67.5);
        assert_eq!(logged.profile_type, SportCategory::Endurance);

        let fetched = SessionLogEntry::get_by_id(&conn, logged.id).unwrap();
        assert_eq!(fetched, Some(logged));
        assert_eq!(SessionLogEntry::get_by_id(&conn, 999).unwrap(), None);
    }

    #[test]
    fn test_append_defaults_timestamp() {
        let conn = setup();
        let mut data = entry("A1", "", 160.0, 500.0);
        data.timestamp = None;
        let logged = SessionLogEntry::append(&conn, &data).unwrap();
        assert_eq!(logged.timestamp.len(), "2026-01-10 07:30:00".len());
    }

    #[test]
    fn test_entry_carries_resolved_goal() {
        // 120 kg is below the cutting threshold, so the plan falls back to maintain
        let data = entry("A2", "2026-01-10 07:30:00", 120.0, 600.0);
        assert_eq!(data.goal, "maintain");
        assert_eq!(data.replenish_kcal, 600.0);
    }

    #[test]
    fn test_list_newest_first_with_limit() {
        let conn = setup();
        SessionLogEntry::append(&conn, &entry("A1", "2026-01-10 07:30:00", 160.0, 600.0)).unwrap();
        SessionLogEntry::append(&conn, &entry("A2", "2026-01-12 07:30:00", 160.0, 450.0)).unwrap();
        SessionLogEntry::append(&conn, &entry("A1", "2026-01-11 07:30:00", 160.0, 700.0)).unwrap();

        let all = SessionLogEntry::list(&conn, None).unwrap();
        let stamps: Vec<_> = all.iter().map(|e| e.timestamp.as_str()).collect();
        assert_eq!(stamps, vec!["2026-01-12 07:30:00", "2026-01-11 07:30:00", "2026-01-10 07:30:00"]);

        assert_eq!(SessionLogEntry::list(&conn, Some(2)).unwrap().len(), 2);

        let a1 = SessionLogEntry::list_for_athlete(&conn, "A1", None).unwrap();
        assert_eq!(a1.len(), 2);
        assert!(a1.iter().all(|e| e.athlete_id == "A1"));

        let chronological = SessionLogEntry::list_chronological(&conn).unwrap();
        assert_eq!(chronological[0].timestamp, "2026-01-10 07:30:00");
        assert_eq!(chronological[2].timestamp, "2026-01-11 07:30:00");
    }

    #[test]
    fn test_summary() {
        let conn = setup();
        let empty = SessionLogEntry::summary(&conn, None).unwrap();
        assert_eq!(empty.session_count, 0);
        assert_eq!(empty.average_calories_burned, 0.0);
        assert_eq!(empty.first_timestamp, None);

        SessionLogEntry::append(&conn, &entry("A1", "2026-01-10 07:30:00", 160.0, 600.0)).unwrap();
        SessionLogEntry::append(&conn, &entry("A1", "2026-01-11 07:30:00", 160.0, 400.0)).unwrap();
        SessionLogEntry::append(&conn, &entry("B7", "2026-01-12 07:30:00", 160.0, 900.0)).unwrap();

        let a1 = SessionLogEntry::summary(&conn, Some("A1")).unwrap();
        assert_eq!(a1.session_count, 2);
        assert_eq!(a1.total_calories_burned, 1000.0);
        assert_eq!(a1.average_calories_burned, 500.0);
        assert_eq!(a1.total_replenish_kcal, 750.0);
        assert_eq!(a1.first_timestamp.as_deref(), Some("2026-01-10 07:30:00"));
        assert_eq!(a1.last_timestamp.as_deref(), Some("2026-01-11 07:30:00"));

        let all = SessionLogEntry::summary(&conn, None).unwrap();
        assert_eq!(all.session_count, 3);
        assert_eq!(all.athlete_id, None);
    }

    #[test]
    fn test_csv_row() {
        let conn = setup();
        let logged = SessionLogEntry::append(&conn, &entry("A1", "2026-01-10 07:30:00", 160.0, 600.0)).unwrap();
        assert_eq!(
            logged.to_csv_row(),
            "2026-01-10 07:30:00,A1,600,cutting,450,67.5,22.5,10,270,90,90,endurance"
        );
        assert_eq!(CSV_HEADER.split(',').count(), logged.to_csv_row().split(',').count());
    }

    #[test]
    fn test_calories_rounded_to_two_decimals() {
        // 612.345 is stored slightly above the tie
        let data = entry("A1", "2026-01-10 07:30:00", 160.0, 612.345);
        assert_eq!(data.calories_burned, 612.35);
        let data = entry("A1", "2026-01-10 07:30:00", 160.0, 1.005);
        assert_eq!(data.calories_burned, 1.0);
    }

    #[test]
    fn test_parse_profile_type() {
        assert_eq!(parse_profile_type(0, "power").unwrap(), SportCategory::Power);
        assert_eq!(parse_profile_type(0, "hybrid").unwrap(), SportCategory::Hybrid);
        assert_eq!(parse_profile_type(0, "endurance").unwrap(), SportCategory::Endurance);
        assert!(matches!(
            parse_profile_type(13, "sprint"),
            Err(rusqlite::Error::FromSqlConversionFailure(13, rusqlite::types::Type::Text, _))
        ));
    }

    #[test]
    fn test_unknown_profile_type_row_is_an_error() {
        let conn = Connection::open_in_memory().unwrap();
        // Same columns as session_log, without the CHECK constraints
        conn.execute_batch(
            r#"
            CREATE TABLE session_log (
                id INTEGER PRIMARY KEY, timestamp TEXT, athlete_id TEXT, sport TEXT,
                calories_burned REAL, goal TEXT, replenish_kcal REAL, carbs_g REAL,
                protein_g REAL, fat_g REAL, carbs_kcal REAL, protein_kcal REAL,
                fat_kcal REAL, profile_type TEXT
            );
            INSERT INTO session_log VALUES
                (1, '2026-01-10 07:30:00', 'A1', 'marathon_running', 600, 'maintain',
                 600, 90, 30, 13.3, 360, 120, 120, 'sprint');
            "#,
        )
        .unwrap();

        assert!(SessionLogEntry::get_by_id(&conn, 1).is_err());
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("A1"), "A1");
        assert_eq!(csv_field("Smith, J"), "\"Smith, J\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
