//! Session log tools
//!
//! Read access to the append-only session log and its CSV export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::db::{Database, DbError};
use crate::models::{SessionLogEntry, SessionSummary, CSV_HEADER};

// ============================================================================
// Response Structs
// ============================================================================

/// Response for list_sessions
#[derive(Debug, Serialize)]
pub struct ListSessionsResponse {
    pub sessions: Vec<SessionLogEntry>,
    pub total: usize,
}

/// Response for export_sessions_csv
#[derive(Debug, Serialize)]
pub struct ExportSessionsResponse {
    pub success: bool,
    pub file_path: String,
    pub rows_written: usize,
}

// ============================================================================
// Tool Functions
// ============================================================================

/// List logged sessions, newest first, optionally for one athlete
pub fn list_sessions(
    db: &Database,
    athlete_id: Option<&str>,
    limit: Option<i64>,
) -> Result<ListSessionsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let sessions = match athlete_id {
        Some(id) => SessionLogEntry::list_for_athlete(&conn, id, limit),
        None => SessionLogEntry::list(&conn, limit),
    }
    .map_err(|e| format!("Failed to list sessions: {}", e))?;

    let total = sessions.len();
    Ok(ListSessionsResponse { sessions, total })
}

/// Get one logged session
pub fn get_session(db: &Database, id: i64) -> Result<Option<SessionLogEntry>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    SessionLogEntry::get_by_id(&conn, id).map_err(|e| format!("Failed to get session: {}", e))
}

/// Count and calorie totals over the log
pub fn session_summary(db: &Database, athlete_id: Option<&str>) -> Result<SessionSummary, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    SessionLogEntry::summary(&conn, athlete_id)
        .map_err(|e| format!("Failed to summarize sessions: {}", e))
}

/// Write the whole log, oldest first, to a CSV file
pub fn export_sessions_csv(db: &Database, file_path: &str) -> Result<ExportSessionsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let sessions = SessionLogEntry::list_chronological(&conn)
        .map_err(|e| format!("Failed to list sessions: {}", e))?;

    write_csv(Path::new(file_path), &sessions)
        .map_err(|e| format!("Failed to write '{}': {}", file_path, e))?;

    tracing::info!("Exported {} sessions to {}", sessions.len(), file_path);

    Ok(ExportSessionsResponse {
        success: true,
        file_path: file_path.to_string(),
        rows_written: sessions.len(),
    })
}

fn write_csv(path: &Path, sessions: &[SessionLogEntry]) -> Result<(), DbError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "{}", CSV_HEADER)?;
    for session in sessions {
        writeln!(writer, "{}", session.to_csv_row())?;
    }
    writer.flush()?;

    Ok(())
}
