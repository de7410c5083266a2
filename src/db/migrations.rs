//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("Applied schema migration v1");
    }

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Migration v1: append-only session log
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- SESSION LOG
        -- One row per planned session. Rows are never updated or deleted.
        -- ============================================
        CREATE TABLE session_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp TEXT NOT NULL,             -- "YYYY-MM-DD HH:MM:SS" (UTC)
            athlete_id TEXT NOT NULL,
            sport TEXT NOT NULL,
            calories_burned REAL NOT NULL,
            goal TEXT NOT NULL CHECK(goal IN ('cutting', 'maintain', 'bulking')),
            replenish_kcal REAL NOT NULL,
            carbs_g REAL NOT NULL,
            protein_g REAL NOT NULL,
            fat_g REAL NOT NULL,
            carbs_kcal REAL NOT NULL,
            protein_kcal REAL NOT NULL,
            fat_kcal REAL NOT NULL,
            profile_type TEXT NOT NULL CHECK(profile_type IN ('endurance', 'power', 'hybrid'))
        );

        CREATE INDEX idx_session_log_athlete ON session_log(athlete_id);
        CREATE INDEX idx_session_log_timestamp ON session_log(timestamp);

        CREATE TRIGGER session_log_no_update
        BEFORE UPDATE ON session_log
        BEGIN
            SELECT RAISE(ABORT, 'session_log is append-only');
        END;

        CREATE TRIGGER session_log_no_delete
        BEFORE DELETE ON session_log
        BEGIN
            SELECT RAISE(ABORT, 'session_log is append-only');
        END;
        "#,
    )?;

    Ok(())
}
