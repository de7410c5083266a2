//! Runtime configuration
//!
//! Settings come from the environment:
//! - `ENDURITHM_DATABASE_PATH` - session log database file
//! - `RUST_LOG` - tracing filter, defaults to `endurithm=info`

use std::path::PathBuf;

/// Environment variable overriding the database location
pub const DATABASE_PATH_ENV: &str = "ENDURITHM_DATABASE_PATH";

/// Default tracing directive when `RUST_LOG` does not mention the crate
pub const DEFAULT_LOG_DIRECTIVE: &str = "endurithm=info";

/// Get the database path from environment or use `<project>/data/endurithm.db`
pub fn get_database_path() -> PathBuf {
    std::env::var(DATABASE_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_database_path())
}

fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(parent) = path.parent() {
            if let Some(grandparent) = parent.parent() {
                path = grandparent.to_path_buf();
            }
        }
    }

    path.push("data");
    path.push("endurithm.db");
    path
}

/// Open the database at the configured path, creating its directory and
/// applying migrations
pub fn open_database() -> crate::db::DbResult<crate::db::Database> {
    let db_path = get_database_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = crate::db::Database::new(&db_path)?;
    database.with_conn(|conn| {
        crate::db::migrations::run_migrations(conn)?;
        let version = crate::db::migrations::get_schema_version(conn)?;
        tracing::info!("Database {} at schema version {}", db_path.display(), version);
        Ok(())
    })?;

    Ok(database)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_database_path_file_name() {
        let path = default_database_path();
        assert!(path.ends_with("data/endurithm.db"));
    }
}
