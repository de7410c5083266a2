//! Endurithm Status Tool
//!
//! Provides runtime status information and usage instructions.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Fueling workflow instructions for AI assistants
pub const FUELING_INSTRUCTIONS: &str = r#"
# Endurithm Fueling Instructions

Endurithm turns a session's calories-burned estimate into a macro
replenishment plan for the athlete's sport and dietary goal.

## Workflow

1. Get the calories burned for the session (from the athlete's device or
   calorie model). Endurithm does not estimate calories itself.
2. Call `plan_session` with the athlete's stats, requested goal, sport and
   calories burned. Set `log: true` to append the plan to the session log.
3. Report the resolved goal. If `fell_back` is true, tell the athlete their
   requested goal was not allowed and `maintain` was used instead.

## Goals

| Goal | Replenish | Allowed when |
|------|-----------|--------------|
| cutting | 75% | weight above 150 kg |
| maintain | 100% | always |
| bulking | 115% | weight below 150 kg and sport is not endurance |

Weights are kilograms unless `weight_unit` is `lb`.

## Sports

| Sport | Category | Carbs | Protein | Fat |
|-------|----------|-------|---------|-----|
| marathon_running | endurance | 60% | 20% | 20% |
| track_and_field_distance | endurance | 60% | 20% | 20% |
| track_and_field_power | power | 45% | 30% | 25% |
| track_and_field_mid | hybrid | 50% | 25% | 25% |

Any other sport is rejected by `recommend_macros` and `plan_session`.

## Session Log

- The log is append-only; entries cannot be edited or deleted.
- `list_sessions`, `get_session`, `session_summary` read it back.
- `export_sessions_csv` writes the whole log to a CSV file.
"#;

/// Runtime status of the Endurithm service
#[derive(Debug, Clone, Serialize)]
pub struct EndurithmStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> EndurithmStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        EndurithmStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_missing_database() {
        let tracker = StatusTracker::new(PathBuf::from("/nonexistent/endurithm.db"));
        let status = tracker.get_status();
        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.process_id, std::process::id());
        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_instructions_list_every_sport() {
        for profile in crate::fueling::SPORT_PROFILES.iter() {
            assert!(FUELING_INSTRUCTIONS.contains(profile.sport.as_str()));
        }
    }
}
