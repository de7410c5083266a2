//! Data models
//!
//! Rust structs representing database entities.

mod session_log;

pub use session_log::{SessionLogCreate, SessionLogEntry, SessionSummary, CSV_HEADER};
