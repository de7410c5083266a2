//! Endurithm Library
//!
//! Goal validation and macro replenishment planning for athletes, with an
//! append-only session log.

pub mod build_info;
pub mod config;
pub mod db;
pub mod fueling;
pub mod mcp;
pub mod models;
pub mod tools;
