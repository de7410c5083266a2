//! Endurithm Tools module
//!
//! Tool implementations behind the MCP server.

pub mod fueling;
pub mod sessions;
pub mod status;
