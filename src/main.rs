//! Endurithm
//!
//! An MCP server for athlete goal validation and post-session fueling plans.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use endurithm::build_info::BuildInfo;
use endurithm::config;
use endurithm::mcp::FuelingService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging goes to stderr so it does not interfere with MCP stdio
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(config::DEFAULT_LOG_DIRECTIVE.parse()?))
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Endurithm {} starting MCP server on stdio", BuildInfo::current());

    let db_path = config::get_database_path();
    let database = config::open_database()?;

    let service = FuelingService::new(db_path, database);

    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
