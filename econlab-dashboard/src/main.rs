//! EconLab dashboard server.

use anyhow::Result;
use econlab_core::logging::init_logging;
use econlab_dashboard::{run_server, DashboardConfig};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = DashboardConfig::from_env();
    run_server(config).await?;
    Ok(())
}
