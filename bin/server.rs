// Finance Tracker - Web Server

use anyhow::{Context, Result};
use finance_tracker::api::{self, AppState};
use finance_tracker::{logging, Config, SqliteEntryRepository};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("Invalid configuration")?;
    logging::init(config.log_json);

    info!(version = finance_tracker::VERSION, "finance tracker server starting");

    // Open database (schema is created on first use)
    let repo = SqliteEntryRepository::open_location(&config.database)
        .with_context(|| format!("Failed to open database at {}", config.database))?;
    info!(database = %config.database, "database opened");

    let app = api::router(AppState::new(repo));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .await
        .context("Server terminated")?;

    Ok(())
}
