//! `VoiceBuddy` binary entry point - startup sequence and bot launch.

use dotenvy::dotenv;
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use voice_buddy::{
    config,
    errors::{Error, Result},
};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load presentation settings (optional config.toml)
    let settings = config::settings::load_default_settings()
        .inspect(|_| info!("Settings loaded."))
        .inspect_err(|e| error!("Failed to load settings: {e}"))?;

    // 4. Connect to the database and make sure the schema exists
    let database = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;

    config::database::create_tables(&database)
        .await
        .inspect(|_| info!("Database tables ready."))
        .inspect_err(|e| error!("Failed to create database tables: {e}"))?;

    // 5. Run the bot. DISCORD_BOT_TOKEN is loaded here, directly before
    // use, not stored in settings.
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))
        .map_err(Error::EnvVar)?;

    voice_buddy::bot::run_bot(token, settings, database).await?;

    Ok(())
}
