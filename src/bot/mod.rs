//! Bot layer - Discord-specific interface, command handlers, and wiring.
//!
//! This module provides the Discord interface for the `VoiceBuddy`
//! application: all slash/prefix commands, the gateway event handler that
//! feeds the presence tracker, and the shared bot context.

/// Discord command implementations (stats, moderation, general)
pub mod commands;
/// Gateway event handlers (voice-state updates)
pub mod handlers;

use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tokio::sync::Mutex;
use tracing::info;

use crate::{
    config::settings::Settings,
    core::tracker::VoiceTracker,
    errors::{Error, Result},
};

/// Shared data available to all bot commands and event handlers.
///
/// The tracker sits behind a mutex so gateway events are processed strictly
/// one at a time; the transition logic reads and writes its maps without
/// any locking of its own and relies on that serialization.
pub struct BotData {
    /// Database connection for all durable operations
    pub database: DatabaseConnection,
    /// The voice presence tracker, serialized behind a single lock
    pub tracker: Mutex<VoiceTracker>,
    /// Presentation settings loaded at startup
    pub settings: Settings,
}

impl BotData {
    /// Creates the shared context with a fresh, empty tracker.
    #[must_use]
    pub fn new(database: DatabaseConnection, settings: Settings) -> Self {
        Self {
            database,
            tracker: Mutex::new(VoiceTracker::new()),
            settings,
        }
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            panic!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("An error occurred: {error}")).await {
                tracing::error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                tracing::error!("Error while handling error: {e}");
            }
        }
    }
}

/// Builds the poise framework and runs the bot until the gateway closes.
pub async fn run_bot(token: String, settings: Settings, database: DatabaseConnection) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::vcstats(),
                commands::vcleaderboard(),
                commands::vcreset(),
                commands::warn(),
                commands::unwarn(),
                commands::warnings(),
            ],
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::voice::event_handler(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(BotData::new(database, settings))
            })
        })
        .build();

    // Voice-state events require the GUILD_VOICE_STATES intent; member
    // lists are read from the cache populated via GUILDS.
    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_VOICE_STATES
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await?;

    info!("Starting bot client...");
    client.start().await.map_err(Into::into)
}
