//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require database
//! operations and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    ///
    /// This is a simple health check command that doesn't require any database operations.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**VoiceBuddy Help**\n\
        Here is a summary of all available commands for VoiceBuddy.\n\n\
        **Voice Statistics**\n\
        • `/vcstats [user]` - Shows voice stats: total time, average wait, per-channel breakdown.\n\
        • `/vcleaderboard [size]` - Ranks users by total tracked voice time.\n\
        • `/vcreset` - Resets your own voice stats. Only yours; this cannot be undone.\n\n\
        **Moderation** (requires Manage Messages)\n\
        • `/warn <user> [duration] [reason]` - Issues a warning, optionally expiring (e.g. `2h`, `1d`).\n\
        • `/unwarn <id>` - Removes a warning by id.\n\
        • `/warnings [user]` - Lists a user's active warnings.\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
