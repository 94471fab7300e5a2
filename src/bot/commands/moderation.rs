//! Moderation Discord commands - warn, unwarn, and warnings.
//!
//! All three require the Manage Messages permission (enforced by poise
//! before the command body runs) and only operate inside a guild.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::warning,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Issues a warning against a user, optionally expiring after a duration.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "MANAGE_MESSAGES"
    )]
    pub async fn warn(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "User to warn"] user: serenity::User,
        #[description = "How long the warning lasts (e.g. 30s, 15m, 2h, 1d)"] duration: Option<
            String,
        >,
        #[description = "Reason for the warning"] reason: Option<String>,
    ) -> Result<()> {
        let Some(guild_id) = ctx.guild_id() else {
            ctx.say("This command can only be used in a server.").await?;
            return Ok(());
        };

        let duration_seconds = match &duration {
            Some(input) => {
                let Some(seconds) = warning::parse_duration(input) else {
                    ctx.say(format!(
                        "❌ Invalid duration '{input}'. Use something like `30s`, `15m`, `2h`, or `1d`."
                    ))
                    .await?;
                    return Ok(());
                };
                Some(seconds)
            }
            None => None,
        };

        let reason = reason.unwrap_or_else(|| "No reason provided".to_string());
        let created = warning::create_warning(
            &ctx.data().database,
            guild_id.to_string(),
            user.id.to_string(),
            ctx.author().id.to_string(),
            reason.clone(),
            duration_seconds,
            chrono::Utc::now(),
        )
        .await?;

        let duration_text = duration.unwrap_or_else(|| "∞".to_string());
        ctx.say(format!(
            "⚠️ **User Warned**\n\
            User: {} (`{}`)\n\
            Moderator: {}\n\
            Reason: {reason}\n\
            Duration: {duration_text}\n\
            Warning ID: `{}`",
            user.display_name(),
            user.id,
            ctx.author().display_name(),
            created.id
        ))
        .await?;

        Ok(())
    }

    /// Removes a warning by its id.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        required_permissions = "MANAGE_MESSAGES"
    )]
    pub async fn unwarn(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Warning id to remove"] warning_id: i64,
    ) -> Result<()> {
        match warning::remove_warning(&ctx.data().database, warning_id).await {
            Ok(removed) => {
                ctx.say(format!(
                    "✅ Removed warning `{}` for <@{}> (reason was: {}).",
                    removed.id, removed.user_id, removed.reason
                ))
                .await?;
            }
            Err(Error::WarningNotFound { id }) => {
                ctx.say(format!("❌ No warning found with id `{id}`.")).await?;
            }
            Err(other) => return Err(other),
        }
        Ok(())
    }

    /// Lists a user's active (non-expired) warnings in this guild.
    #[poise::command(slash_command, prefix_command, guild_only, aliases("warns"))]
    pub async fn warnings(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "User to look up (defaults to you)"] user: Option<serenity::User>,
    ) -> Result<()> {
        let Some(guild_id) = ctx.guild_id() else {
            ctx.say("This command can only be used in a server.").await?;
            return Ok(());
        };
        let target = user.unwrap_or_else(|| ctx.author().clone());

        let active = warning::active_warnings(
            &ctx.data().database,
            &guild_id.to_string(),
            &target.id.to_string(),
            chrono::Utc::now(),
        )
        .await?;

        if active.is_empty() {
            ctx.say(format!(
                "{} has no active warnings.",
                target.display_name()
            ))
            .await?;
            return Ok(());
        }

        let mut response = format!("Active warnings for **{}**:\n\n", target.display_name());
        for model in active.iter().take(10) {
            let duration_text = model
                .duration_seconds
                .map_or_else(|| "∞".to_string(), |secs| format!("{secs}s"));
            writeln!(
                &mut response,
                "`{}` - {} (by <@{}>, <t:{}:R>, duration: {duration_text})",
                model.id,
                model.reason,
                model.moderator_id,
                model.issued_at.timestamp()
            )?;
        }

        ctx.say(response).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
