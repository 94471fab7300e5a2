//! Voice statistics Discord commands - stats, leaderboard, and reset.
//!
//! These commands are the read side of the presence tracker: they query the
//! aggregate store through [`crate::core::stats`] and format the results
//! with [`crate::core::report`]. The reset command is deliberately
//! self-service only: it always targets the invoker, so nobody can wipe
//! another user's history.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::{report, stats},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Shows voice activity statistics for a user.
    ///
    /// Displays total tracked time, average wait until someone joined them,
    /// average response time, session count, a per-channel breakdown, and
    /// recent channel switches.
    #[poise::command(slash_command, prefix_command, aliases("vct", "vcs"))]
    pub async fn vcstats(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "User to look up (defaults to you)"] user: Option<serenity::User>,
    ) -> Result<()> {
        let data = ctx.data();
        let target = user.unwrap_or_else(|| ctx.author().clone());

        let Some(stats) = stats::get_user_stats(
            &data.database,
            &target.id.to_string(),
            data.settings.recent_switches,
        )
        .await?
        else {
            ctx.say(format!(
                "No voice data found for {}.",
                target.display_name()
            ))
            .await?;
            return Ok(());
        };

        let format_average =
            |value: Option<f64>| value.map_or_else(|| "No data".to_string(), report::format_seconds_precise);

        let mut embed = serenity::CreateEmbed::default()
            .title(format!("Voice Stats for {}", target.display_name()))
            .color(0x009B_59B6)
            .field(
                "Total Voice Time",
                report::format_duration(stats.total_seconds),
                false,
            )
            .field(
                "Avg Time Until Someone Joined",
                format_average(stats.average_wait_seconds),
                false,
            )
            .field(
                "Avg Response Time",
                format_average(stats.average_response_seconds),
                false,
            )
            .field("Sessions Tracked", stats.session_count.to_string(), false);

        if !stats.per_channel.is_empty() {
            let lines: Vec<String> = stats
                .per_channel
                .iter()
                .map(report::format_channel_usage)
                .collect();
            embed = embed.field("Time per Channel", lines.join("\n"), false);
        }

        if !stats.recent_switches.is_empty() {
            let lines: Vec<String> = stats
                .recent_switches
                .iter()
                .map(report::format_switch)
                .collect();
            embed = embed.field("Recent Switches", lines.join("\n"), false);
        }

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Ranks users by total tracked voice time.
    #[poise::command(slash_command, prefix_command, aliases("vclb"))]
    pub async fn vcleaderboard(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Number of rows to show"] size: Option<usize>,
    ) -> Result<()> {
        let data = ctx.data();
        let top_n = size.unwrap_or(data.settings.leaderboard_size);

        let entries = stats::get_leaderboard(&data.database, top_n).await?;
        if entries.is_empty() {
            ctx.say("No leaderboard data available yet.").await?;
            return Ok(());
        }

        let mut response = String::from("🏆 **Voice Leaderboard**\n\n");
        for (index, entry) in entries.iter().enumerate() {
            let name = resolve_display_name(&ctx, &entry.user_id).await;
            writeln!(
                &mut response,
                "{}. **{}**: {}",
                index + 1,
                name,
                report::format_duration(entry.total_seconds)
            )?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Resets your own voice statistics.
    ///
    /// Always targets the invoker; there is no way to reset someone else's
    /// stats. Running it with no recorded stats is a harmless no-op.
    #[poise::command(slash_command, prefix_command)]
    pub async fn vcreset(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let user_id = ctx.author().id.to_string();

        let had_stats = stats::get_user_stats(&data.database, &user_id, 1)
            .await?
            .is_some();
        stats::reset_user(&data.database, &user_id).await?;

        if had_stats {
            ctx.say("✅ Your voice stats have been reset.").await?;
        } else {
            ctx.say("No stats found to reset.").await?;
        }
        Ok(())
    }

    /// Resolves a stored user id to a display name, falling back to the
    /// raw id when the user is no longer reachable.
    async fn resolve_display_name(
        ctx: &poise::Context<'_, BotData, Error>,
        user_id: &str,
    ) -> String {
        if let Ok(id) = user_id.parse::<u64>() {
            let user_id = serenity::UserId::new(id);
            if let Ok(user) = user_id.to_user(ctx.serenity_context()).await {
                return user.display_name().to_string();
            }
        }
        format!("User {user_id}")
    }
}

// Re-export all commands
pub use inner::*;
