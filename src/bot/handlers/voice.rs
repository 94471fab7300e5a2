//! Voice-state update handling.
//!
//! Converts serenity's `VoiceStateUpdate` events into owned
//! [`VoiceEvent`] values (snapshotting channel names and member lists from
//! the gateway cache, which serenity updates before dispatching the event)
//! and feeds them to the tracker one at a time. Persistence failures are
//! logged and swallowed here: the tracker must keep accepting events, and
//! these are best-effort analytics.

use poise::serenity_prelude as serenity;
use tracing::error;

use crate::{
    bot::BotData,
    core::event::{ChannelSnapshot, VoiceEvent},
    errors::{Error, Result},
};

/// Dispatches gateway events the bot cares about.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    if let serenity::FullEvent::VoiceStateUpdate { old, new } = event {
        let Some(voice_event) = snapshot_transition(ctx, old.as_ref(), new) else {
            return Ok(());
        };

        let now = chrono::Utc::now();
        // Locking for the whole call serializes event processing; the
        // tracker requires that no two process() calls interleave.
        let mut tracker = data.tracker.lock().await;
        if let Err(e) = tracker.process(&data.database, &voice_event, now).await {
            error!(
                "Failed to record voice transition for {}: {e}",
                voice_event.user_id
            );
        }
    }

    Ok(())
}

/// Builds an owned event from the raw voice states, or `None` when the
/// event is not usable (no guild, uncached guild, or no channel on either
/// side).
fn snapshot_transition(
    ctx: &serenity::Context,
    old: Option<&serenity::VoiceState>,
    new: &serenity::VoiceState,
) -> Option<VoiceEvent> {
    let guild_id = new.guild_id?;
    let previous_id = old.and_then(|state| state.channel_id);
    let current_id = new.channel_id;
    if previous_id.is_none() && current_id.is_none() {
        return None;
    }

    let guild = ctx.cache.guild(guild_id)?;
    let previous = previous_id.map(|id| channel_snapshot(&guild, id));
    let current = current_id.map(|id| channel_snapshot(&guild, id));

    Some(VoiceEvent {
        user_id: new.user_id.to_string(),
        previous,
        current,
    })
}

/// Snapshots a channel's name and current voice membership from the cache.
///
/// The name falls back to `"Unknown"` when the channel is no longer in the
/// cache (deleted mid-event); the membership list is still valid because it
/// comes from the guild's voice states, not the channel object.
fn channel_snapshot(guild: &serenity::Guild, channel_id: serenity::ChannelId) -> ChannelSnapshot {
    let name = guild
        .channels
        .get(&channel_id)
        .map_or_else(|| "Unknown".to_string(), |channel| channel.name.clone());

    let member_ids = guild
        .voice_states
        .values()
        .filter(|state| state.channel_id == Some(channel_id))
        .map(|state| state.user_id.to_string())
        .collect();

    ChannelSnapshot {
        id: channel_id.to_string(),
        name,
        member_ids,
    }
}
