//! Shared test utilities for `VoiceBuddy`.
//!
//! This module provides common helper functions for setting up test
//! databases and building voice events without going through a gateway.

use crate::{
    core::event::{ChannelSnapshot, VoiceEvent},
    errors::Result,
};
use sea_orm::{DatabaseConnection, prelude::DateTimeUtc};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a channel snapshot with the given membership.
#[must_use]
pub fn snapshot(id: &str, name: &str, member_ids: &[&str]) -> ChannelSnapshot {
    ChannelSnapshot {
        id: id.to_string(),
        name: name.to_string(),
        member_ids: member_ids.iter().map(|uid| (*uid).to_string()).collect(),
    }
}

/// A connect: no channel before, `joined` after.
#[must_use]
pub fn connect_event(user_id: &str, joined: ChannelSnapshot) -> VoiceEvent {
    VoiceEvent {
        user_id: user_id.to_string(),
        previous: None,
        current: Some(joined),
    }
}

/// A disconnect: `left` before, no channel after.
#[must_use]
pub fn disconnect_event(user_id: &str, left: ChannelSnapshot) -> VoiceEvent {
    VoiceEvent {
        user_id: user_id.to_string(),
        previous: Some(left),
        current: None,
    }
}

/// A switch between two different channels.
#[must_use]
pub fn switch_event(user_id: &str, from: ChannelSnapshot, to: ChannelSnapshot) -> VoiceEvent {
    VoiceEvent {
        user_id: user_id.to_string(),
        previous: Some(from),
        current: Some(to),
    }
}

/// A same-channel re-notification (mute toggle and the like).
#[must_use]
pub fn same_channel_event(user_id: &str, channel: ChannelSnapshot) -> VoiceEvent {
    VoiceEvent {
        user_id: user_id.to_string(),
        previous: Some(channel.clone()),
        current: Some(channel),
    }
}

/// Fixed timestamp `seconds` after the Unix epoch, for deterministic tests.
#[must_use]
pub fn ts(seconds: i64) -> DateTimeUtc {
    chrono::DateTime::from_timestamp(seconds, 0).unwrap_or_default()
}
