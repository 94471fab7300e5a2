//! Voice session entity - One completed stay in a voice channel.
//!
//! A row is appended exactly once when a tracked user disconnects from or
//! switches out of a channel. Rows are immutable once written; aggregate
//! queries read from `channel_totals` instead of re-scanning this log.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Completed voice session database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "voice_sessions")]
pub struct Model {
    /// Unique identifier for the session record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user ID the session belongs to
    pub user_id: String,
    /// Name of the voice channel the session took place in
    pub channel_name: String,
    /// When the user connected
    pub started_at: DateTimeUtc,
    /// When the user disconnected or switched away
    pub ended_at: DateTimeUtc,
    /// Session length in seconds
    pub duration_seconds: f64,
}

/// Voice sessions have no relations; they are an append-only log
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
