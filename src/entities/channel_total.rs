//! Channel total entity - Cumulative time one user has spent in one channel.
//!
//! One row per (user, channel name) pair. `total_seconds` and
//! `session_count` are accumulated every time a session for that pair
//! closes, never recomputed from the session log.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-user per-channel accumulator database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "channel_totals")]
pub struct Model {
    /// Unique identifier for the accumulator row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user ID the totals belong to
    pub user_id: String,
    /// Name of the voice channel
    pub channel_name: String,
    /// Total connected time in seconds across all sessions
    pub total_seconds: f64,
    /// Number of completed sessions in this channel
    pub session_count: i64,
}

/// Channel totals have no relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
