//! Channel switch entity - One user's move between two voice channels.
//!
//! Append-only log; listings read the most recent N rows for a user.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Channel switch database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "channel_switches")]
pub struct Model {
    /// Unique identifier for the switch record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user ID who switched
    pub user_id: String,
    /// Name of the channel the user left
    pub from_channel: String,
    /// Name of the channel the user joined
    pub to_channel: String,
    /// When the switch happened
    pub switched_at: DateTimeUtc,
}

/// Channel switches have no relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
