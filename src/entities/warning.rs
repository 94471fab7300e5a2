//! Warning entity - A moderation warning issued against a user.
//!
//! Warnings with a duration expire silently: expired rows are filtered from
//! listings rather than deleted, so the history stays auditable.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Moderation warning database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "warnings")]
pub struct Model {
    /// Unique identifier for the warning
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Guild the warning was issued in
    pub guild_id: String,
    /// Discord user ID the warning applies to
    pub user_id: String,
    /// Discord user ID of the issuing moderator
    pub moderator_id: String,
    /// Reason given by the moderator
    pub reason: String,
    /// When the warning was issued
    pub issued_at: DateTimeUtc,
    /// Lifetime in seconds; None means the warning never expires
    pub duration_seconds: Option<i64>,
}

/// Warnings have no relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
