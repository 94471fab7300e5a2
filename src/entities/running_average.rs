//! Running average entity - Incrementally maintained mean for one user.
//!
//! Two kinds exist per user: `"wait"` (time alone in a channel before a
//! second member joined) and `"response"` (time a waiting user sat before
//! someone's arrival was observed). Only the mean and sample count are
//! stored; raw samples are not retained, so historical distributions cannot
//! be reconstructed.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Running average database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "running_averages")]
pub struct Model {
    /// Unique identifier for the average row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user ID the average belongs to
    pub user_id: String,
    /// Which metric this row tracks: `"wait"` or `"response"`
    pub kind: String,
    /// Current mean value in seconds
    pub average: f64,
    /// Number of samples folded into the mean
    pub sample_count: i64,
}

/// Running averages have no relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
