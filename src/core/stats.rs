//! Aggregate store and stats query service.
//!
//! All durable mutation for the presence tracker lives here: appending
//! completed sessions, accumulating per-channel totals, folding samples into
//! running averages, logging channel switches, and deleting a user's rows on
//! reset. The read side composes those tables into [`UserStats`] and the
//! leaderboard. Multi-row updates run inside a database transaction so no
//! partial accumulation is ever visible, and a reset cannot interleave with
//! a concurrent stat write for the same user.

use std::collections::HashMap;

use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};

use crate::{
    entities::{
        ChannelSwitch, ChannelTotal, RunningAverage, VoiceSession, channel_switch, channel_total,
        running_average, voice_session,
    },
    errors::Result,
};

/// Which running average a sample belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    /// Time a lone occupant waited before a second member joined
    Wait,
    /// Time a waiting user sat before company was observed
    Response,
}

impl SampleKind {
    /// Storage key for the kind column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wait => "wait",
            Self::Response => "response",
        }
    }
}

/// A session the tracker just closed, ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedSession {
    /// Discord user ID the session belongs to
    pub user_id: String,
    /// Channel the session took place in
    pub channel_name: String,
    /// When the user connected
    pub started_at: DateTimeUtc,
    /// When the user disconnected or switched away
    pub ended_at: DateTimeUtc,
    /// Session length in seconds
    pub duration_seconds: f64,
}

/// One user's cumulative usage of one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelUsage {
    /// Channel name
    pub channel_name: String,
    /// Total connected time in seconds
    pub total_seconds: f64,
    /// Number of completed sessions
    pub session_count: i64,
}

/// Everything the stats command needs for one user, as pure data.
#[derive(Debug, Clone, PartialEq)]
pub struct UserStats {
    /// Discord user ID
    pub user_id: String,
    /// Total tracked time in seconds across all channels
    pub total_seconds: f64,
    /// Number of completed sessions across all channels
    pub session_count: i64,
    /// Mean wait time in seconds, if any wait was ever sampled
    pub average_wait_seconds: Option<f64>,
    /// Mean response time in seconds, if any response was ever sampled
    pub average_response_seconds: Option<f64>,
    /// Per-channel breakdown, in first-recorded order
    pub per_channel: Vec<ChannelUsage>,
    /// Most recent channel switches, newest first
    pub recent_switches: Vec<channel_switch::Model>,
}

/// One row of the leaderboard.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    /// Discord user ID
    pub user_id: String,
    /// Total tracked time in seconds
    pub total_seconds: f64,
}

/// Appends a completed session and accumulates the channel totals.
///
/// Both writes happen in one transaction: either the session row and the
/// updated accumulator land together, or neither does.
pub async fn record_session(
    db: &DatabaseConnection,
    closed: &ClosedSession,
) -> Result<voice_session::Model> {
    let txn = db.begin().await?;

    let session = voice_session::ActiveModel {
        user_id: Set(closed.user_id.clone()),
        channel_name: Set(closed.channel_name.clone()),
        started_at: Set(closed.started_at),
        ended_at: Set(closed.ended_at),
        duration_seconds: Set(closed.duration_seconds),
        ..Default::default()
    };
    let inserted = session.insert(&txn).await?;

    let existing = ChannelTotal::find()
        .filter(channel_total::Column::UserId.eq(&closed.user_id))
        .filter(channel_total::Column::ChannelName.eq(&closed.channel_name))
        .one(&txn)
        .await?;

    match existing {
        Some(row) => {
            let total_seconds = row.total_seconds + closed.duration_seconds;
            let session_count = row.session_count + 1;
            let mut active: channel_total::ActiveModel = row.into();
            active.total_seconds = Set(total_seconds);
            active.session_count = Set(session_count);
            active.update(&txn).await?;
        }
        None => {
            let fresh = channel_total::ActiveModel {
                user_id: Set(closed.user_id.clone()),
                channel_name: Set(closed.channel_name.clone()),
                total_seconds: Set(closed.duration_seconds),
                session_count: Set(1),
                ..Default::default()
            };
            fresh.insert(&txn).await?;
        }
    }

    txn.commit().await?;
    Ok(inserted)
}

/// Folds one sample into a user's running average for the given kind.
///
/// Uses the O(1) incremental mean update
/// `new_avg = (old_avg * count + sample) / (count + 1)`; raw samples are
/// not retained.
pub async fn record_sample(
    db: &DatabaseConnection,
    kind: SampleKind,
    user_id: &str,
    sample: f64,
) -> Result<()> {
    let txn = db.begin().await?;

    let existing = RunningAverage::find()
        .filter(running_average::Column::UserId.eq(user_id))
        .filter(running_average::Column::Kind.eq(kind.as_str()))
        .one(&txn)
        .await?;

    match existing {
        Some(row) => {
            #[allow(clippy::cast_precision_loss)]
            let count = row.sample_count as f64;
            let updated = (row.average * count + sample) / (count + 1.0);
            let next_count = row.sample_count + 1;
            let mut active: running_average::ActiveModel = row.into();
            active.average = Set(updated);
            active.sample_count = Set(next_count);
            active.update(&txn).await?;
        }
        None => {
            let fresh = running_average::ActiveModel {
                user_id: Set(user_id.to_string()),
                kind: Set(kind.as_str().to_string()),
                average: Set(sample),
                sample_count: Set(1),
                ..Default::default()
            };
            fresh.insert(&txn).await?;
        }
    }

    txn.commit().await?;
    Ok(())
}

/// Appends a channel switch record.
pub async fn record_switch(
    db: &DatabaseConnection,
    user_id: &str,
    from_channel: &str,
    to_channel: &str,
    at: DateTimeUtc,
) -> Result<channel_switch::Model> {
    let switch = channel_switch::ActiveModel {
        user_id: Set(user_id.to_string()),
        from_channel: Set(from_channel.to_string()),
        to_channel: Set(to_channel.to_string()),
        switched_at: Set(at),
        ..Default::default()
    };

    switch.insert(db).await.map_err(Into::into)
}

/// Composes a user's durable rows into [`UserStats`].
///
/// Returns `None` only when the user has no rows in any table. A user with
/// a wait sample but no completed session still gets stats with zero
/// totals.
pub async fn get_user_stats(
    db: &DatabaseConnection,
    user_id: &str,
    switch_limit: u64,
) -> Result<Option<UserStats>> {
    let totals = ChannelTotal::find()
        .filter(channel_total::Column::UserId.eq(user_id))
        .order_by_asc(channel_total::Column::Id)
        .all(db)
        .await?;

    let averages = RunningAverage::find()
        .filter(running_average::Column::UserId.eq(user_id))
        .all(db)
        .await?;

    let recent_switches = ChannelSwitch::find()
        .filter(channel_switch::Column::UserId.eq(user_id))
        .order_by_desc(channel_switch::Column::Id)
        .limit(switch_limit)
        .all(db)
        .await?;

    if totals.is_empty() && averages.is_empty() && recent_switches.is_empty() {
        return Ok(None);
    }

    let total_seconds = totals.iter().map(|row| row.total_seconds).sum();
    let session_count = totals.iter().map(|row| row.session_count).sum();

    let average_of = |kind: SampleKind| {
        averages
            .iter()
            .find(|row| row.kind == kind.as_str())
            .map(|row| row.average)
    };

    let per_channel = totals
        .into_iter()
        .map(|row| ChannelUsage {
            channel_name: row.channel_name,
            total_seconds: row.total_seconds,
            session_count: row.session_count,
        })
        .collect();

    Ok(Some(UserStats {
        user_id: user_id.to_string(),
        total_seconds,
        session_count,
        average_wait_seconds: average_of(SampleKind::Wait),
        average_response_seconds: average_of(SampleKind::Response),
        per_channel,
        recent_switches,
    }))
}

/// Ranks users by total tracked seconds, descending, truncated to `top_n`.
///
/// Ties keep first-recorded order: rows are folded in insertion order and
/// the sort is stable, so repeated calls over the same data return the same
/// ranking.
pub async fn get_leaderboard(
    db: &DatabaseConnection,
    top_n: usize,
) -> Result<Vec<LeaderboardEntry>> {
    let totals = ChannelTotal::find()
        .order_by_asc(channel_total::Column::Id)
        .all(db)
        .await?;

    let mut order: Vec<String> = Vec::new();
    let mut sums: HashMap<String, f64> = HashMap::new();
    for row in totals {
        if !sums.contains_key(&row.user_id) {
            order.push(row.user_id.clone());
        }
        *sums.entry(row.user_id).or_insert(0.0) += row.total_seconds;
    }

    let mut entries: Vec<LeaderboardEntry> = order
        .into_iter()
        .map(|user_id| {
            let total_seconds = sums[&user_id];
            LeaderboardEntry {
                user_id,
                total_seconds,
            }
        })
        .collect();

    entries.sort_by(|a, b| b.total_seconds.total_cmp(&a.total_seconds));
    entries.truncate(top_n);

    Ok(entries)
}

/// Deletes every durable record for a user across all four tables.
///
/// Idempotent: resetting a user with no rows is a no-op. The deletes share
/// one transaction so a concurrent stat write for the same user cannot
/// observe a half-reset state.
pub async fn reset_user(db: &DatabaseConnection, user_id: &str) -> Result<()> {
    let txn = db.begin().await?;

    VoiceSession::delete_many()
        .filter(voice_session::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    ChannelTotal::delete_many()
        .filter(channel_total::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    RunningAverage::delete_many()
        .filter(running_average::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    ChannelSwitch::delete_many()
        .filter(channel_switch::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;
    Ok(())
}
