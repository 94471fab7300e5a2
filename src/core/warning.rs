//! Warning business logic - moderation warnings with optional expiry.
//!
//! Warnings are plain CRUD over one table. A warning may carry a duration;
//! expired warnings stay in the table for the audit trail but are filtered
//! out of listings.

use chrono::Duration;
use sea_orm::{QueryOrder, Set, prelude::*};

use crate::{
    entities::{Warning, warning},
    errors::{Error, Result},
};

/// Parses a compact duration string like `30s`, `15m`, `2h`, `1d`, or a
/// concatenation such as `1d12h30m`, into whole seconds.
///
/// Returns `None` for anything malformed, for unknown unit letters, and for
/// zero or overflowing totals.
#[must_use]
pub fn parse_duration(input: &str) -> Option<i64> {
    let mut total: i64 = 0;
    let mut digits = String::new();
    let mut seen_unit = false;

    for ch in input.trim().chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
        } else {
            if digits.is_empty() {
                return None;
            }
            let value: i64 = digits.parse().ok()?;
            digits.clear();

            let multiplier = match ch.to_ascii_lowercase() {
                'd' => 86_400,
                'h' => 3_600,
                'm' => 60,
                's' => 1,
                _ => return None,
            };
            total = total.checked_add(value.checked_mul(multiplier)?)?;
            seen_unit = true;
        }
    }

    // Trailing digits without a unit are malformed.
    if !digits.is_empty() || !seen_unit || total <= 0 {
        return None;
    }

    Some(total)
}

/// Whether a warning has outlived its duration at the given instant.
///
/// Warnings without a duration never expire.
#[must_use]
pub fn is_expired(model: &warning::Model, now: DateTimeUtc) -> bool {
    model
        .duration_seconds
        .is_some_and(|secs| now > model.issued_at + Duration::seconds(secs))
}

/// Records a new warning against a user.
pub async fn create_warning(
    db: &DatabaseConnection,
    guild_id: String,
    user_id: String,
    moderator_id: String,
    reason: String,
    duration_seconds: Option<i64>,
    issued_at: DateTimeUtc,
) -> Result<warning::Model> {
    let model = warning::ActiveModel {
        guild_id: Set(guild_id),
        user_id: Set(user_id),
        moderator_id: Set(moderator_id),
        reason: Set(reason),
        issued_at: Set(issued_at),
        duration_seconds: Set(duration_seconds),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}

/// Deletes a warning by id, returning the removed record.
///
/// # Errors
/// Returns [`Error::WarningNotFound`] when no warning has that id.
pub async fn remove_warning(db: &DatabaseConnection, id: i64) -> Result<warning::Model> {
    let existing = Warning::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::WarningNotFound { id })?;

    let removed = existing.clone();
    existing.delete(db).await?;
    Ok(removed)
}

/// Lists a user's warnings in a guild that have not expired, oldest first.
pub async fn active_warnings(
    db: &DatabaseConnection,
    guild_id: &str,
    user_id: &str,
    now: DateTimeUtc,
) -> Result<Vec<warning::Model>> {
    let all = Warning::find()
        .filter(warning::Column::GuildId.eq(guild_id))
        .filter(warning::Column::UserId.eq(user_id))
        .order_by_asc(warning::Column::Id)
        .all(db)
        .await?;

    Ok(all
        .into_iter()
        .filter(|model| !is_expired(model, now))
        .collect())
}
