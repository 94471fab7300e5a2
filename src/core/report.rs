//! Presentation helpers for stats output.
//!
//! The query service in [`crate::core::stats`] returns pure data; the
//! formatting that turns seconds into something a human wants to read lives
//! here so the bot layer stays thin and the helpers stay testable.

use crate::core::stats::ChannelUsage;
use crate::entities::channel_switch;

/// Formats a duration in seconds as a compact human-readable string.
///
/// Sub-second precision is dropped: `5025.7` becomes `"1h 23m 45s"`.
#[must_use]
pub fn format_duration(total_seconds: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = total_seconds.max(0.0) as u64;

    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes:02}m {seconds:02}s")
    } else if hours > 0 {
        format!("{hours}h {minutes:02}m {seconds:02}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}

/// Formats a small duration with two decimals, for wait/response averages.
#[must_use]
pub fn format_seconds_precise(seconds: f64) -> String {
    format!("{seconds:.2} seconds")
}

/// Summary line for one channel: average session length over N sessions.
#[must_use]
pub fn format_channel_usage(usage: &ChannelUsage) -> String {
    #[allow(clippy::cast_precision_loss)]
    let average = if usage.session_count > 0 {
        usage.total_seconds / usage.session_count as f64
    } else {
        0.0
    };

    format!(
        "**{}**: {} avg over {} session{}",
        usage.channel_name,
        format_duration(average),
        usage.session_count,
        if usage.session_count == 1 { "" } else { "s" }
    )
}

/// Summary line for one channel switch, newest-first listings.
#[must_use]
pub fn format_switch(switch: &channel_switch::Model) -> String {
    format!(
        "{} → {} (<t:{}:R>)",
        switch.from_channel,
        switch.to_channel,
        switch.switched_at.timestamp()
    )
}
