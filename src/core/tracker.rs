//! Voice presence tracker - session registry, wait tracker, and the
//! transition state machine.
//!
//! [`VoiceTracker`] owns the transient per-user session map and the
//! per-channel wait-window map, and folds one [`VoiceEvent`] at a time into
//! them, emitting completed sessions, wait samples, response samples, and
//! switch records to the durable store. Callers must serialize `process`
//! invocations (the bot keeps the tracker behind a `tokio::sync::Mutex`);
//! the maps are read and written without internal locking.

use std::collections::HashMap;

use sea_orm::DatabaseConnection;
use tracing::debug;

use crate::{
    core::{
        event::{ChannelSnapshot, Transition, VoiceEvent},
        stats::{self, ClosedSession, SampleKind},
    },
    errors::Result,
};

/// Sea-orm's chrono-backed UTC timestamp, re-used for tracker arithmetic.
pub type Timestamp = sea_orm::prelude::DateTimeUtc;

/// One user's open presence interval in a voice channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSession {
    /// Channel the session is taking place in
    pub channel_id: String,
    /// Channel name, captured at join time for the durable record
    pub channel_name: String,
    /// When the user connected
    pub joined_at: Timestamp,
    /// Whether the user is still waiting for company since joining
    pub waiting: bool,
    /// When the current wait began (equals `joined_at` until cleared)
    pub wait_started_at: Timestamp,
}

/// The interval a channel has had exactly one occupant.
#[derive(Debug, Clone, PartialEq)]
pub struct WaitWindow {
    /// The original lone occupant, credited with the wait sample
    pub user_id: String,
    /// When the channel went from empty to one occupant
    pub opened_at: Timestamp,
}

/// Event-driven state machine over voice-channel membership.
///
/// Holds at most one [`ActiveSession`] per user and at most one
/// [`WaitWindow`] per channel. All durable effects go through
/// [`crate::core::stats`].
#[derive(Debug, Default)]
pub struct VoiceTracker {
    sessions: HashMap<String, ActiveSession>,
    wait_windows: HashMap<String, WaitWindow>,
}

impl VoiceTracker {
    /// Creates an empty tracker. One instance lives for the bot process.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The open session for a user, if any.
    #[must_use]
    pub fn session(&self, user_id: &str) -> Option<&ActiveSession> {
        self.sessions.get(user_id)
    }

    /// Number of currently open sessions.
    #[must_use]
    pub fn open_session_count(&self) -> usize {
        self.sessions.len()
    }

    /// The open wait window for a channel, if any.
    #[must_use]
    pub fn wait_window(&self, channel_id: &str) -> Option<&WaitWindow> {
        self.wait_windows.get(channel_id)
    }

    /// Folds one voice-state change into the tracker.
    ///
    /// Events must be processed one at a time in arrival order. A returned
    /// error means a durable write failed after the in-memory state already
    /// advanced; the caller should log it and keep feeding events (these are
    /// best-effort analytics, and the event is not replayed).
    pub async fn process(
        &mut self,
        db: &DatabaseConnection,
        event: &VoiceEvent,
        now: Timestamp,
    ) -> Result<()> {
        let Some(transition) = event.classify() else {
            return Ok(());
        };

        match transition {
            Transition::Connect { joined } => {
                self.handle_connect(db, &event.user_id, joined, now).await?;
            }
            Transition::Disconnect { left } => {
                self.handle_disconnect(db, &event.user_id, left, now)
                    .await?;
            }
            Transition::Switch { from, to } => {
                self.handle_disconnect(db, &event.user_id, from, now)
                    .await?;
                self.handle_connect(db, &event.user_id, to, now).await?;
                stats::record_switch(db, &event.user_id, &from.name, &to.name, now).await?;
            }
            Transition::SameChannel { channel } => {
                self.handle_same_channel(db, &event.user_id, channel, now)
                    .await?;
            }
        }

        Ok(())
    }

    /// Opens a session for the user and maintains the channel's wait window.
    ///
    /// Joining an empty channel opens a window; arriving as the second
    /// occupant closes it and credits the elapsed wait to the *original*
    /// occupant, not the arrival.
    async fn handle_connect(
        &mut self,
        db: &DatabaseConnection,
        user_id: &str,
        joined: &ChannelSnapshot,
        now: Timestamp,
    ) -> Result<()> {
        debug!(user_id, channel = %joined.name, "voice connect");

        self.sessions.insert(
            user_id.to_string(),
            ActiveSession {
                channel_id: joined.id.clone(),
                channel_name: joined.name.clone(),
                joined_at: now,
                waiting: true,
                wait_started_at: now,
            },
        );

        match joined.member_count() {
            1 => {
                self.wait_windows.insert(
                    joined.id.clone(),
                    WaitWindow {
                        user_id: user_id.to_string(),
                        opened_at: now,
                    },
                );
            }
            2 => {
                if let Some(window) = self.wait_windows.remove(&joined.id) {
                    let elapsed = seconds_between(window.opened_at, now);
                    stats::record_sample(db, SampleKind::Wait, &window.user_id, elapsed).await?;
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// Closes the user's session, if one is tracked, and discards the
    /// channel's wait window when the channel emptied out.
    ///
    /// A disconnect for an untracked user is a silent no-op; this happens
    /// after a restart dropped the in-memory maps, and durable totals are
    /// unaffected because nothing was in flight.
    async fn handle_disconnect(
        &mut self,
        db: &DatabaseConnection,
        user_id: &str,
        left: &ChannelSnapshot,
        now: Timestamp,
    ) -> Result<()> {
        debug!(user_id, channel = %left.name, "voice disconnect");

        // The lone occupant leaving ends the window with no sample. Done
        // before the durable write so the maps stay consistent even if the
        // write fails.
        if left.member_count() == 0 {
            self.wait_windows.remove(&left.id);
        }

        if let Some(session) = self.sessions.remove(user_id) {
            let closed = ClosedSession {
                user_id: user_id.to_string(),
                channel_name: left.name.clone(),
                started_at: session.joined_at,
                ended_at: now,
                duration_seconds: seconds_between(session.joined_at, now),
            };
            stats::record_session(db, &closed).await?;
        }

        Ok(())
    }

    /// Scans open sessions for waiting users now revealed to have company.
    ///
    /// A same-channel notification for one member is the only signal that
    /// another member's wait is over, so every other still-waiting session
    /// whose user appears in the channel's member list gets a response
    /// sample. The scan is O(open sessions) per event, which stays small
    /// (bounded by voice occupancy across the bot's guilds).
    async fn handle_same_channel(
        &mut self,
        db: &DatabaseConnection,
        user_id: &str,
        channel: &ChannelSnapshot,
        now: Timestamp,
    ) -> Result<()> {
        let revealed: Vec<String> = self
            .sessions
            .iter()
            .filter(|(uid, session)| {
                uid.as_str() != user_id && session.waiting && channel.contains(uid)
            })
            .map(|(uid, _)| uid.clone())
            .collect();

        for uid in revealed {
            if let Some(session) = self.sessions.get_mut(&uid) {
                let response = seconds_between(session.wait_started_at, now);
                // Cleared before the write so a failed persist cannot
                // double-count the same waiter on the next notification.
                session.waiting = false;
                stats::record_sample(db, SampleKind::Response, &uid, response).await?;
            }
        }

        Ok(())
    }
}

/// Elapsed seconds between two timestamps, with millisecond precision.
#[allow(clippy::cast_precision_loss)]
fn seconds_between(start: Timestamp, end: Timestamp) -> f64 {
    (end - start).num_milliseconds() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]

    use super::*;
    use crate::core::stats::get_user_stats;
    use crate::entities::{RunningAverage, VoiceSession};
    use crate::test_utils::*;
    use sea_orm::EntityTrait;

    #[tokio::test]
    async fn test_connect_opens_session_and_wait_window() -> Result<()> {
        let db = setup_test_db().await?;
        let mut tracker = VoiceTracker::new();

        let event = connect_event("alice", snapshot("c1", "General", &["alice"]));
        tracker.process(&db, &event, ts(0)).await?;

        let session = tracker.session("alice").unwrap();
        assert_eq!(session.channel_id, "c1");
        assert!(session.waiting);
        assert_eq!(session.joined_at, ts(0));

        let window = tracker.wait_window("c1").unwrap();
        assert_eq!(window.user_id, "alice");
        assert_eq!(window.opened_at, ts(0));

        Ok(())
    }

    #[tokio::test]
    async fn test_second_arrival_closes_wait_window_and_credits_waiter() -> Result<()> {
        let db = setup_test_db().await?;
        let mut tracker = VoiceTracker::new();

        let join = connect_event("alice", snapshot("c1", "General", &["alice"]));
        tracker.process(&db, &join, ts(0)).await?;

        let second = connect_event("bob", snapshot("c1", "General", &["alice", "bob"]));
        tracker.process(&db, &second, ts(30)).await?;

        assert!(tracker.wait_window("c1").is_none());

        // The wait sample belongs to alice, the original occupant.
        let averages = RunningAverage::find().all(&db).await?;
        assert_eq!(averages.len(), 1);
        assert_eq!(averages[0].user_id, "alice");
        assert_eq!(averages[0].kind, SampleKind::Wait.as_str());
        assert_eq!(averages[0].average, 30.0);
        assert_eq!(averages[0].sample_count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_lone_occupant_leaving_discards_window_without_sample() -> Result<()> {
        let db = setup_test_db().await?;
        let mut tracker = VoiceTracker::new();

        let join = connect_event("alice", snapshot("c1", "General", &["alice"]));
        tracker.process(&db, &join, ts(0)).await?;

        let leave = disconnect_event("alice", snapshot("c1", "General", &[]));
        tracker.process(&db, &leave, ts(45)).await?;

        assert!(tracker.wait_window("c1").is_none());
        assert!(tracker.session("alice").is_none());

        // No wait sample was recorded, only the completed session.
        let averages = RunningAverage::find().all(&db).await?;
        assert!(averages.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_disconnect_records_session_and_totals() -> Result<()> {
        let db = setup_test_db().await?;
        let mut tracker = VoiceTracker::new();

        let join = connect_event("alice", snapshot("c1", "General", &["alice"]));
        tracker.process(&db, &join, ts(0)).await?;
        let second = connect_event("bob", snapshot("c1", "General", &["alice", "bob"]));
        tracker.process(&db, &second, ts(30)).await?;

        let leave = disconnect_event("alice", snapshot("c1", "General", &["bob"]));
        tracker.process(&db, &leave, ts(100)).await?;

        let stats = get_user_stats(&db, "alice", 5).await?.unwrap();
        assert_eq!(stats.total_seconds, 100.0);
        assert_eq!(stats.session_count, 1);
        assert_eq!(stats.average_wait_seconds, Some(30.0));
        assert_eq!(stats.per_channel.len(), 1);
        assert_eq!(stats.per_channel[0].channel_name, "General");
        assert_eq!(stats.per_channel[0].total_seconds, 100.0);
        assert_eq!(stats.per_channel[0].session_count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_session_durations_sum_over_repeated_visits() -> Result<()> {
        let db = setup_test_db().await?;
        let mut tracker = VoiceTracker::new();

        // Three connect/disconnect pairs: 10s, 20s, 30s.
        let mut t = 0;
        for length in [10, 20, 30] {
            let join = connect_event("alice", snapshot("c1", "General", &["alice"]));
            tracker.process(&db, &join, ts(t)).await?;
            t += length;
            let leave = disconnect_event("alice", snapshot("c1", "General", &[]));
            tracker.process(&db, &leave, ts(t)).await?;
            t += 5;
        }

        let sessions = VoiceSession::find().all(&db).await?;
        let recorded: f64 = sessions.iter().map(|s| s.duration_seconds).sum();
        assert_eq!(recorded, 60.0);

        let stats = get_user_stats(&db, "alice", 5).await?.unwrap();
        assert_eq!(stats.total_seconds, 60.0);
        assert_eq!(stats.session_count, 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_switch_closes_old_session_opens_new_and_logs() -> Result<()> {
        let db = setup_test_db().await?;
        let mut tracker = VoiceTracker::new();

        let join = connect_event("alice", snapshot("c1", "General", &["alice"]));
        tracker.process(&db, &join, ts(0)).await?;

        let switch = switch_event(
            "alice",
            snapshot("c1", "General", &[]),
            snapshot("c2", "Gaming", &["alice"]),
        );
        tracker.process(&db, &switch, ts(50)).await?;

        // Exactly one completed session, for the channel left behind.
        let sessions = VoiceSession::find().all(&db).await?;
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].channel_name, "General");
        assert_eq!(sessions[0].duration_seconds, 50.0);

        // The new session is open, not recorded.
        let session = tracker.session("alice").unwrap();
        assert_eq!(session.channel_id, "c2");
        assert_eq!(session.joined_at, ts(50));
        assert!(session.waiting);

        // One switch record.
        let stats = get_user_stats(&db, "alice", 5).await?.unwrap();
        assert_eq!(stats.recent_switches.len(), 1);
        assert_eq!(stats.recent_switches[0].from_channel, "General");
        assert_eq!(stats.recent_switches[0].to_channel, "Gaming");
        assert_eq!(stats.recent_switches[0].switched_at, ts(50));

        Ok(())
    }

    #[tokio::test]
    async fn test_switch_into_empty_channel_opens_wait_window() -> Result<()> {
        let db = setup_test_db().await?;
        let mut tracker = VoiceTracker::new();

        let join = connect_event("alice", snapshot("c1", "General", &["alice"]));
        tracker.process(&db, &join, ts(0)).await?;

        let switch = switch_event(
            "alice",
            snapshot("c1", "General", &[]),
            snapshot("c2", "Gaming", &["alice"]),
        );
        tracker.process(&db, &switch, ts(20)).await?;

        // Destination gets full connect semantics: a fresh window for c2,
        // and c1's window is gone because the channel emptied.
        assert!(tracker.wait_window("c1").is_none());
        let window = tracker.wait_window("c2").unwrap();
        assert_eq!(window.user_id, "alice");
        assert_eq!(window.opened_at, ts(20));

        Ok(())
    }

    #[tokio::test]
    async fn test_same_channel_event_reveals_waiting_user() -> Result<()> {
        let db = setup_test_db().await?;
        let mut tracker = VoiceTracker::new();

        let join = connect_event("alice", snapshot("c1", "General", &["alice"]));
        tracker.process(&db, &join, ts(0)).await?;
        let second = connect_event("bob", snapshot("c1", "General", &["alice", "bob"]));
        tracker.process(&db, &second, ts(30)).await?;

        // Alice is still flagged as waiting until a same-channel event
        // confirms she has company.
        assert!(tracker.session("alice").unwrap().waiting);

        let nudge = same_channel_event("bob", snapshot("c1", "General", &["alice", "bob"]));
        tracker.process(&db, &nudge, ts(40)).await?;

        assert!(!tracker.session("alice").unwrap().waiting);
        let stats = get_user_stats(&db, "alice", 5).await?.unwrap();
        assert_eq!(stats.average_response_seconds, Some(40.0));

        Ok(())
    }

    #[tokio::test]
    async fn test_same_channel_event_does_not_double_count() -> Result<()> {
        let db = setup_test_db().await?;
        let mut tracker = VoiceTracker::new();

        let join = connect_event("alice", snapshot("c1", "General", &["alice"]));
        tracker.process(&db, &join, ts(0)).await?;
        let second = connect_event("bob", snapshot("c1", "General", &["alice", "bob"]));
        tracker.process(&db, &second, ts(30)).await?;

        let nudge = same_channel_event("bob", snapshot("c1", "General", &["alice", "bob"]));
        tracker.process(&db, &nudge, ts(40)).await?;
        tracker.process(&db, &nudge, ts(55)).await?;

        let averages = RunningAverage::find().all(&db).await?;
        let responses: Vec<_> = averages
            .iter()
            .filter(|row| row.kind == SampleKind::Response.as_str())
            .collect();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].sample_count, 1);
        assert_eq!(responses[0].average, 40.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_same_channel_event_ignores_waiters_elsewhere() -> Result<()> {
        let db = setup_test_db().await?;
        let mut tracker = VoiceTracker::new();

        let lonely = connect_event("alice", snapshot("c2", "Gaming", &["alice"]));
        tracker.process(&db, &lonely, ts(0)).await?;

        // Bob toggles mute over in General; alice is not in that member
        // list, so her wait is not resolved.
        let join = connect_event("bob", snapshot("c1", "General", &["bob"]));
        tracker.process(&db, &join, ts(5)).await?;
        let nudge = same_channel_event("bob", snapshot("c1", "General", &["bob"]));
        tracker.process(&db, &nudge, ts(10)).await?;

        assert!(tracker.session("alice").unwrap().waiting);
        Ok(())
    }

    #[tokio::test]
    async fn test_stale_disconnect_is_ignored() -> Result<()> {
        let db = setup_test_db().await?;
        let mut tracker = VoiceTracker::new();

        // No prior connect (e.g. the process restarted in between).
        let leave = disconnect_event("alice", snapshot("c1", "General", &[]));
        tracker.process(&db, &leave, ts(10)).await?;

        assert_eq!(tracker.open_session_count(), 0);
        let sessions = VoiceSession::find().all(&db).await?;
        assert!(sessions.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_at_most_one_session_per_user() -> Result<()> {
        let db = setup_test_db().await?;
        let mut tracker = VoiceTracker::new();

        let first = connect_event("alice", snapshot("c1", "General", &["alice"]));
        tracker.process(&db, &first, ts(0)).await?;
        // A second connect without a disconnect in between replaces the
        // open session rather than adding one.
        let second = connect_event("alice", snapshot("c2", "Gaming", &["alice"]));
        tracker.process(&db, &second, ts(10)).await?;

        assert_eq!(tracker.open_session_count(), 1);
        assert_eq!(tracker.session("alice").unwrap().channel_id, "c2");

        Ok(())
    }

    #[tokio::test]
    async fn test_wait_windows_are_independent_per_channel() -> Result<()> {
        let db = setup_test_db().await?;
        let mut tracker = VoiceTracker::new();

        let a = connect_event("alice", snapshot("c1", "General", &["alice"]));
        tracker.process(&db, &a, ts(0)).await?;
        let b = connect_event("bob", snapshot("c2", "Gaming", &["bob"]));
        tracker.process(&db, &b, ts(5)).await?;

        assert_eq!(tracker.wait_window("c1").unwrap().user_id, "alice");
        assert_eq!(tracker.wait_window("c2").unwrap().user_id, "bob");

        // Closing one leaves the other untouched.
        let joins_bob = connect_event("carol", snapshot("c2", "Gaming", &["bob", "carol"]));
        tracker.process(&db, &joins_bob, ts(35)).await?;

        assert!(tracker.wait_window("c2").is_none());
        assert!(tracker.wait_window("c1").is_some());

        Ok(())
    }
}
