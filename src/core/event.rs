//! Voice event model - framework-agnostic snapshots of voice-state changes.
//!
//! The gateway layer converts each raw notification into an owned
//! [`VoiceEvent`] carrying the channel membership as it stands *after* the
//! change. [`VoiceEvent::classify`] collapses the nullable before/after pair
//! into a [`Transition`] exactly once, so the tracker can match on it
//! exhaustively instead of re-checking nullability in every branch.

/// A voice channel's identity and membership at the moment an event fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSnapshot {
    /// Discord channel ID
    pub id: String,
    /// Human-readable channel name
    pub name: String,
    /// IDs of every user connected to the channel after the event
    pub member_ids: Vec<String>,
}

impl ChannelSnapshot {
    /// Number of users currently connected to the channel.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.member_ids.len()
    }

    /// Whether the given user is currently connected to the channel.
    #[must_use]
    pub fn contains(&self, user_id: &str) -> bool {
        self.member_ids.iter().any(|id| id == user_id)
    }
}

/// One voice-state change for one user, with membership snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceEvent {
    /// Discord user ID whose voice state changed
    pub user_id: String,
    /// Channel the user was in before the change, if any
    pub previous: Option<ChannelSnapshot>,
    /// Channel the user is in after the change, if any
    pub current: Option<ChannelSnapshot>,
}

/// The four transition classes a voice-state change can fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<'a> {
    /// No channel before, some channel after
    Connect {
        /// The channel the user joined
        joined: &'a ChannelSnapshot,
    },
    /// Some channel before, no channel after
    Disconnect {
        /// The channel the user left
        left: &'a ChannelSnapshot,
    },
    /// Two different channels before and after
    Switch {
        /// The channel the user left
        from: &'a ChannelSnapshot,
        /// The channel the user joined
        to: &'a ChannelSnapshot,
    },
    /// Same channel before and after (mute, deafen, stream toggles and the
    /// like); membership may still have changed since the last event
    SameChannel {
        /// The channel the user is in
        channel: &'a ChannelSnapshot,
    },
}

impl VoiceEvent {
    /// Derives the transition class from the before/after channel pair.
    ///
    /// Returns `None` when neither side references a channel, which can
    /// happen for voice-state notifications that carry no channel at all.
    #[must_use]
    pub fn classify(&self) -> Option<Transition<'_>> {
        match (&self.previous, &self.current) {
            (None, None) => None,
            (None, Some(joined)) => Some(Transition::Connect { joined }),
            (Some(left), None) => Some(Transition::Disconnect { left }),
            (Some(from), Some(to)) => {
                if from.id == to.id {
                    Some(Transition::SameChannel { channel: to })
                } else {
                    Some(Transition::Switch { from, to })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::snapshot;

    #[test]
    fn test_classify_connect() {
        let event = VoiceEvent {
            user_id: "u1".to_string(),
            previous: None,
            current: Some(snapshot("c1", "General", &["u1"])),
        };
        assert!(matches!(
            event.classify(),
            Some(Transition::Connect { joined }) if joined.id == "c1"
        ));
    }

    #[test]
    fn test_classify_disconnect() {
        let event = VoiceEvent {
            user_id: "u1".to_string(),
            previous: Some(snapshot("c1", "General", &[])),
            current: None,
        };
        assert!(matches!(
            event.classify(),
            Some(Transition::Disconnect { left }) if left.id == "c1"
        ));
    }

    #[test]
    fn test_classify_switch() {
        let event = VoiceEvent {
            user_id: "u1".to_string(),
            previous: Some(snapshot("c1", "General", &[])),
            current: Some(snapshot("c2", "Gaming", &["u1"])),
        };
        assert!(matches!(
            event.classify(),
            Some(Transition::Switch { from, to }) if from.id == "c1" && to.id == "c2"
        ));
    }

    #[test]
    fn test_classify_same_channel() {
        let event = VoiceEvent {
            user_id: "u1".to_string(),
            previous: Some(snapshot("c1", "General", &["u1", "u2"])),
            current: Some(snapshot("c1", "General", &["u1", "u2"])),
        };
        assert!(matches!(
            event.classify(),
            Some(Transition::SameChannel { channel }) if channel.id == "c1"
        ));
    }

    #[test]
    fn test_classify_no_channel_at_all() {
        let event = VoiceEvent {
            user_id: "u1".to_string(),
            previous: None,
            current: None,
        };
        assert!(event.classify().is_none());
    }

    #[test]
    fn test_snapshot_membership() {
        let channel = snapshot("c1", "General", &["u1", "u2"]);
        assert_eq!(channel.member_count(), 2);
        assert!(channel.contains("u1"));
        assert!(!channel.contains("u3"));
    }
}
