//! Action log composition.
//!
//! Every handler in the dispatch table carries a [`LogStrategy`] next to its
//! state transition. After the transition ran, [`compose`] resolves the
//! strategy against the pre- and post-transition snapshots and prepends the
//! resulting entry to the action log (newest first). A strategy of
//! [`LogStrategy::None`], or a producer returning `None`, leaves the log
//! untouched; the state transition is never affected either way.
//!
//! Producers receive the acting username already resolved from the *new*
//! state (a just-joined user has no entry in the old one), but read the *old*
//! state themselves where the new one no longer has what the message needs: a
//! deleted story's title, a leaver's name.

use cardfold_proto::{EventPayload, ServerEvent};

use crate::{
    cards::card_label,
    env::Environment,
    state::{LogEntry, RoomState},
};

/// A resolved log message, optionally flagged as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LogMessage {
    /// Human-readable message.
    pub message: String,
    /// True for entries describing a failure.
    pub is_error: bool,
}

impl LogMessage {
    fn plain(message: impl Into<String>) -> Self {
        Self { message: message.into(), is_error: false }
    }

    fn error(message: impl Into<String>) -> Self {
        Self { message: message.into(), is_error: true }
    }
}

/// Derives a log message from the acting username, the pre- and
/// post-transition states and the triggering event. `None` means no entry.
pub(crate) type LogProducer = fn(&str, &RoomState, &RoomState, &ServerEvent) -> Option<LogMessage>;

/// How a handler contributes to the action log.
#[derive(Clone, Copy)]
pub(crate) enum LogStrategy {
    /// No log entry for this event kind.
    None,
    /// A fixed message, independent of state.
    Constant(&'static str),
    /// A message derived from state and payload.
    Derived(LogProducer),
}

/// Resolve `strategy` and prepend the resulting entry to `new`'s action log.
pub(crate) fn compose<E: Environment>(
    env: &E,
    strategy: LogStrategy,
    old: &RoomState,
    new: RoomState,
    event: &ServerEvent,
) -> RoomState {
    let username =
        event.user_id.as_deref().and_then(|id| new.username_of(id)).unwrap_or("").to_owned();

    let message = match strategy {
        LogStrategy::None => None,
        LogStrategy::Constant(text) => Some(LogMessage::plain(text)),
        LogStrategy::Derived(producer) => producer(&username, old, &new, event),
    };

    let Some(message) = message else {
        return new;
    };

    let entry = LogEntry {
        tstamp: env.now().format("%H:%M").to_string(),
        log_id: format!("{:016x}", env.random_u64()),
        message: message.message,
        is_error: message.is_error,
    };

    let mut next = new;
    next.action_log.insert(0, entry);
    next
}

pub(crate) fn joined(
    username: &str,
    _old: &RoomState,
    new: &RoomState,
    event: &ServerEvent,
) -> Option<LogMessage> {
    if event.user_id.is_some() && event.user_id == new.user_id {
        return Some(LogMessage::plain("You joined the room"));
    }
    let who = if username.is_empty() { "New user" } else { username };
    Some(LogMessage::plain(format!("{who} joined the room")))
}

pub(crate) fn left(
    _username: &str,
    old: &RoomState,
    _new: &RoomState,
    event: &ServerEvent,
) -> Option<LogMessage> {
    let EventPayload::LeftRoom(payload) = &event.payload else {
        return None;
    };
    let subject = payload.user_id.as_deref().or(event.user_id.as_deref())?;
    if old.user_id.as_deref() == Some(subject) {
        return None;
    }
    let name = old.username_of(subject).unwrap_or("");
    Some(LogMessage::plain(format!("{name} left the room")))
}

pub(crate) fn kicked(
    username: &str,
    old: &RoomState,
    _new: &RoomState,
    event: &ServerEvent,
) -> Option<LogMessage> {
    let EventPayload::Kicked(payload) = &event.payload else {
        return None;
    };
    if old.user_id.as_deref() == Some(payload.user_id.as_str()) {
        return None;
    }
    let name = old.username_of(&payload.user_id).unwrap_or("");
    Some(LogMessage::plain(format!("{name} was kicked from the room by {username}")))
}

pub(crate) fn connection_lost(
    username: &str,
    _old: &RoomState,
    _new: &RoomState,
    _event: &ServerEvent,
) -> Option<LogMessage> {
    if username.is_empty() {
        return None;
    }
    Some(LogMessage::plain(format!("{username} lost the connection")))
}

pub(crate) fn story_added(
    username: &str,
    _old: &RoomState,
    _new: &RoomState,
    event: &ServerEvent,
) -> Option<LogMessage> {
    let EventPayload::StoryAdded(payload) = &event.payload else {
        return None;
    };
    Some(LogMessage::plain(format!("{username} added new story \"{}\"", payload.title)))
}

pub(crate) fn story_changed(
    username: &str,
    _old: &RoomState,
    _new: &RoomState,
    event: &ServerEvent,
) -> Option<LogMessage> {
    let EventPayload::StoryChanged(payload) = &event.payload else {
        return None;
    };
    Some(LogMessage::plain(format!("{username} changed story \"{}\"", payload.title)))
}

pub(crate) fn story_trashed(
    username: &str,
    old: &RoomState,
    _new: &RoomState,
    event: &ServerEvent,
) -> Option<LogMessage> {
    let EventPayload::StoryTrashed(payload) = &event.payload else {
        return None;
    };
    let title = old.story_title(&payload.story_id)?;
    Some(LogMessage::plain(format!("{username} moved story \"{title}\" to trash")))
}

pub(crate) fn story_restored(
    username: &str,
    old: &RoomState,
    _new: &RoomState,
    event: &ServerEvent,
) -> Option<LogMessage> {
    let EventPayload::StoryRestored(payload) = &event.payload else {
        return None;
    };
    let title = old.story_title(&payload.story_id)?;
    Some(LogMessage::plain(format!("{username} restored story \"{title}\"")))
}

pub(crate) fn story_deleted(
    username: &str,
    old: &RoomState,
    _new: &RoomState,
    event: &ServerEvent,
) -> Option<LogMessage> {
    let EventPayload::StoryDeleted(payload) = &event.payload else {
        return None;
    };
    let title = old.story_title(&payload.story_id)?;
    Some(LogMessage::plain(format!("{username} deleted story \"{title}\"")))
}

pub(crate) fn story_selected(
    username: &str,
    _old: &RoomState,
    new: &RoomState,
    event: &ServerEvent,
) -> Option<LogMessage> {
    let EventPayload::StorySelected(payload) = &event.payload else {
        return None;
    };
    let title = new.story_title(payload.story_id.as_deref()?)?;
    Some(LogMessage::plain(format!("{username} selected story \"{title}\"")))
}

pub(crate) fn import_failed(
    _username: &str,
    _old: &RoomState,
    _new: &RoomState,
    event: &ServerEvent,
) -> Option<LogMessage> {
    let EventPayload::ImportFailed(payload) = &event.payload else {
        return None;
    };
    Some(LogMessage::plain(format!("Story import failed ({})", payload.message)))
}

pub(crate) fn username_set(
    _username: &str,
    old: &RoomState,
    _new: &RoomState,
    event: &ServerEvent,
) -> Option<LogMessage> {
    let EventPayload::UsernameSet(payload) = &event.payload else {
        return None;
    };
    let previous = event.user_id.as_deref().and_then(|id| old.username_of(id));
    match previous {
        Some(before) if before != payload.username => Some(LogMessage::plain(format!(
            "\"{before}\" is now known as \"{}\"",
            payload.username
        ))),
        _ => Some(LogMessage::plain(format!("{} set their username", payload.username))),
    }
}

pub(crate) fn email_set(
    username: &str,
    _old: &RoomState,
    _new: &RoomState,
    _event: &ServerEvent,
) -> Option<LogMessage> {
    Some(LogMessage::plain(format!("{username} set their email address")))
}

pub(crate) fn avatar_set(
    username: &str,
    _old: &RoomState,
    _new: &RoomState,
    _event: &ServerEvent,
) -> Option<LogMessage> {
    Some(LogMessage::plain(format!("{username} changed their avatar")))
}

pub(crate) fn excluded(
    _username: &str,
    _old: &RoomState,
    new: &RoomState,
    event: &ServerEvent,
) -> Option<LogMessage> {
    let EventPayload::ExcludedFromEstimations(payload) = &event.payload else {
        return None;
    };
    let name = new.username_of(&payload.user_id).unwrap_or("");
    Some(LogMessage::plain(format!("{name} is now excluded from estimations")))
}

pub(crate) fn included(
    _username: &str,
    _old: &RoomState,
    new: &RoomState,
    event: &ServerEvent,
) -> Option<LogMessage> {
    let EventPayload::IncludedInEstimations(payload) = &event.payload else {
        return None;
    };
    let name = new.username_of(&payload.user_id).unwrap_or("");
    Some(LogMessage::plain(format!("{name} is no longer excluded from estimations")))
}

pub(crate) fn consensus_achieved(
    _username: &str,
    old: &RoomState,
    new: &RoomState,
    event: &ServerEvent,
) -> Option<LogMessage> {
    let EventPayload::ConsensusAchieved(payload) = &event.payload else {
        return None;
    };
    let title = old.story_title(&payload.story_id)?;
    let label = match card_label(&new.card_config, payload.value) {
        Some(label) => label.to_owned(),
        None => payload.value.to_string(),
    };
    Some(LogMessage::plain(format!("Consensus achieved for story \"{title}\": {label}")))
}

pub(crate) fn revealed(
    username: &str,
    old: &RoomState,
    _new: &RoomState,
    event: &ServerEvent,
) -> Option<LogMessage> {
    let EventPayload::Revealed(payload) = &event.payload else {
        return None;
    };
    let title = old.story_title(&payload.story_id)?;
    if payload.manually {
        Some(LogMessage::plain(format!("{username} manually revealed estimates for story \"{title}\"")))
    } else {
        Some(LogMessage::plain(format!("Estimates for story \"{title}\" were auto-revealed")))
    }
}

pub(crate) fn new_estimation_round(
    username: &str,
    old: &RoomState,
    _new: &RoomState,
    event: &ServerEvent,
) -> Option<LogMessage> {
    let EventPayload::NewEstimationRoundStarted(payload) = &event.payload else {
        return None;
    };
    let title = old.story_title(&payload.story_id)?;
    Some(LogMessage::plain(format!("{username} started a new estimation round for story \"{title}\"")))
}

pub(crate) fn card_config_set(
    username: &str,
    _old: &RoomState,
    _new: &RoomState,
    _event: &ServerEvent,
) -> Option<LogMessage> {
    Some(LogMessage::plain(format!("{username} set a custom card configuration for the room")))
}

pub(crate) fn auto_reveal_on(
    username: &str,
    _old: &RoomState,
    _new: &RoomState,
    _event: &ServerEvent,
) -> Option<LogMessage> {
    Some(LogMessage::plain(format!("{username} enabled automatic reveal of estimates")))
}

pub(crate) fn auto_reveal_off(
    username: &str,
    _old: &RoomState,
    _new: &RoomState,
    _event: &ServerEvent,
) -> Option<LogMessage> {
    Some(LogMessage::plain(format!("{username} disabled automatic reveal of estimates")))
}

pub(crate) fn command_rejected(
    _username: &str,
    _old: &RoomState,
    _new: &RoomState,
    event: &ServerEvent,
) -> Option<LogMessage> {
    let EventPayload::CommandRejected(payload) = &event.payload else {
        return None;
    };
    Some(LogMessage::error(format!("An error occurred: {}", payload.reason)))
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;
    use crate::state::User;

    #[derive(Clone)]
    struct FixedEnv;

    impl Environment for FixedEnv {
        fn now(&self) -> DateTime<Utc> {
            DateTime::UNIX_EPOCH
        }

        fn random_bytes(&self, buffer: &mut [u8]) {
            buffer.fill(0xAB);
        }
    }

    fn event(payload: EventPayload, user_id: Option<&str>) -> ServerEvent {
        ServerEvent {
            room_id: "r1".into(),
            user_id: user_id.map(str::to_owned),
            correlation_id: None,
            payload,
        }
    }

    #[test]
    fn none_strategy_leaves_log_untouched() {
        let state = RoomState::new();
        let next = compose(
            &FixedEnv,
            LogStrategy::None,
            &state,
            state.clone(),
            &event(EventPayload::RoomCreated, None),
        );

        assert!(next.action_log.is_empty());
    }

    #[test]
    fn entries_are_prepended_newest_first() {
        let state = RoomState::new();
        let trigger = event(EventPayload::RoomCreated, None);

        let after_first =
            compose(&FixedEnv, LogStrategy::Constant("first"), &state, state.clone(), &trigger);
        let after_second = compose(
            &FixedEnv,
            LogStrategy::Constant("second"),
            &after_first,
            after_first.clone(),
            &trigger,
        );

        assert_eq!(after_second.action_log.len(), 2);
        assert_eq!(after_second.action_log[0].message, "second");
        assert_eq!(after_second.action_log[1].message, "first");
        assert_eq!(after_second.action_log[0].tstamp, "00:00");
        assert!(!after_second.action_log[0].is_error);
    }

    #[test]
    fn acting_username_resolves_from_new_state() {
        let old = RoomState::new();
        let mut new = RoomState::new();
        let mut ada = User::with_id("u1");
        ada.username = Some("Ada".into());
        new.users.insert("u1".into(), ada);

        let trigger = event(
            EventPayload::AvatarSet(cardfold_proto::payloads::user::AvatarSet { avatar: 1 }),
            Some("u1"),
        );
        let next = compose(&FixedEnv, LogStrategy::Derived(avatar_set), &old, new, &trigger);

        assert_eq!(next.action_log[0].message, "Ada changed their avatar");
    }

    #[test]
    fn producer_returning_none_appends_nothing() {
        let state = RoomState::new();
        // Unknown story: the trash producer has no title to report.
        let trigger = event(
            EventPayload::StoryTrashed(cardfold_proto::payloads::story::StoryRef {
                story_id: "missing".into(),
            }),
            Some("u1"),
        );

        let next =
            compose(&FixedEnv, LogStrategy::Derived(story_trashed), &state, state.clone(), &trigger);

        assert!(next.action_log.is_empty());
    }
}
