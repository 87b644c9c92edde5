//! Event dispatch table.
//!
//! Maps every [`EventKind`] of the closed catalogue to a [`Handler`]: the
//! state transition paired with the handler's [`LogStrategy`]. The pairing is
//! data, not control flow, so a handler cannot accidentally log without
//! transitioning or vice versa.
//!
//! Transition functions never fail. A payload that does not match the
//! dispatched kind cannot be produced by the typed event model; the `let ...
//! else` guards keep that a state-unchanged no-op rather than a panic path if
//! the model ever changes.

use cardfold_proto::{EventKind, EventPayload, ServerEvent};

use crate::{
    cards::default_card_config,
    index::{index_estimations, index_stories, index_users},
    log::{self, LogStrategy},
    prefs::PreferenceStore,
    state::{RoomState, Story, User},
};

/// A state transition: old state in, new snapshot out.
///
/// The preference store is only written by handlers mirroring the local
/// user's own identity fields.
pub(crate) type TransitionFn = fn(&RoomState, &ServerEvent, &mut dyn PreferenceStore) -> RoomState;

/// One entry of the dispatch table.
pub(crate) struct Handler {
    /// State transition for the event kind.
    pub transition: TransitionFn,
    /// How the event contributes to the action log.
    pub log: LogStrategy,
}

/// Look up the handler for an event kind. `None` only for
/// [`EventKind::Unknown`].
pub(crate) fn handler_for(kind: EventKind) -> Option<Handler> {
    let handler = match kind {
        EventKind::RoomCreated => Handler { transition: unchanged, log: LogStrategy::None },
        EventKind::JoinedRoom => {
            Handler { transition: joined_room, log: LogStrategy::Derived(log::joined) }
        },
        EventKind::LeftRoom => {
            Handler { transition: left_room, log: LogStrategy::Derived(log::left) }
        },
        EventKind::Kicked => Handler { transition: kicked, log: LogStrategy::Derived(log::kicked) },
        EventKind::ConnectionLost => {
            Handler { transition: connection_lost, log: LogStrategy::Derived(log::connection_lost) }
        },
        EventKind::StoryAdded => {
            Handler { transition: story_added, log: LogStrategy::Derived(log::story_added) }
        },
        EventKind::StoryChanged => {
            Handler { transition: story_changed, log: LogStrategy::Derived(log::story_changed) }
        },
        EventKind::StoryTrashed => {
            Handler { transition: story_trashed, log: LogStrategy::Derived(log::story_trashed) }
        },
        EventKind::StoryRestored => {
            Handler { transition: story_restored, log: LogStrategy::Derived(log::story_restored) }
        },
        EventKind::StoryDeleted => {
            Handler { transition: story_deleted, log: LogStrategy::Derived(log::story_deleted) }
        },
        EventKind::StorySelected => {
            Handler { transition: story_selected, log: LogStrategy::Derived(log::story_selected) }
        },
        EventKind::ImportFailed => {
            Handler { transition: unchanged, log: LogStrategy::Derived(log::import_failed) }
        },
        EventKind::UsernameSet => {
            Handler { transition: username_set, log: LogStrategy::Derived(log::username_set) }
        },
        EventKind::EmailSet => {
            Handler { transition: email_set, log: LogStrategy::Derived(log::email_set) }
        },
        EventKind::AvatarSet => {
            Handler { transition: avatar_set, log: LogStrategy::Derived(log::avatar_set) }
        },
        EventKind::ExcludedFromEstimations => {
            Handler { transition: excluded, log: LogStrategy::Derived(log::excluded) }
        },
        EventKind::IncludedInEstimations => {
            Handler { transition: included, log: LogStrategy::Derived(log::included) }
        },
        EventKind::StoryEstimateGiven => {
            // Estimates in progress must not leak to others via the log.
            Handler { transition: story_estimate_given, log: LogStrategy::None }
        },
        EventKind::StoryEstimateCleared => {
            Handler { transition: story_estimate_cleared, log: LogStrategy::None }
        },
        EventKind::ConsensusAchieved => Handler {
            transition: consensus_achieved,
            log: LogStrategy::Derived(log::consensus_achieved),
        },
        EventKind::Revealed => {
            Handler { transition: revealed, log: LogStrategy::Derived(log::revealed) }
        },
        EventKind::NewEstimationRoundStarted => Handler {
            transition: new_estimation_round,
            log: LogStrategy::Derived(log::new_estimation_round),
        },
        EventKind::CardConfigSet => {
            Handler { transition: card_config_set, log: LogStrategy::Derived(log::card_config_set) }
        },
        EventKind::AutoRevealOn => {
            Handler { transition: auto_reveal_on, log: LogStrategy::Derived(log::auto_reveal_on) }
        },
        EventKind::AutoRevealOff => {
            Handler { transition: auto_reveal_off, log: LogStrategy::Derived(log::auto_reveal_off) }
        },
        EventKind::PasswordSet => Handler {
            transition: password_set,
            log: LogStrategy::Constant("The room is now password protected"),
        },
        EventKind::PasswordCleared => Handler {
            transition: password_cleared,
            log: LogStrategy::Constant("The room password was removed"),
        },
        EventKind::TokenIssued => Handler { transition: token_issued, log: LogStrategy::None },
        EventKind::CommandRejected => {
            Handler { transition: command_rejected, log: LogStrategy::Derived(log::command_rejected) }
        },
        EventKind::Unknown => return None,
    };
    Some(handler)
}

fn unchanged(state: &RoomState, _event: &ServerEvent, _prefs: &mut dyn PreferenceStore) -> RoomState {
    state.clone()
}

fn joined_room(
    state: &RoomState,
    event: &ServerEvent,
    prefs: &mut dyn PreferenceStore,
) -> RoomState {
    let EventPayload::JoinedRoom(payload) = &event.payload else {
        return state.clone();
    };

    let own_join = match (state.pending_join_command_id.as_deref(), event.correlation_id.as_deref())
    {
        (Some(pending), Some(correlation)) => pending == correlation,
        _ => false,
    };

    let mut next = state.clone();
    if !own_join {
        // Another participant joined: the server re-sends the user list only.
        next.users = index_users(&payload.users);
        return next;
    }

    next.room_id = Some(event.room_id.clone());
    next.user_id = event.user_id.clone();
    next.users = index_users(&payload.users);
    next.stories = index_stories(&payload.stories);
    next.estimations = index_estimations(&payload.stories);
    next.selected_story = payload.selected_story.clone();
    next.highlighted_story = payload.selected_story.clone();
    next.card_config = payload.card_config.clone().unwrap_or_else(default_card_config);
    next.auto_reveal = payload.auto_reveal;
    next.password_protected = payload.password_protected;
    next.pending_join_command_id = None;
    next.authorization_failed = None;
    next.preset_user_id = event.user_id.clone();
    prefs.set_preset_user_id(event.user_id.as_deref());
    next
}

fn left_room(state: &RoomState, event: &ServerEvent, _prefs: &mut dyn PreferenceStore) -> RoomState {
    let EventPayload::LeftRoom(payload) = &event.payload else {
        return state.clone();
    };
    let Some(subject) = payload.user_id.as_deref().or(event.user_id.as_deref()) else {
        return state.clone();
    };

    if state.user_id.as_deref() == Some(subject) {
        return RoomState::new();
    }

    let mut next = state.clone();
    next.users.remove(subject);
    next
}

fn kicked(state: &RoomState, event: &ServerEvent, _prefs: &mut dyn PreferenceStore) -> RoomState {
    let EventPayload::Kicked(payload) = &event.payload else {
        return state.clone();
    };

    // The kicked user comes from the payload; the envelope user is the kicker.
    if state.user_id.as_deref() == Some(payload.user_id.as_str()) {
        return RoomState::new();
    }

    let mut next = state.clone();
    next.users.remove(&payload.user_id);
    next
}

fn connection_lost(
    state: &RoomState,
    event: &ServerEvent,
    _prefs: &mut dyn PreferenceStore,
) -> RoomState {
    let Some(subject) = event.user_id.as_deref() else {
        return state.clone();
    };

    let mut next = state.clone();
    if let Some(user) = next.users.get_mut(subject) {
        user.disconnected = true;
    }
    next
}

fn story_added(
    state: &RoomState,
    event: &ServerEvent,
    _prefs: &mut dyn PreferenceStore,
) -> RoomState {
    let EventPayload::StoryAdded(payload) = &event.payload else {
        return state.clone();
    };

    let mut next = state.clone();
    next.stories.insert(
        payload.story_id.clone(),
        Story {
            id: payload.story_id.clone(),
            title: payload.title.clone(),
            description: payload.description.clone(),
            created_at: payload.created_at,
            trashed: false,
            revealed: false,
            consensus: None,
        },
    );
    next
}

fn story_changed(
    state: &RoomState,
    event: &ServerEvent,
    _prefs: &mut dyn PreferenceStore,
) -> RoomState {
    let EventPayload::StoryChanged(payload) = &event.payload else {
        return state.clone();
    };

    let mut next = state.clone();
    if let Some(story) = next.stories.get_mut(&payload.story_id) {
        story.title = payload.title.clone();
        story.description = payload.description.clone();
    }
    next
}

fn story_trashed(
    state: &RoomState,
    event: &ServerEvent,
    _prefs: &mut dyn PreferenceStore,
) -> RoomState {
    let EventPayload::StoryTrashed(payload) = &event.payload else {
        return state.clone();
    };

    let mut next = state.clone();
    if let Some(story) = next.stories.get_mut(&payload.story_id) {
        story.trashed = true;
    }
    if next.highlighted_story.as_deref() == Some(payload.story_id.as_str()) {
        next.highlighted_story = None;
    }
    next
}

fn story_restored(
    state: &RoomState,
    event: &ServerEvent,
    _prefs: &mut dyn PreferenceStore,
) -> RoomState {
    let EventPayload::StoryRestored(payload) = &event.payload else {
        return state.clone();
    };

    let mut next = state.clone();
    if let Some(story) = next.stories.get_mut(&payload.story_id) {
        story.trashed = false;
    }
    next
}

fn story_deleted(
    state: &RoomState,
    event: &ServerEvent,
    _prefs: &mut dyn PreferenceStore,
) -> RoomState {
    let EventPayload::StoryDeleted(payload) = &event.payload else {
        return state.clone();
    };

    let mut next = state.clone();
    next.stories.remove(&payload.story_id);
    next.estimations.remove(&payload.story_id);
    next
}

fn story_selected(
    state: &RoomState,
    event: &ServerEvent,
    _prefs: &mut dyn PreferenceStore,
) -> RoomState {
    let EventPayload::StorySelected(payload) = &event.payload else {
        return state.clone();
    };

    let mut next = state.clone();
    next.selected_story = payload.story_id.clone();
    if next.highlighted_story.is_none() {
        next.highlighted_story = payload.story_id.clone();
    }
    next.applause = false;
    next
}

fn username_set(
    state: &RoomState,
    event: &ServerEvent,
    prefs: &mut dyn PreferenceStore,
) -> RoomState {
    let EventPayload::UsernameSet(payload) = &event.payload else {
        return state.clone();
    };
    let Some(subject) = event.user_id.as_deref() else {
        return state.clone();
    };

    let mut next = state.clone();
    let user = next.users.entry(subject.to_owned()).or_insert_with(|| User::with_id(subject));
    user.username = Some(payload.username.clone());

    if next.user_id.as_deref() == Some(subject) {
        next.preset_username = Some(payload.username.clone());
        prefs.set_preset_username(Some(&payload.username));
    }
    next
}

fn email_set(state: &RoomState, event: &ServerEvent, prefs: &mut dyn PreferenceStore) -> RoomState {
    let EventPayload::EmailSet(payload) = &event.payload else {
        return state.clone();
    };
    let Some(subject) = event.user_id.as_deref() else {
        return state.clone();
    };

    let mut next = state.clone();
    let user = next.users.entry(subject.to_owned()).or_insert_with(|| User::with_id(subject));
    user.email = Some(payload.email.clone());
    user.email_hash = payload.email_hash.clone();

    if next.user_id.as_deref() == Some(subject) {
        next.preset_email = Some(payload.email.clone());
        prefs.set_preset_email(Some(&payload.email));
    }
    next
}

fn avatar_set(state: &RoomState, event: &ServerEvent, prefs: &mut dyn PreferenceStore) -> RoomState {
    let EventPayload::AvatarSet(payload) = &event.payload else {
        return state.clone();
    };
    let Some(subject) = event.user_id.as_deref() else {
        return state.clone();
    };

    let mut next = state.clone();
    let user = next.users.entry(subject.to_owned()).or_insert_with(|| User::with_id(subject));
    user.avatar = payload.avatar;

    if next.user_id.as_deref() == Some(subject) {
        next.preset_avatar = Some(payload.avatar);
        prefs.set_preset_avatar(Some(payload.avatar));
    }
    next
}

fn excluded(state: &RoomState, event: &ServerEvent, _prefs: &mut dyn PreferenceStore) -> RoomState {
    let EventPayload::ExcludedFromEstimations(payload) = &event.payload else {
        return state.clone();
    };

    let mut next = state.clone();
    let user = next
        .users
        .entry(payload.user_id.clone())
        .or_insert_with(|| User::with_id(payload.user_id.clone()));
    user.excluded = true;
    next
}

fn included(state: &RoomState, event: &ServerEvent, _prefs: &mut dyn PreferenceStore) -> RoomState {
    let EventPayload::IncludedInEstimations(payload) = &event.payload else {
        return state.clone();
    };

    let mut next = state.clone();
    let user = next
        .users
        .entry(payload.user_id.clone())
        .or_insert_with(|| User::with_id(payload.user_id.clone()));
    user.excluded = false;
    next
}

fn story_estimate_given(
    state: &RoomState,
    event: &ServerEvent,
    _prefs: &mut dyn PreferenceStore,
) -> RoomState {
    let EventPayload::StoryEstimateGiven(payload) = &event.payload else {
        return state.clone();
    };

    let mut next = state.clone();
    next.estimations
        .entry(payload.story_id.clone())
        .or_default()
        .insert(payload.user_id.clone(), payload.value);
    next
}

fn story_estimate_cleared(
    state: &RoomState,
    event: &ServerEvent,
    _prefs: &mut dyn PreferenceStore,
) -> RoomState {
    let EventPayload::StoryEstimateCleared(payload) = &event.payload else {
        return state.clone();
    };

    let mut next = state.clone();
    if let Some(per_user) = next.estimations.get_mut(&payload.story_id) {
        per_user.remove(&payload.user_id);
    }
    next
}

fn consensus_achieved(
    state: &RoomState,
    event: &ServerEvent,
    _prefs: &mut dyn PreferenceStore,
) -> RoomState {
    let EventPayload::ConsensusAchieved(payload) = &event.payload else {
        return state.clone();
    };

    let mut next = state.clone();
    next.applause = true;
    if let Some(story) = next.stories.get_mut(&payload.story_id) {
        story.consensus = Some(payload.value);
    }
    next
}

fn revealed(state: &RoomState, event: &ServerEvent, _prefs: &mut dyn PreferenceStore) -> RoomState {
    let EventPayload::Revealed(payload) = &event.payload else {
        return state.clone();
    };

    let mut next = state.clone();
    if let Some(story) = next.stories.get_mut(&payload.story_id) {
        story.revealed = true;
    }
    next
}

fn new_estimation_round(
    state: &RoomState,
    event: &ServerEvent,
    _prefs: &mut dyn PreferenceStore,
) -> RoomState {
    let EventPayload::NewEstimationRoundStarted(payload) = &event.payload else {
        return state.clone();
    };

    let mut next = state.clone();
    if let Some(story) = next.stories.get_mut(&payload.story_id) {
        story.revealed = false;
        story.consensus = None;
    }
    next.estimations.remove(&payload.story_id);
    next.applause = false;
    next
}

fn card_config_set(
    state: &RoomState,
    event: &ServerEvent,
    _prefs: &mut dyn PreferenceStore,
) -> RoomState {
    let EventPayload::CardConfigSet(payload) = &event.payload else {
        return state.clone();
    };

    let mut next = state.clone();
    next.card_config = payload.card_config.clone();
    next
}

fn auto_reveal_on(
    state: &RoomState,
    _event: &ServerEvent,
    _prefs: &mut dyn PreferenceStore,
) -> RoomState {
    let mut next = state.clone();
    next.auto_reveal = true;
    next
}

fn auto_reveal_off(
    state: &RoomState,
    _event: &ServerEvent,
    _prefs: &mut dyn PreferenceStore,
) -> RoomState {
    let mut next = state.clone();
    next.auto_reveal = false;
    next
}

fn password_set(
    state: &RoomState,
    _event: &ServerEvent,
    _prefs: &mut dyn PreferenceStore,
) -> RoomState {
    let mut next = state.clone();
    next.password_protected = true;
    next
}

fn password_cleared(
    state: &RoomState,
    _event: &ServerEvent,
    _prefs: &mut dyn PreferenceStore,
) -> RoomState {
    let mut next = state.clone();
    next.password_protected = false;
    next
}

fn token_issued(
    state: &RoomState,
    event: &ServerEvent,
    _prefs: &mut dyn PreferenceStore,
) -> RoomState {
    let EventPayload::TokenIssued(payload) = &event.payload else {
        return state.clone();
    };

    let mut next = state.clone();
    next.user_token = Some(payload.token.clone());
    next
}

fn command_rejected(
    state: &RoomState,
    event: &ServerEvent,
    _prefs: &mut dyn PreferenceStore,
) -> RoomState {
    let EventPayload::CommandRejected(payload) = &event.payload else {
        return state.clone();
    };

    tracing::warn!(
        command = %payload.command.name,
        reason = %payload.reason,
        "command rejected by server"
    );

    let mut next = state.clone();
    next.unseen_error = true;
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_catalogue_kind_has_a_handler() {
        for kind in EventKind::CATALOGUE {
            assert!(handler_for(kind).is_some(), "no handler for {}", kind.name());
        }
    }

    #[test]
    fn unknown_kind_has_no_handler() {
        assert!(handler_for(EventKind::Unknown).is_none());
    }

    #[test]
    fn silent_kinds_carry_no_log_strategy() {
        for kind in [
            EventKind::RoomCreated,
            EventKind::StoryEstimateGiven,
            EventKind::StoryEstimateCleared,
            EventKind::TokenIssued,
        ] {
            let handler = handler_for(kind).unwrap();
            assert!(
                matches!(handler.log, LogStrategy::None),
                "{} must not log",
                kind.name()
            );
        }
    }
}
