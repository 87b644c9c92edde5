//! The event reducer.
//!
//! [`Reducer`] folds the server's ordered event stream into [`RoomState`]
//! snapshots, one event at a time. It is a pure state machine apart from
//! writes to the injected [`PreferenceStore`]: no I/O, no suspension, no
//! internal concurrency. Event ordering is the transport's contract; the
//! reducer performs no reordering or buffering.
//!
//! # Responsibilities
//!
//! - Special-cases rejected join commands (validation repair, authorization
//!   failure) before anything else.
//! - Guards against cross-room event leakage once a room id is known.
//! - Dispatches through the handler table and composes the action log from
//!   the pre- and post-transition snapshots.
//!
//! The reducer never fails: anything unexpected degrades to "state unchanged
//! plus diagnostic".

use std::borrow::Cow;

use cardfold_proto::{EventPayload, ServerEvent};

use crate::{
    dispatch::handler_for,
    env::Environment,
    log,
    prefs::PreferenceStore,
    state::RoomState,
};

/// Command name whose rejections the session guard special-cases.
const JOIN_COMMAND: &str = "joinRoom";

/// Folds incoming events into new [`RoomState`] snapshots.
pub struct Reducer<E: Environment, P: PreferenceStore> {
    env: E,
    prefs: P,
}

/// Outcome of the session guard.
enum Screened<'a> {
    /// The event is fully handled; no dispatch happens.
    Settled(RoomState),
    /// Dispatch proceeds from this (possibly repaired) state.
    Proceed(Cow<'a, RoomState>),
}

impl<E: Environment, P: PreferenceStore> Reducer<E, P> {
    /// Create a reducer with the given environment and preference store.
    pub fn new(env: E, prefs: P) -> Self {
        Self { env, prefs }
    }

    /// The injected preference store.
    pub fn preferences(&self) -> &P {
        &self.prefs
    }

    /// Apply one event and return the new state snapshot.
    ///
    /// The input state is never mutated; callers may keep old snapshots
    /// around indefinitely.
    pub fn apply(&mut self, state: &RoomState, event: &ServerEvent) -> RoomState {
        match self.screen(state, event) {
            Screened::Settled(next) => next,
            Screened::Proceed(working) => self.dispatch(&working, event),
        }
    }

    /// Session guard: join-rejection special cases, then room scope.
    fn screen<'a>(&mut self, state: &'a RoomState, event: &ServerEvent) -> Screened<'a> {
        if let EventPayload::CommandRejected(payload) = &event.payload
            && payload.command.name == JOIN_COMMAND
        {
            if is_username_format_rejection(&payload.reason) {
                // A previously valid preset can go stale after a server-side
                // format change; clear it so the next join succeeds.
                let mut repaired = state.clone();
                repaired.preset_username = None;
                self.prefs.set_preset_username(None);
                return Screened::Proceed(Cow::Owned(repaired));
            }
            if is_authorization_rejection(&payload.reason) {
                let mut next = state.clone();
                next.authorization_failed = Some(
                    payload.command.room_id.clone().unwrap_or_else(|| event.room_id.clone()),
                );
                return Screened::Settled(next);
            }
        }

        if let Some(room_id) = state.room_id.as_deref()
            && room_id != event.room_id
        {
            tracing::warn!(
                event_room = %event.room_id,
                room = %room_id,
                kind = event.kind().name(),
                "dropping event for foreign room"
            );
            return Screened::Settled(state.clone());
        }

        Screened::Proceed(Cow::Borrowed(state))
    }

    fn dispatch(&mut self, state: &RoomState, event: &ServerEvent) -> RoomState {
        let kind = event.kind();
        let Some(handler) = handler_for(kind) else {
            tracing::warn!(kind = kind.name(), "no handler for event kind, ignoring");
            return state.clone();
        };

        let next = (handler.transition)(state, event, &mut self.prefs);
        log::compose(&self.env, handler.log, state, next, event)
    }
}

fn is_username_format_rejection(reason: &str) -> bool {
    reason.contains("username") && reason.contains("format")
}

fn is_authorization_rejection(reason: &str) -> bool {
    reason.contains("Not authorized")
}

#[cfg(test)]
mod tests {
    use cardfold_proto::payloads::session::{CommandRejected, RejectedCommand};
    use chrono::{DateTime, Utc};

    use super::*;
    use crate::prefs::MemoryPreferences;

    #[derive(Clone)]
    struct FixedEnv;

    impl Environment for FixedEnv {
        fn now(&self) -> DateTime<Utc> {
            DateTime::UNIX_EPOCH
        }

        fn random_bytes(&self, buffer: &mut [u8]) {
            buffer.fill(7);
        }
    }

    fn reducer() -> Reducer<FixedEnv, MemoryPreferences> {
        Reducer::new(FixedEnv, MemoryPreferences::new())
    }

    fn rejected_join(reason: &str, target_room: Option<&str>) -> ServerEvent {
        ServerEvent {
            room_id: "r1".into(),
            user_id: None,
            correlation_id: None,
            payload: EventPayload::CommandRejected(CommandRejected {
                command: RejectedCommand {
                    id: Some("c1".into()),
                    room_id: target_room.map(str::to_owned),
                    name: "joinRoom".into(),
                },
                reason: reason.into(),
            }),
        }
    }

    #[test]
    fn foreign_room_event_is_dropped_unchanged() {
        let mut reducer = reducer();
        let mut state = RoomState::new();
        state.room_id = Some("r1".into());

        let event = ServerEvent {
            room_id: "other".into(),
            user_id: None,
            correlation_id: None,
            payload: EventPayload::AutoRevealOn,
        };

        let next = reducer.apply(&state, &event);
        assert_eq!(next, state);
    }

    #[test]
    fn authorization_rejection_records_target_room_and_nothing_else() {
        let mut reducer = reducer();
        let state = RoomState::new();

        let event = rejected_join("Not authorized for room", Some("locked-room"));
        let next = reducer.apply(&state, &event);

        assert_eq!(next.authorization_failed.as_deref(), Some("locked-room"));
        assert!(!next.unseen_error);
        assert!(next.action_log.is_empty());
    }

    #[test]
    fn username_format_rejection_clears_preset_and_flags_error() {
        let mut reducer = reducer();
        reducer.prefs.set_preset_username(Some("old name"));
        let mut state = RoomState::new();
        state.preset_username = Some("old name".into());

        let event = rejected_join("Given username does not match format", None);
        let next = reducer.apply(&state, &event);

        assert_eq!(next.preset_username, None);
        assert_eq!(reducer.preferences().username(), None);
        assert!(next.unseen_error);
        assert!(next.action_log[0].is_error);
    }

    #[test]
    fn unknown_event_is_ignored() {
        let mut reducer = reducer();
        let mut state = RoomState::new();
        state.room_id = Some("r1".into());

        let event = ServerEvent {
            room_id: "r1".into(),
            user_id: None,
            correlation_id: None,
            payload: EventPayload::Unknown,
        };

        let next = reducer.apply(&state, &event);
        assert_eq!(next, state);
    }
}
