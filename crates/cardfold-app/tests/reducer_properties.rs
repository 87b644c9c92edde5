//! Property-based tests for the event reducer.
//!
//! Tests verify that invariants hold under arbitrary event sequences:
//! snapshots are value-semantic (prior snapshots never change), the room id
//! stays stable outside full resets, and the scope guard never lets a foreign
//! room touch state.

use std::collections::HashMap;

use cardfold_app::{Environment, MemoryPreferences, Reducer, RoomState, Story, User};
use cardfold_proto::{
    payloads::{
        estimation::{ConsensusAchieved, Revealed, StoryEstimateCleared, StoryEstimateGiven},
        session::{Kicked, LeftRoom},
        story::{StoryAdded, StoryRef, StorySelected},
        user::UsernameSet,
    },
    EventPayload, ServerEvent,
};
use chrono::{DateTime, Utc};
use proptest::prelude::*;

#[derive(Clone)]
struct FixedEnv;

impl Environment for FixedEnv {
    fn now(&self) -> DateTime<Utc> {
        DateTime::UNIX_EPOCH
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        buffer.fill(0x42);
    }
}

fn user_id() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["u1".to_string(), "u2".to_string(), "u3".to_string()])
}

fn story_id() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["s1".to_string(), "s2".to_string(), "s3".to_string()])
}

fn estimate() -> impl Strategy<Value = f64> {
    prop::sample::select(vec![0.5, 1.0, 3.0, 5.0, 13.0])
}

/// Generate random event payloads over a small id pool so sequences interact.
fn payload_strategy() -> impl Strategy<Value = EventPayload> {
    prop_oneof![
        Just(EventPayload::RoomCreated),
        Just(EventPayload::ConnectionLost),
        Just(EventPayload::AutoRevealOn),
        Just(EventPayload::AutoRevealOff),
        Just(EventPayload::PasswordSet),
        Just(EventPayload::PasswordCleared),
        (story_id(), "[A-Za-z ]{1,12}").prop_map(|(story_id, title)| {
            EventPayload::StoryAdded(StoryAdded {
                story_id,
                title,
                description: String::new(),
                created_at: 0,
            })
        }),
        story_id().prop_map(|story_id| EventPayload::StoryTrashed(StoryRef { story_id })),
        story_id().prop_map(|story_id| EventPayload::StoryRestored(StoryRef { story_id })),
        story_id().prop_map(|story_id| EventPayload::StoryDeleted(StoryRef { story_id })),
        story_id().prop_map(|story_id| {
            EventPayload::NewEstimationRoundStarted(StoryRef { story_id })
        }),
        story_id().prop_map(|story_id| {
            EventPayload::StorySelected(StorySelected { story_id: Some(story_id) })
        }),
        (story_id(), user_id(), estimate()).prop_map(|(story_id, user_id, value)| {
            EventPayload::StoryEstimateGiven(StoryEstimateGiven { story_id, user_id, value })
        }),
        (story_id(), user_id()).prop_map(|(story_id, user_id)| {
            EventPayload::StoryEstimateCleared(StoryEstimateCleared { story_id, user_id })
        }),
        (story_id(), estimate()).prop_map(|(story_id, value)| {
            EventPayload::ConsensusAchieved(ConsensusAchieved { story_id, value })
        }),
        (story_id(), any::<bool>()).prop_map(|(story_id, manually)| {
            EventPayload::Revealed(Revealed { story_id, manually })
        }),
        user_id().prop_map(|user_id| EventPayload::LeftRoom(LeftRoom { user_id: Some(user_id) })),
        user_id().prop_map(|user_id| EventPayload::Kicked(Kicked { user_id })),
        "[a-z]{1,8}".prop_map(|username| EventPayload::UsernameSet(UsernameSet { username })),
    ]
}

fn event_strategy() -> impl Strategy<Value = ServerEvent> {
    (
        prop::sample::select(vec!["r1".to_string(), "r1".to_string(), "r2".to_string()]),
        prop::option::of(user_id()),
        payload_strategy(),
    )
        .prop_map(|(room_id, user_id, payload)| ServerEvent {
            room_id,
            user_id,
            correlation_id: None,
            payload,
        })
}

/// State of a session that already joined room `r1` as user `u1`.
fn joined_state() -> RoomState {
    let mut users = HashMap::new();
    for id in ["u1", "u2", "u3"] {
        let mut user = User::with_id(id);
        user.username = Some(id.to_uppercase());
        users.insert(id.to_string(), user);
    }

    let mut stories = HashMap::new();
    stories.insert("s1".to_string(), Story {
        id: "s1".into(),
        title: "Feature X".into(),
        description: String::new(),
        created_at: 0,
        trashed: false,
        revealed: false,
        consensus: None,
    });

    RoomState {
        room_id: Some("r1".into()),
        user_id: Some("u1".into()),
        users,
        stories,
        ..RoomState::new()
    }
}

proptest! {
    #[test]
    fn prop_prior_snapshots_are_never_mutated(
        events in prop::collection::vec(event_strategy(), 0..40)
    ) {
        let mut reducer = Reducer::new(FixedEnv, MemoryPreferences::new());
        let mut state = joined_state();

        for event in events {
            let before = state.clone();
            let next = reducer.apply(&state, &event);
            prop_assert_eq!(&before, &state);
            state = next;
        }
    }

    #[test]
    fn prop_foreign_room_events_never_change_state(
        events in prop::collection::vec(event_strategy(), 1..40)
    ) {
        let mut reducer = Reducer::new(FixedEnv, MemoryPreferences::new());
        let state = joined_state();

        for event in events {
            if event.room_id == "r1" {
                continue;
            }
            let next = reducer.apply(&state, &event);
            prop_assert_eq!(&next, &state);
        }
    }

    #[test]
    fn prop_room_id_is_stable_outside_full_resets(
        events in prop::collection::vec(event_strategy(), 0..40)
    ) {
        let mut reducer = Reducer::new(FixedEnv, MemoryPreferences::new());
        let mut state = joined_state();

        for event in events {
            let next = reducer.apply(&state, &event);
            prop_assert!(
                next.room_id == state.room_id || next == RoomState::new(),
                "room id changed without a reset: {:?} -> {:?}",
                state.room_id,
                next.room_id
            );
            state = next;
        }
    }

    #[test]
    fn prop_action_log_never_shrinks_outside_full_resets(
        events in prop::collection::vec(event_strategy(), 0..40)
    ) {
        let mut reducer = Reducer::new(FixedEnv, MemoryPreferences::new());
        let mut state = joined_state();

        for event in events {
            let next = reducer.apply(&state, &event);
            prop_assert!(
                next.action_log.len() >= state.action_log.len() || next == RoomState::new()
            );
            state = next;
        }
    }
}
