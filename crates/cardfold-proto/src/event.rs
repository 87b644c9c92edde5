//! Event envelope and the closed event catalogue.
//!
//! Every server event is one JSON object:
//!
//! ```json
//! {
//!   "name": "storyAdded",
//!   "roomId": "r1",
//!   "userId": "u1",
//!   "correlationId": "c1",
//!   "payload": { "storyId": "s1", "title": "Feature X" }
//! }
//! ```
//!
//! [`ServerEvent`] is the envelope; the `name`/`payload` pair maps onto the
//! adjacently tagged [`EventPayload`] enum, so the payload type always agrees
//! with the event name by construction.
//!
//! # Invariants
//!
//! - Each payload variant maps to exactly one [`EventKind`] (enforced by match
//!   exhaustiveness in [`EventPayload::kind`]).
//! - Unrecognized event names decode to [`EventPayload::Unknown`] instead of
//!   failing, so a newer server cannot break an older client.

use serde::{Deserialize, Serialize};

use crate::{
    error::ProtocolError,
    payloads::{config, estimation, session, story, user},
};

/// A single event as delivered by the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerEvent {
    /// Id of the room this event belongs to.
    pub room_id: String,

    /// Id of the acting user. Absent for purely server-originated events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Correlation id echoed from the triggering command, when there was one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,

    /// Event name and per-kind payload.
    #[serde(flatten)]
    pub payload: EventPayload,
}

impl ServerEvent {
    /// Decode one event from its JSON wire form.
    pub fn from_json(raw: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(raw).map_err(ProtocolError::Decode)
    }

    /// Encode this event to its JSON wire form.
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }

    /// Discriminator of the carried payload.
    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }
}

/// Tagged union over the closed event catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "payload", rename_all = "camelCase")]
pub enum EventPayload {
    /// A room was created. Carries no state of its own.
    RoomCreated,

    /// A user joined the room; carries the full room snapshot.
    JoinedRoom(session::JoinedRoom),

    /// A user left the room.
    LeftRoom(session::LeftRoom),

    /// A user was kicked from the room.
    Kicked(session::Kicked),

    /// A user's connection was lost.
    ConnectionLost,

    /// A new story was added.
    StoryAdded(story::StoryAdded),

    /// A story's title or description changed.
    StoryChanged(story::StoryChanged),

    /// A story was moved to the trash.
    StoryTrashed(story::StoryRef),

    /// A trashed story was restored.
    StoryRestored(story::StoryRef),

    /// A story was permanently deleted.
    StoryDeleted(story::StoryRef),

    /// A story was selected for estimation.
    StorySelected(story::StorySelected),

    /// A bulk story import failed.
    ImportFailed(story::ImportFailed),

    /// A user set their display name.
    UsernameSet(user::UsernameSet),

    /// A user set their email address.
    EmailSet(user::EmailSet),

    /// A user picked a different avatar.
    AvatarSet(user::AvatarSet),

    /// A user opted out of estimating.
    ExcludedFromEstimations(user::EstimationEligibility),

    /// A user opted back into estimating.
    IncludedInEstimations(user::EstimationEligibility),

    /// A user gave an estimate.
    StoryEstimateGiven(estimation::StoryEstimateGiven),

    /// A user retracted their estimate.
    StoryEstimateCleared(estimation::StoryEstimateCleared),

    /// The room reached consensus on a story.
    ConsensusAchieved(estimation::ConsensusAchieved),

    /// Estimates were revealed.
    Revealed(estimation::Revealed),

    /// A new estimation round started for a story.
    NewEstimationRoundStarted(story::StoryRef),

    /// The room's card configuration was replaced.
    CardConfigSet(config::CardConfigSet),

    /// Automatic reveal was enabled.
    AutoRevealOn,

    /// Automatic reveal was disabled.
    AutoRevealOff,

    /// A room password was set.
    PasswordSet,

    /// The room password was removed.
    PasswordCleared,

    /// The server issued a session credential.
    TokenIssued(session::TokenIssued),

    /// A command from this client was rejected.
    CommandRejected(session::CommandRejected),

    /// Any event name outside the catalogue. Ignored by the reducer.
    #[serde(other)]
    Unknown,
}

impl EventPayload {
    /// Discriminator for this payload.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::RoomCreated => EventKind::RoomCreated,
            Self::JoinedRoom(_) => EventKind::JoinedRoom,
            Self::LeftRoom(_) => EventKind::LeftRoom,
            Self::Kicked(_) => EventKind::Kicked,
            Self::ConnectionLost => EventKind::ConnectionLost,
            Self::StoryAdded(_) => EventKind::StoryAdded,
            Self::StoryChanged(_) => EventKind::StoryChanged,
            Self::StoryTrashed(_) => EventKind::StoryTrashed,
            Self::StoryRestored(_) => EventKind::StoryRestored,
            Self::StoryDeleted(_) => EventKind::StoryDeleted,
            Self::StorySelected(_) => EventKind::StorySelected,
            Self::ImportFailed(_) => EventKind::ImportFailed,
            Self::UsernameSet(_) => EventKind::UsernameSet,
            Self::EmailSet(_) => EventKind::EmailSet,
            Self::AvatarSet(_) => EventKind::AvatarSet,
            Self::ExcludedFromEstimations(_) => EventKind::ExcludedFromEstimations,
            Self::IncludedInEstimations(_) => EventKind::IncludedInEstimations,
            Self::StoryEstimateGiven(_) => EventKind::StoryEstimateGiven,
            Self::StoryEstimateCleared(_) => EventKind::StoryEstimateCleared,
            Self::ConsensusAchieved(_) => EventKind::ConsensusAchieved,
            Self::Revealed(_) => EventKind::Revealed,
            Self::NewEstimationRoundStarted(_) => EventKind::NewEstimationRoundStarted,
            Self::CardConfigSet(_) => EventKind::CardConfigSet,
            Self::AutoRevealOn => EventKind::AutoRevealOn,
            Self::AutoRevealOff => EventKind::AutoRevealOff,
            Self::PasswordSet => EventKind::PasswordSet,
            Self::PasswordCleared => EventKind::PasswordCleared,
            Self::TokenIssued(_) => EventKind::TokenIssued,
            Self::CommandRejected(_) => EventKind::CommandRejected,
            Self::Unknown => EventKind::Unknown,
        }
    }
}

/// Payload-free event discriminator.
///
/// Used as the dispatch key in the reducer's handler table and in
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// See [`EventPayload::RoomCreated`].
    RoomCreated,
    /// See [`EventPayload::JoinedRoom`].
    JoinedRoom,
    /// See [`EventPayload::LeftRoom`].
    LeftRoom,
    /// See [`EventPayload::Kicked`].
    Kicked,
    /// See [`EventPayload::ConnectionLost`].
    ConnectionLost,
    /// See [`EventPayload::StoryAdded`].
    StoryAdded,
    /// See [`EventPayload::StoryChanged`].
    StoryChanged,
    /// See [`EventPayload::StoryTrashed`].
    StoryTrashed,
    /// See [`EventPayload::StoryRestored`].
    StoryRestored,
    /// See [`EventPayload::StoryDeleted`].
    StoryDeleted,
    /// See [`EventPayload::StorySelected`].
    StorySelected,
    /// See [`EventPayload::ImportFailed`].
    ImportFailed,
    /// See [`EventPayload::UsernameSet`].
    UsernameSet,
    /// See [`EventPayload::EmailSet`].
    EmailSet,
    /// See [`EventPayload::AvatarSet`].
    AvatarSet,
    /// See [`EventPayload::ExcludedFromEstimations`].
    ExcludedFromEstimations,
    /// See [`EventPayload::IncludedInEstimations`].
    IncludedInEstimations,
    /// See [`EventPayload::StoryEstimateGiven`].
    StoryEstimateGiven,
    /// See [`EventPayload::StoryEstimateCleared`].
    StoryEstimateCleared,
    /// See [`EventPayload::ConsensusAchieved`].
    ConsensusAchieved,
    /// See [`EventPayload::Revealed`].
    Revealed,
    /// See [`EventPayload::NewEstimationRoundStarted`].
    NewEstimationRoundStarted,
    /// See [`EventPayload::CardConfigSet`].
    CardConfigSet,
    /// See [`EventPayload::AutoRevealOn`].
    AutoRevealOn,
    /// See [`EventPayload::AutoRevealOff`].
    AutoRevealOff,
    /// See [`EventPayload::PasswordSet`].
    PasswordSet,
    /// See [`EventPayload::PasswordCleared`].
    PasswordCleared,
    /// See [`EventPayload::TokenIssued`].
    TokenIssued,
    /// See [`EventPayload::CommandRejected`].
    CommandRejected,
    /// See [`EventPayload::Unknown`].
    Unknown,
}

impl EventKind {
    /// All kinds of the closed catalogue, `Unknown` excluded.
    pub const CATALOGUE: [Self; 29] = [
        Self::RoomCreated,
        Self::JoinedRoom,
        Self::LeftRoom,
        Self::Kicked,
        Self::ConnectionLost,
        Self::StoryAdded,
        Self::StoryChanged,
        Self::StoryTrashed,
        Self::StoryRestored,
        Self::StoryDeleted,
        Self::StorySelected,
        Self::ImportFailed,
        Self::UsernameSet,
        Self::EmailSet,
        Self::AvatarSet,
        Self::ExcludedFromEstimations,
        Self::IncludedInEstimations,
        Self::StoryEstimateGiven,
        Self::StoryEstimateCleared,
        Self::ConsensusAchieved,
        Self::Revealed,
        Self::NewEstimationRoundStarted,
        Self::CardConfigSet,
        Self::AutoRevealOn,
        Self::AutoRevealOff,
        Self::PasswordSet,
        Self::PasswordCleared,
        Self::TokenIssued,
        Self::CommandRejected,
    ];

    /// Wire name of this kind, e.g. `storyAdded`.
    pub fn name(self) -> &'static str {
        match self {
            Self::RoomCreated => "roomCreated",
            Self::JoinedRoom => "joinedRoom",
            Self::LeftRoom => "leftRoom",
            Self::Kicked => "kicked",
            Self::ConnectionLost => "connectionLost",
            Self::StoryAdded => "storyAdded",
            Self::StoryChanged => "storyChanged",
            Self::StoryTrashed => "storyTrashed",
            Self::StoryRestored => "storyRestored",
            Self::StoryDeleted => "storyDeleted",
            Self::StorySelected => "storySelected",
            Self::ImportFailed => "importFailed",
            Self::UsernameSet => "usernameSet",
            Self::EmailSet => "emailSet",
            Self::AvatarSet => "avatarSet",
            Self::ExcludedFromEstimations => "excludedFromEstimations",
            Self::IncludedInEstimations => "includedInEstimations",
            Self::StoryEstimateGiven => "storyEstimateGiven",
            Self::StoryEstimateCleared => "storyEstimateCleared",
            Self::ConsensusAchieved => "consensusAchieved",
            Self::Revealed => "revealed",
            Self::NewEstimationRoundStarted => "newEstimationRoundStarted",
            Self::CardConfigSet => "cardConfigSet",
            Self::AutoRevealOn => "autoRevealOn",
            Self::AutoRevealOff => "autoRevealOff",
            Self::PasswordSet => "passwordSet",
            Self::PasswordCleared => "passwordCleared",
            Self::TokenIssued => "tokenIssued",
            Self::CommandRejected => "commandRejected",
            Self::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payloads::story::StoryAdded;

    #[test]
    fn story_added_round_trip() {
        let event = ServerEvent {
            room_id: "r1".into(),
            user_id: Some("u1".into()),
            correlation_id: None,
            payload: EventPayload::StoryAdded(StoryAdded {
                story_id: "s1".into(),
                title: "Feature X".into(),
                description: "d".into(),
                created_at: 100,
            }),
        };

        let json = event.to_json().unwrap();
        let decoded = ServerEvent::from_json(&json).unwrap();
        assert_eq!(event, decoded);
    }

    #[test]
    fn wire_shape_uses_camel_case() {
        let raw = r#"{
            "name": "storyEstimateGiven",
            "roomId": "r1",
            "userId": "u2",
            "payload": { "storyId": "s1", "userId": "u2", "value": 5 }
        }"#;

        let event = ServerEvent::from_json(raw).unwrap();
        assert_eq!(event.kind(), EventKind::StoryEstimateGiven);
        assert_eq!(event.room_id, "r1");

        let EventPayload::StoryEstimateGiven(payload) = &event.payload else {
            panic!("wrong payload variant");
        };
        assert_eq!(payload.story_id, "s1");
        assert!((payload.value - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn payload_free_events_decode_without_payload_field() {
        let raw = r#"{ "name": "autoRevealOn", "roomId": "r1", "userId": "u1" }"#;

        let event = ServerEvent::from_json(raw).unwrap();
        assert_eq!(event.kind(), EventKind::AutoRevealOn);
    }

    #[test]
    fn unrecognized_name_decodes_to_unknown() {
        let raw = r#"{ "name": "somethingNew", "roomId": "r1", "payload": { "x": 1 } }"#;

        let event = ServerEvent::from_json(raw).unwrap();
        assert_eq!(event.kind(), EventKind::Unknown);
    }

    #[test]
    fn catalogue_names_are_unique() {
        let mut names: Vec<&str> = EventKind::CATALOGUE.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), EventKind::CATALOGUE.len());
    }
}
