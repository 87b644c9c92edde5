//! Session membership payloads: joining, leaving, kicks, credentials and
//! command rejections.

use serde::{Deserialize, Serialize};

use crate::payloads::{config::Card, story::StoryData, user::UserData};

/// Full room snapshot delivered on a successful join.
///
/// The lists are complete: the client indexes them into keyed maps and
/// replaces any previous mapping wholesale. Estimations travel embedded in
/// each [`StoryData`] entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedRoom {
    /// All users currently in the room, the joining user included.
    pub users: Vec<UserData>,

    /// All stories in the room, trashed ones included.
    pub stories: Vec<StoryData>,

    /// Story currently open for estimation, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_story: Option<String>,

    /// Room card configuration. Absent when the room uses the default deck.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_config: Option<Vec<Card>>,

    /// Whether estimates are revealed automatically once everyone has voted.
    #[serde(default)]
    pub auto_reveal: bool,

    /// Whether the room requires a password to join.
    #[serde(default)]
    pub password_protected: bool,
}

/// A user left the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeftRoom {
    /// Id of the leaving user. Falls back to the envelope user id when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// A user was kicked from the room.
///
/// The envelope user id is the *kicking* user; the payload carries the kicked
/// user. The two must not be conflated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kicked {
    /// Id of the kicked user.
    pub user_id: String,
}

/// Server issued a session credential after a successful join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenIssued {
    /// Opaque credential for the command layer.
    pub token: String,
}

/// A command sent by this client was rejected by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRejected {
    /// The rejected command.
    pub command: RejectedCommand,

    /// Server-supplied rejection reason.
    pub reason: String,
}

/// Identifying parts of a rejected command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedCommand {
    /// Correlation id the client attached to the command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Room the command addressed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,

    /// Command name, e.g. `joinRoom`.
    pub name: String,
}
