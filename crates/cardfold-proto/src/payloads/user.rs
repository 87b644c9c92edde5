//! User profile payloads.

use serde::{Deserialize, Serialize};

/// A user entry in a join snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    /// Stable user id within the room.
    pub id: String,

    /// Display name. Absent until the user sets one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Email address, if the user shared one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Hash of the email address, used for avatar lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_hash: Option<String>,

    /// Index of the selected built-in avatar.
    #[serde(default)]
    pub avatar: u32,

    /// Whether the user opted out of estimating.
    #[serde(default)]
    pub excluded: bool,

    /// Whether the user's connection is currently lost.
    #[serde(default)]
    pub disconnected: bool,
}

/// A user set their display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsernameSet {
    /// The new display name.
    pub username: String,
}

/// A user set their email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSet {
    /// The new email address.
    pub email: String,

    /// Server-computed hash of the address, used for avatar lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_hash: Option<String>,
}

/// A user picked a different avatar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarSet {
    /// Index of the selected built-in avatar.
    pub avatar: u32,
}

/// A user was excluded from or included in estimation rounds.
///
/// Used by both toggle directions; the event name carries the direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimationEligibility {
    /// Id of the affected user.
    pub user_id: String,
}
