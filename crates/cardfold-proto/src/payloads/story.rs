//! Story lifecycle payloads.

use serde::{Deserialize, Serialize};

use crate::payloads::estimation::EstimationEntry;

/// A story entry in a join snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryData {
    /// Stable story id within the room.
    pub id: String,

    /// Story title.
    pub title: String,

    /// Longer description. May be empty.
    #[serde(default)]
    pub description: String,

    /// Creation time in Unix seconds.
    #[serde(default)]
    pub created_at: u64,

    /// Whether the story is in the trash.
    #[serde(default)]
    pub trashed: bool,

    /// Whether estimates for the current round are revealed.
    #[serde(default)]
    pub revealed: bool,

    /// Agreed final estimate, once consensus was achieved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consensus: Option<f64>,

    /// Estimates already given for the current round.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub estimations: Vec<EstimationEntry>,
}

/// A new story was added to the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryAdded {
    /// Id of the new story.
    pub story_id: String,

    /// Story title.
    pub title: String,

    /// Longer description. May be empty.
    #[serde(default)]
    pub description: String,

    /// Creation time in Unix seconds.
    #[serde(default)]
    pub created_at: u64,
}

/// Title or description of a story changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryChanged {
    /// Id of the changed story.
    pub story_id: String,

    /// New title.
    pub title: String,

    /// New description.
    #[serde(default)]
    pub description: String,
}

/// Payload for events that reference a story by id only
/// (trash, restore, delete, new estimation round).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryRef {
    /// Id of the referenced story.
    pub story_id: String,
}

/// A story was selected for estimation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorySelected {
    /// Id of the selected story. Absent when the selection was cleared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_id: Option<String>,
}

/// A bulk story import failed. Log-only; no state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportFailed {
    /// Human-readable failure description.
    pub message: String,
}
