//! Estimation round payloads.

use serde::{Deserialize, Serialize};

/// One user's estimate in a join snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimationEntry {
    /// Id of the estimating user.
    pub user_id: String,

    /// Estimate value (matches a card value of the room configuration).
    pub value: f64,
}

/// A user gave an estimate for a story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryEstimateGiven {
    /// Id of the estimated story.
    pub story_id: String,

    /// Id of the estimating user.
    pub user_id: String,

    /// Estimate value.
    pub value: f64,
}

/// A user retracted their estimate for a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryEstimateCleared {
    /// Id of the story.
    pub story_id: String,

    /// Id of the retracting user.
    pub user_id: String,
}

/// All relevant estimates matched; the room reached consensus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusAchieved {
    /// Id of the story.
    pub story_id: String,

    /// The agreed estimate value.
    pub value: f64,
}

/// Estimates for the current round were revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revealed {
    /// Id of the story.
    pub story_id: String,

    /// True when a user revealed manually, false on auto-reveal.
    #[serde(default)]
    pub manually: bool,
}
