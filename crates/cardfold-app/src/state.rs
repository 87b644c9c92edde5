//! Observable projection state types.
//!
//! This module defines the data structures that represent the client's local
//! mirror of room state, such as [`RoomState`] and its [`User`] / [`Story`]
//! entities.
//!
//! These structures serve as the "View Model" for the application. They hold
//! exactly what the rendering layer needs and are produced exclusively by the
//! reducer, one immutable snapshot per event.

use std::collections::HashMap;

use cardfold_proto::payloads::config::Card;

/// A participant in the room as seen by this client.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Stable user id within the room.
    pub id: String,
    /// Display name. `None` until the user sets one.
    pub username: Option<String>,
    /// Email address, if shared.
    pub email: Option<String>,
    /// Hash of the email address, used for avatar lookup.
    pub email_hash: Option<String>,
    /// Index of the selected built-in avatar.
    pub avatar: u32,
    /// Whether the user opted out of estimating.
    pub excluded: bool,
    /// Whether the user's connection is currently lost.
    pub disconnected: bool,
}

impl User {
    /// Create a user entry with only the id known.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: None,
            email: None,
            email_hash: None,
            avatar: 0,
            excluded: false,
            disconnected: false,
        }
    }
}

/// An estimable work item within the room.
#[derive(Debug, Clone, PartialEq)]
pub struct Story {
    /// Stable story id within the room.
    pub id: String,
    /// Story title.
    pub title: String,
    /// Longer description. May be empty.
    pub description: String,
    /// Creation time in Unix seconds.
    pub created_at: u64,
    /// Whether the story is in the trash.
    pub trashed: bool,
    /// Whether estimates for the current round are revealed.
    pub revealed: bool,
    /// Agreed final estimate, once consensus was achieved.
    pub consensus: Option<f64>,
}

/// One entry of the human-readable action log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Formatted time of day the entry was created (`%H:%M`, UTC).
    pub tstamp: String,
    /// Unique entry id.
    pub log_id: String,
    /// Human-readable message.
    pub message: String,
    /// True for entries describing a failure (e.g. a rejected command).
    pub is_error: bool,
}

/// The client's local mirror of room state.
///
/// One live instance per client session. Mutated exclusively by the reducer,
/// which returns a new snapshot per event; a prior snapshot is never affected
/// by later transitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomState {
    /// Id of the joined room. `None` before joining; stable once set except
    /// on full reset (own leave or kick).
    pub room_id: Option<String>,
    /// The local participant's user id. `None` until the own join resolved.
    pub user_id: Option<String>,
    /// Users by id.
    pub users: HashMap<String, User>,
    /// Stories by id.
    pub stories: HashMap<String, Story>,
    /// Estimates of the current round: story id to (user id to value).
    /// An absent inner map means "no estimates yet for this round".
    pub estimations: HashMap<String, HashMap<String, f64>>,
    /// Story currently open for estimation.
    pub selected_story: Option<String>,
    /// Story currently visually focused. Independent of `selected_story`.
    pub highlighted_story: Option<String>,
    /// Ordered card deck valid for this room.
    pub card_config: Vec<Card>,
    /// Whether estimates reveal automatically once everyone has voted.
    pub auto_reveal: bool,
    /// Whether the room requires a password to join.
    pub password_protected: bool,
    /// True exactly while a just-achieved consensus celebration should show.
    pub applause: bool,
    /// Action log, newest entry first.
    pub action_log: Vec<LogEntry>,
    /// Correlation id of the in-flight join command. Cleared once resolved.
    pub pending_join_command_id: Option<String>,
    /// Room id for which a password-protected join was rejected.
    pub authorization_failed: Option<String>,
    /// True when a command was rejected and the user has not dismissed it.
    pub unseen_error: bool,
    /// Opaque credential issued by the server after join.
    pub user_token: Option<String>,
    /// Mirror of the persisted username preset.
    pub preset_username: Option<String>,
    /// Mirror of the persisted email preset.
    pub preset_email: Option<String>,
    /// Mirror of the persisted avatar preset.
    pub preset_avatar: Option<u32>,
    /// Mirror of the persisted own-user-id preset.
    pub preset_user_id: Option<String>,
}

impl RoomState {
    /// The initial empty state, before any event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Display name of a user, if known.
    pub fn username_of(&self, user_id: &str) -> Option<&str> {
        self.users.get(user_id).and_then(|user| user.username.as_deref())
    }

    /// Title of a story, if known.
    pub fn story_title(&self, story_id: &str) -> Option<&str> {
        self.stories.get(story_id).map(|story| story.title.as_str())
    }
}
