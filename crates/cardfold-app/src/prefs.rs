//! Local preference store abstraction.
//!
//! The preference store persists identity presets (username, email, avatar,
//! last known own-user id) across sessions, outside reducer lifetime. The
//! reducer only ever *writes* to it, and only for the local user's own
//! identity fields; reading happens at session bootstrap, which is the host's
//! concern.
//!
//! The store is injected into the reducer at construction, never imported as
//! ambient state, so tests can substitute their own implementation.

/// Persistent store for the local user's identity presets.
///
/// Each setter takes `Some` to persist a value and `None` to clear it.
pub trait PreferenceStore {
    /// Persist or clear the username preset.
    fn set_preset_username(&mut self, username: Option<&str>);

    /// Persist or clear the email preset.
    fn set_preset_email(&mut self, email: Option<&str>);

    /// Persist or clear the avatar preset.
    fn set_preset_avatar(&mut self, avatar: Option<u32>);

    /// Persist or clear the own-user-id preset.
    fn set_preset_user_id(&mut self, user_id: Option<&str>);
}

/// In-memory preference store.
///
/// Used by tests and by hosts without a platform-specific store. Values live
/// only as long as the instance does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryPreferences {
    username: Option<String>,
    email: Option<String>,
    avatar: Option<u32>,
    user_id: Option<String>,
}

impl MemoryPreferences {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored username preset.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Stored email preset.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Stored avatar preset.
    pub fn avatar(&self) -> Option<u32> {
        self.avatar
    }

    /// Stored own-user-id preset.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn set_preset_username(&mut self, username: Option<&str>) {
        self.username = username.map(str::to_owned);
    }

    fn set_preset_email(&mut self, email: Option<&str>) {
        self.email = email.map(str::to_owned);
    }

    fn set_preset_avatar(&mut self, avatar: Option<u32>) {
        self.avatar = avatar;
    }

    fn set_preset_user_id(&mut self, user_id: Option<&str>) {
        self.user_id = user_id.map(str::to_owned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_persist_and_clear() {
        let mut prefs = MemoryPreferences::new();

        prefs.set_preset_username(Some("Ada"));
        prefs.set_preset_avatar(Some(3));
        assert_eq!(prefs.username(), Some("Ada"));
        assert_eq!(prefs.avatar(), Some(3));

        prefs.set_preset_username(None);
        assert_eq!(prefs.username(), None);
    }
}
