//! Entity indexers.
//!
//! Pure projections from the server's list-shaped snapshot payloads into the
//! keyed maps of [`RoomState`](crate::RoomState). Snapshots are complete by
//! contract, so an indexed map always *replaces* its predecessor wholesale.

use std::collections::HashMap;

use cardfold_proto::payloads::{story::StoryData, user::UserData};

use crate::state::{Story, User};

/// Index a user list by user id.
pub fn index_users(users: &[UserData]) -> HashMap<String, User> {
    users.iter().map(|user| (user.id.clone(), user_from_data(user))).collect()
}

/// Index a story list by story id.
pub fn index_stories(stories: &[StoryData]) -> HashMap<String, Story> {
    stories.iter().map(|story| (story.id.clone(), story_from_data(story))).collect()
}

/// Index the estimates embedded in a story list: story id to (user id to
/// value). Stories without estimates contribute no entry.
pub fn index_estimations(stories: &[StoryData]) -> HashMap<String, HashMap<String, f64>> {
    stories
        .iter()
        .filter(|story| !story.estimations.is_empty())
        .map(|story| {
            let per_user = story
                .estimations
                .iter()
                .map(|entry| (entry.user_id.clone(), entry.value))
                .collect();
            (story.id.clone(), per_user)
        })
        .collect()
}

fn user_from_data(data: &UserData) -> User {
    User {
        id: data.id.clone(),
        username: data.username.clone(),
        email: data.email.clone(),
        email_hash: data.email_hash.clone(),
        avatar: data.avatar,
        excluded: data.excluded,
        disconnected: data.disconnected,
    }
}

fn story_from_data(data: &StoryData) -> Story {
    Story {
        id: data.id.clone(),
        title: data.title.clone(),
        description: data.description.clone(),
        created_at: data.created_at,
        trashed: data.trashed,
        revealed: data.revealed,
        consensus: data.consensus,
    }
}

#[cfg(test)]
mod tests {
    use cardfold_proto::payloads::estimation::EstimationEntry;

    use super::*;

    fn story_data(id: &str, estimations: Vec<EstimationEntry>) -> StoryData {
        StoryData {
            id: id.into(),
            title: format!("story {id}"),
            description: String::new(),
            created_at: 0,
            trashed: false,
            revealed: false,
            consensus: None,
            estimations,
        }
    }

    #[test]
    fn users_are_keyed_by_id() {
        let users = vec![
            UserData {
                id: "u1".into(),
                username: Some("Ada".into()),
                email: None,
                email_hash: None,
                avatar: 2,
                excluded: false,
                disconnected: false,
            },
            UserData {
                id: "u2".into(),
                username: None,
                email: None,
                email_hash: None,
                avatar: 0,
                excluded: true,
                disconnected: false,
            },
        ];

        let indexed = index_users(&users);

        assert_eq!(indexed.len(), 2);
        assert_eq!(indexed["u1"].username.as_deref(), Some("Ada"));
        assert!(indexed["u2"].excluded);
    }

    #[test]
    fn stories_without_estimates_contribute_no_estimation_entry() {
        let stories = vec![
            story_data("s1", vec![EstimationEntry { user_id: "u1".into(), value: 5.0 }]),
            story_data("s2", vec![]),
        ];

        let estimations = index_estimations(&stories);

        assert_eq!(estimations.len(), 1);
        assert!((estimations["s1"]["u1"] - 5.0).abs() < f64::EPSILON);
        assert!(!estimations.contains_key("s2"));

        let indexed = index_stories(&stories);
        assert_eq!(indexed.len(), 2);
        assert_eq!(indexed["s2"].title, "story s2");
    }
}
