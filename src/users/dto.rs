use serde::Serialize;

use super::model::User;
use crate::{follows::model::Follow, tweets::model::Tweet};

/// A user together with one of its related lists.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liked_tweets: Option<Vec<Tweet>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followers: Option<Vec<User>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub following: Option<Vec<User>>,
}

impl UserProfile {
    pub fn new(user: User) -> Self {
        Self {
            user,
            liked_tweets: None,
            followers: None,
            following: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowResponse {
    #[serde(flatten)]
    pub follow: Follow,
    /// The followee.
    pub user: User,
}
