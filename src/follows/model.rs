use async_trait::async_trait;
use serde::Serialize;
use sqlx::FromRow;

use crate::{error::ModelError, users::model::User};

/// `follower_id` follows `followee_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Follow {
    pub followee_id: i64,
    pub follower_id: i64,
}

#[async_trait]
pub trait FollowDb: Send + Sync {
    async fn get(&self, followee_id: i64, follower_id: i64) -> Result<Follow, ModelError>;
    /// Users following `user_id`.
    async fn followers(&self, user_id: i64) -> Result<Vec<User>, ModelError>;
    /// Users that `user_id` follows.
    async fn following(&self, user_id: i64) -> Result<Vec<User>, ModelError>;

    async fn create(&self, follow: &Follow) -> Result<(), ModelError>;
    async fn delete(&self, followee_id: i64, follower_id: i64) -> Result<(), ModelError>;
}
