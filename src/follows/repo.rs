use async_trait::async_trait;
use sqlx::PgPool;

use super::model::{Follow, FollowDb};
use crate::{db::unique_violation, error::ModelError, users::model::User};

#[derive(Clone)]
pub struct PgFollowDb {
    db: PgPool,
}

impl PgFollowDb {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn users_joined(&self, join_on: &str, user_id: i64) -> Result<Vec<User>, ModelError> {
        let sql = format!(
            "SELECT u.id, u.name, u.username, u.email, u.password_hash, u.remember_hash, \
                    u.follower_count, u.following_count, u.created_at, u.updated_at \
               FROM users u JOIN follows f ON {join_on} = $1 \
              ORDER BY f.created_at DESC"
        );
        let rows = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }
}

#[async_trait]
impl FollowDb for PgFollowDb {
    async fn get(&self, followee_id: i64, follower_id: i64) -> Result<Follow, ModelError> {
        sqlx::query_as::<_, Follow>(
            "SELECT followee_id, follower_id FROM follows \
              WHERE followee_id = $1 AND follower_id = $2",
        )
        .bind(followee_id)
        .bind(follower_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(ModelError::NotFound)
    }

    async fn followers(&self, user_id: i64) -> Result<Vec<User>, ModelError> {
        self.users_joined("f.follower_id = u.id AND f.followee_id", user_id)
            .await
    }

    async fn following(&self, user_id: i64) -> Result<Vec<User>, ModelError> {
        self.users_joined("f.followee_id = u.id AND f.follower_id", user_id)
            .await
    }

    async fn create(&self, follow: &Follow) -> Result<(), ModelError> {
        sqlx::query("INSERT INTO follows (followee_id, follower_id) VALUES ($1, $2)")
            .bind(follow.followee_id)
            .bind(follow.follower_id)
            .execute(&self.db)
            .await
            .map_err(|e| unique_violation(e, |_| ModelError::FollowExists))?;
        Ok(())
    }

    async fn delete(&self, followee_id: i64, follower_id: i64) -> Result<(), ModelError> {
        let result =
            sqlx::query("DELETE FROM follows WHERE followee_id = $1 AND follower_id = $2")
                .bind(followee_id)
                .bind(follower_id)
                .execute(&self.db)
                .await?;
        if result.rows_affected() == 0 {
            return Err(ModelError::NotFound);
        }
        Ok(())
    }
}
