use async_trait::async_trait;
use sqlx::PgPool;

use super::model::{Tag, TagDb, Tagging, TaggingDb};
use crate::{
    db::unique_violation,
    error::ModelError,
    tweets::{model::Tweet, repo::TWEET_COLUMNS},
};

#[derive(Clone)]
pub struct PgTagDb {
    db: PgPool,
}

impl PgTagDb {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TagDb for PgTagDb {
    async fn by_id(&self, id: i64) -> Result<Tag, ModelError> {
        sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(ModelError::NotFound)
    }

    async fn by_name(&self, name: &str) -> Result<Tag, ModelError> {
        sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.db)
            .await?
            .ok_or(ModelError::NotFound)
    }

    async fn by_tweet(&self, tweet_id: i64) -> Result<Vec<Tag>, ModelError> {
        let rows = sqlx::query_as::<_, Tag>(
            r#"
            SELECT g.id, g.name
              FROM tags g
              JOIN taggings tg ON tg.tag_id = g.id
             WHERE tg.tweet_id = $1
             ORDER BY g.name
            "#,
        )
        .bind(tweet_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn create(&self, tag: &mut Tag) -> Result<(), ModelError> {
        tag.id = sqlx::query_scalar::<_, i64>("INSERT INTO tags (name) VALUES ($1) RETURNING id")
            .bind(&tag.name)
            .fetch_one(&self.db)
            .await
            .map_err(|e| unique_violation(e, |_| ModelError::TagExists))?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgTaggingDb {
    db: PgPool,
}

impl PgTaggingDb {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaggingDb for PgTaggingDb {
    async fn get(&self, tag_id: i64, tweet_id: i64) -> Result<Tagging, ModelError> {
        sqlx::query_as::<_, Tagging>(
            "SELECT tag_id, tweet_id FROM taggings WHERE tag_id = $1 AND tweet_id = $2",
        )
        .bind(tag_id)
        .bind(tweet_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(ModelError::NotFound)
    }

    async fn by_tweet(&self, tweet_id: i64) -> Result<Vec<Tagging>, ModelError> {
        let rows = sqlx::query_as::<_, Tagging>(
            "SELECT tag_id, tweet_id FROM taggings WHERE tweet_id = $1",
        )
        .bind(tweet_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn tweets(&self, tag_id: i64) -> Result<Vec<Tweet>, ModelError> {
        let sql = format!(
            "SELECT {TWEET_COLUMNS} FROM tweets t \
             JOIN taggings tg ON tg.tweet_id = t.id AND tg.tag_id = $1 \
             ORDER BY t.created_at DESC, t.id DESC"
        );
        let rows = sqlx::query_as::<_, Tweet>(&sql)
            .bind(tag_id)
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn create(&self, tagging: &Tagging) -> Result<(), ModelError> {
        sqlx::query("INSERT INTO taggings (tag_id, tweet_id) VALUES ($1, $2)")
            .bind(tagging.tag_id)
            .bind(tagging.tweet_id)
            .execute(&self.db)
            .await
            .map_err(|e| unique_violation(e, |_| ModelError::TaggingExists))?;
        Ok(())
    }

    async fn delete(&self, tag_id: i64, tweet_id: i64) -> Result<(), ModelError> {
        let result = sqlx::query("DELETE FROM taggings WHERE tag_id = $1 AND tweet_id = $2")
            .bind(tag_id)
            .bind(tweet_id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ModelError::NotFound);
        }
        Ok(())
    }
}
