use async_trait::async_trait;
use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::error::ModelError;

/// User record. `password` and `remember` carry raw values in memory only;
/// the database sees their hashes.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(skip)]
    #[sqlx(skip)]
    pub password: String,
    #[serde(skip)]
    pub password_hash: String,
    #[serde(skip)]
    #[sqlx(skip)]
    pub remember: String,
    #[serde(skip)]
    pub remember_hash: String,
    pub follower_count: i64,
    pub following_count: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl User {
    pub fn new(name: &str, username: &str, email: &str, password: &str) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: 0,
            name: name.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            password_hash: String::new(),
            remember: String::new(),
            remember_hash: String::new(),
            follower_count: 0,
            following_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// User storage. The validator accepts a raw remember token in
/// `by_remember`; storage implementations receive its hash.
#[async_trait]
pub trait UserDb: Send + Sync {
    async fn by_id(&self, id: i64) -> Result<User, ModelError>;
    async fn by_email(&self, email: &str) -> Result<User, ModelError>;
    async fn by_username(&self, username: &str) -> Result<User, ModelError>;
    async fn by_remember(&self, token: &str) -> Result<User, ModelError>;

    async fn create(&self, user: &mut User) -> Result<(), ModelError>;
    async fn update(&self, user: &mut User) -> Result<(), ModelError>;
    /// Recomputes and stores the user's follower and following counts from
    /// the Follow rows, touching no other column. Returns
    /// `(follower_count, following_count)`.
    async fn recount_follows(&self, id: i64) -> Result<(i64, i64), ModelError>;
}
