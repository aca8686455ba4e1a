use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    auth::token::TokenHasher,
    config::AppConfig,
    follows::{model::FollowDb, repo::PgFollowDb, validator::FollowValidator},
    likes::{model::LikeDb, repo::PgLikeDb, validator::LikeValidator},
    tags::{
        model::{TagDb, TaggingDb},
        repo::{PgTagDb, PgTaggingDb},
        validator::{TagValidator, TaggingValidator},
    },
    tweets::{model::TweetDb, repo::PgTweetDb, validator::TweetValidator},
    users::{model::UserDb, repo::PgUserDb, validator::UserValidator},
};

/// Validated storage for every entity.
#[derive(Clone)]
pub struct Services {
    pub users: Arc<dyn UserDb>,
    pub tweets: Arc<dyn TweetDb>,
    pub tags: Arc<dyn TagDb>,
    pub taggings: Arc<dyn TaggingDb>,
    pub likes: Arc<dyn LikeDb>,
    pub follows: Arc<dyn FollowDb>,
}

impl Services {
    pub fn postgres(db: PgPool, config: &AppConfig) -> Self {
        Self {
            users: Arc::new(UserValidator::new(
                PgUserDb::new(db.clone()),
                TokenHasher::new(&config.hmac_key),
                &config.pepper,
            )),
            tweets: Arc::new(TweetValidator::new(PgTweetDb::new(db.clone()))),
            tags: Arc::new(TagValidator::new(PgTagDb::new(db.clone()))),
            taggings: Arc::new(TaggingValidator::new(PgTaggingDb::new(db.clone()))),
            likes: Arc::new(LikeValidator::new(PgLikeDb::new(db.clone()))),
            follows: Arc::new(FollowValidator::new(PgFollowDb::new(db))),
        }
    }

    #[cfg(test)]
    pub fn in_memory(config: &AppConfig) -> Self {
        Self::over_store(crate::memory::MemoryStore::default(), config)
    }

    /// Validated services sharing `store`, so tests can also reach the raw
    /// tables.
    #[cfg(test)]
    pub fn over_store(store: crate::memory::MemoryStore, config: &AppConfig) -> Self {
        Self {
            users: Arc::new(UserValidator::new(
                store.clone(),
                TokenHasher::new(&config.hmac_key),
                &config.pepper,
            )),
            tweets: Arc::new(TweetValidator::new(store.clone())),
            tags: Arc::new(TagValidator::new(store.clone())),
            taggings: Arc::new(TaggingValidator::new(store.clone())),
            likes: Arc::new(LikeValidator::new(store.clone())),
            follows: Arc::new(FollowValidator::new(store)),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Services,
}

impl AppState {
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        let services = Services::postgres(db, &config);
        Self {
            config: Arc::new(config),
            services,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        let config = AppConfig::test();
        let services = Services::in_memory(&config);
        Self {
            config: Arc::new(config),
            services,
        }
    }
}
