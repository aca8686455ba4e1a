//! In-memory storage used by unit and router tests. Mirrors the unique
//! constraints and cascades of the Postgres schema.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    error::ModelError,
    follows::model::{Follow, FollowDb},
    likes::model::{Like, LikeDb},
    tags::model::{Tag, TagDb, Tagging, TaggingDb},
    tweets::model::{Tweet, TweetDb},
    users::model::{User, UserDb},
};

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: Vec<User>,
    tweets: Vec<Tweet>,
    tags: Vec<Tag>,
    taggings: Vec<Tagging>,
    likes: Vec<Like>,
    follows: Vec<Follow>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn user(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn tweet(&self, id: i64) -> Option<&Tweet> {
        self.tweets.iter().find(|t| t.id == id)
    }

    fn check_user_unique(&self, user: &User) -> Result<(), ModelError> {
        let others = || self.users.iter().filter(|u| u.id != user.id);
        if others().any(|u| u.email == user.email) {
            return Err(ModelError::EmailTaken);
        }
        if others().any(|u| u.username == user.username) {
            return Err(ModelError::UsernameTaken);
        }
        Ok(())
    }

    /// Drops the tweet with its retweets, taggings and likes.
    fn delete_tweet(&mut self, id: i64) {
        let retweets: Vec<i64> = self
            .tweets
            .iter()
            .filter(|t| t.retweet_id == Some(id))
            .map(|t| t.id)
            .collect();
        for retweet in retweets {
            self.delete_tweet(retweet);
        }
        self.tweets.retain(|t| t.id != id);
        self.taggings.retain(|tg| tg.tweet_id != id);
        self.likes.retain(|l| l.tweet_id != id);
    }
}

/// Cloning shares the underlying tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// The stored form of a user: raw password and token never persist.
fn user_row(user: &User) -> User {
    let mut row = user.clone();
    row.password.clear();
    row.remember.clear();
    row
}

fn newest_first(tweets: &mut [Tweet]) {
    tweets.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[async_trait]
impl UserDb for MemoryStore {
    async fn by_id(&self, id: i64) -> Result<User, ModelError> {
        self.lock().user(id).cloned().ok_or(ModelError::NotFound)
    }

    async fn by_email(&self, email: &str) -> Result<User, ModelError> {
        let tables = self.lock();
        tables
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(ModelError::NotFound)
    }

    async fn by_username(&self, username: &str) -> Result<User, ModelError> {
        let tables = self.lock();
        tables
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned()
            .ok_or(ModelError::NotFound)
    }

    async fn by_remember(&self, remember_hash: &str) -> Result<User, ModelError> {
        let tables = self.lock();
        tables
            .users
            .iter()
            .find(|u| u.remember_hash == remember_hash)
            .cloned()
            .ok_or(ModelError::NotFound)
    }

    async fn create(&self, user: &mut User) -> Result<(), ModelError> {
        let mut tables = self.lock();
        tables.check_user_unique(user)?;
        user.id = tables.next_id();
        let now = OffsetDateTime::now_utc();
        user.created_at = now;
        user.updated_at = now;
        tables.users.push(user_row(user));
        Ok(())
    }

    async fn update(&self, user: &mut User) -> Result<(), ModelError> {
        let mut tables = self.lock();
        tables.check_user_unique(user)?;
        let pos = tables
            .users
            .iter()
            .position(|u| u.id == user.id)
            .ok_or(ModelError::NotFound)?;
        let old_username = tables.users[pos].username.clone();
        if old_username != user.username {
            for tweet in tables.tweets.iter_mut().filter(|t| t.username == old_username) {
                tweet.username = user.username.clone();
            }
        }
        user.updated_at = OffsetDateTime::now_utc();
        tables.users[pos] = user_row(user);
        Ok(())
    }

    async fn recount_follows(&self, id: i64) -> Result<(i64, i64), ModelError> {
        let mut tables = self.lock();
        let followers = tables.follows.iter().filter(|f| f.followee_id == id).count() as i64;
        let following = tables.follows.iter().filter(|f| f.follower_id == id).count() as i64;
        let row = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(ModelError::NotFound)?;
        row.follower_count = followers;
        row.following_count = following;
        Ok((followers, following))
    }
}

#[async_trait]
impl TweetDb for MemoryStore {
    async fn by_id(&self, id: i64) -> Result<Tweet, ModelError> {
        self.lock().tweet(id).cloned().ok_or(ModelError::NotFound)
    }

    async fn by_username(&self, username: &str) -> Result<Vec<Tweet>, ModelError> {
        let mut rows: Vec<Tweet> = self
            .lock()
            .tweets
            .iter()
            .filter(|t| t.username == username)
            .cloned()
            .collect();
        newest_first(&mut rows);
        Ok(rows)
    }

    async fn by_username_and_retweet_id(
        &self,
        username: &str,
        retweet_id: i64,
    ) -> Result<Tweet, ModelError> {
        let tables = self.lock();
        tables
            .tweets
            .iter()
            .find(|t| t.username == username && t.retweet_id == Some(retweet_id))
            .cloned()
            .ok_or(ModelError::NotFound)
    }


    async fn create(&self, tweet: &mut Tweet) -> Result<(), ModelError> {
        let mut tables = self.lock();
        if tweet.retweet_id.is_some()
            && tables
                .tweets
                .iter()
                .any(|t| t.username == tweet.username && t.retweet_id == tweet.retweet_id)
        {
            return Err(ModelError::RetweetExists);
        }
        tweet.id = tables.next_id();
        let now = OffsetDateTime::now_utc();
        tweet.created_at = now;
        tweet.updated_at = now;
        let mut row = tweet.clone();
        row.tags.clear();
        row.retweet = None;
        tables.tweets.push(row);
        Ok(())
    }

    async fn update(&self, tweet: &mut Tweet) -> Result<(), ModelError> {
        let mut tables = self.lock();
        let row = tables
            .tweets
            .iter_mut()
            .find(|t| t.id == tweet.id)
            .ok_or(ModelError::NotFound)?;
        tweet.updated_at = OffsetDateTime::now_utc();
        row.post = tweet.post.clone();
        row.updated_at = tweet.updated_at;
        Ok(())
    }

    async fn recount_likes(&self, id: i64) -> Result<i64, ModelError> {
        let mut tables = self.lock();
        let count = tables.likes.iter().filter(|l| l.tweet_id == id).count() as i64;
        let row = tables
            .tweets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(ModelError::NotFound)?;
        row.likes_count = count;
        Ok(count)
    }

    async fn recount_retweets(&self, id: i64) -> Result<i64, ModelError> {
        let mut tables = self.lock();
        let count = tables
            .tweets
            .iter()
            .filter(|t| t.retweet_id == Some(id))
            .count() as i64;
        let row = tables
            .tweets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(ModelError::NotFound)?;
        row.retweets_count = count;
        Ok(count)
    }

    async fn delete(&self, id: i64) -> Result<Tweet, ModelError> {
        let mut tables = self.lock();
        let tweet = tables.tweet(id).cloned().ok_or(ModelError::NotFound)?;
        tables.delete_tweet(id);
        Ok(tweet)
    }
}

#[async_trait]
impl TagDb for MemoryStore {
    async fn by_id(&self, id: i64) -> Result<Tag, ModelError> {
        let tables = self.lock();
        tables
            .tags
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(ModelError::NotFound)
    }

    async fn by_name(&self, name: &str) -> Result<Tag, ModelError> {
        let tables = self.lock();
        tables
            .tags
            .iter()
            .find(|t| t.name == name)
            .cloned()
            .ok_or(ModelError::NotFound)
    }

    async fn by_tweet(&self, tweet_id: i64) -> Result<Vec<Tag>, ModelError> {
        let tables = self.lock();
        let mut tags: Vec<Tag> = tables
            .taggings
            .iter()
            .filter(|tg| tg.tweet_id == tweet_id)
            .filter_map(|tg| tables.tags.iter().find(|t| t.id == tg.tag_id).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn create(&self, tag: &mut Tag) -> Result<(), ModelError> {
        let mut tables = self.lock();
        if tables.tags.iter().any(|t| t.name == tag.name) {
            return Err(ModelError::TagExists);
        }
        tag.id = tables.next_id();
        tables.tags.push(tag.clone());
        Ok(())
    }
}

#[async_trait]
impl TaggingDb for MemoryStore {
    async fn get(&self, tag_id: i64, tweet_id: i64) -> Result<Tagging, ModelError> {
        let tables = self.lock();
        tables
            .taggings
            .iter()
            .find(|tg| tg.tag_id == tag_id && tg.tweet_id == tweet_id)
            .copied()
            .ok_or(ModelError::NotFound)
    }

    async fn by_tweet(&self, tweet_id: i64) -> Result<Vec<Tagging>, ModelError> {
        let tables = self.lock();
        Ok(tables
            .taggings
            .iter()
            .filter(|tg| tg.tweet_id == tweet_id)
            .copied()
            .collect())
    }

    async fn tweets(&self, tag_id: i64) -> Result<Vec<Tweet>, ModelError> {
        let tables = self.lock();
        let mut rows: Vec<Tweet> = tables
            .taggings
            .iter()
            .filter(|tg| tg.tag_id == tag_id)
            .filter_map(|tg| tables.tweet(tg.tweet_id).cloned())
            .collect();
        newest_first(&mut rows);
        Ok(rows)
    }

    async fn create(&self, tagging: &Tagging) -> Result<(), ModelError> {
        let mut tables = self.lock();
        if tables.taggings.contains(tagging) {
            return Err(ModelError::TaggingExists);
        }
        tables.taggings.push(*tagging);
        Ok(())
    }

    async fn delete(&self, tag_id: i64, tweet_id: i64) -> Result<(), ModelError> {
        let mut tables = self.lock();
        let before = tables.taggings.len();
        tables
            .taggings
            .retain(|tg| !(tg.tag_id == tag_id && tg.tweet_id == tweet_id));
        if tables.taggings.len() == before {
            return Err(ModelError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl LikeDb for MemoryStore {
    async fn get(&self, tweet_id: i64, user_id: i64) -> Result<Like, ModelError> {
        let tables = self.lock();
        tables
            .likes
            .iter()
            .find(|l| l.tweet_id == tweet_id && l.user_id == user_id)
            .copied()
            .ok_or(ModelError::NotFound)
    }

    async fn users(&self, tweet_id: i64) -> Result<Vec<User>, ModelError> {
        let tables = self.lock();
        Ok(tables
            .likes
            .iter()
            .filter(|l| l.tweet_id == tweet_id)
            .filter_map(|l| tables.user(l.user_id).cloned())
            .collect())
    }

    async fn liked_tweets(&self, user_id: i64) -> Result<Vec<Tweet>, ModelError> {
        let tables = self.lock();
        Ok(tables
            .likes
            .iter()
            .rev()
            .filter(|l| l.user_id == user_id)
            .filter_map(|l| tables.tweet(l.tweet_id).cloned())
            .collect())
    }

    async fn create(&self, like: &Like) -> Result<(), ModelError> {
        let mut tables = self.lock();
        if tables.likes.contains(like) {
            return Err(ModelError::LikeExists);
        }
        tables.likes.push(*like);
        Ok(())
    }

    async fn delete(&self, tweet_id: i64, user_id: i64) -> Result<(), ModelError> {
        let mut tables = self.lock();
        let before = tables.likes.len();
        tables
            .likes
            .retain(|l| !(l.tweet_id == tweet_id && l.user_id == user_id));
        if tables.likes.len() == before {
            return Err(ModelError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl FollowDb for MemoryStore {
    async fn get(&self, followee_id: i64, follower_id: i64) -> Result<Follow, ModelError> {
        let tables = self.lock();
        tables
            .follows
            .iter()
            .find(|f| f.followee_id == followee_id && f.follower_id == follower_id)
            .copied()
            .ok_or(ModelError::NotFound)
    }

    async fn followers(&self, user_id: i64) -> Result<Vec<User>, ModelError> {
        let tables = self.lock();
        Ok(tables
            .follows
            .iter()
            .rev()
            .filter(|f| f.followee_id == user_id)
            .filter_map(|f| tables.user(f.follower_id).cloned())
            .collect())
    }

    async fn following(&self, user_id: i64) -> Result<Vec<User>, ModelError> {
        let tables = self.lock();
        Ok(tables
            .follows
            .iter()
            .rev()
            .filter(|f| f.follower_id == user_id)
            .filter_map(|f| tables.user(f.followee_id).cloned())
            .collect())
    }

    async fn create(&self, follow: &Follow) -> Result<(), ModelError> {
        let mut tables = self.lock();
        if tables.follows.contains(follow) {
            return Err(ModelError::FollowExists);
        }
        tables.follows.push(*follow);
        Ok(())
    }

    async fn delete(&self, followee_id: i64, follower_id: i64) -> Result<(), ModelError> {
        let mut tables = self.lock();
        let before = tables.follows.len();
        tables
            .follows
            .retain(|f| !(f.followee_id == followee_id && f.follower_id == follower_id));
        if tables.follows.len() == before {
            return Err(ModelError::NotFound);
        }
        Ok(())
    }
}
