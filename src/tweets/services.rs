use tracing::{debug, warn};

use super::model::Tweet;
use crate::{
    error::ModelError,
    state::Services,
    tags::{
        model::{Tag, Tagging},
        validator::validate_tag_name,
    },
    text::{missing_from, unique_normalized},
};

/// Normalizes, de-duplicates and validates requested tag names. Blank
/// entries are dropped; any other invalid name rejects the whole set.
pub fn tag_names(requested: &[String]) -> Result<Vec<String>, ModelError> {
    unique_normalized(requested)
        .into_iter()
        .filter(|name| !name.is_empty())
        .map(|name| validate_tag_name(&name))
        .collect()
}

/// Ensures a Tag and a Tagging exist for every name in `tweet.tags`.
/// Existing rows are reused.
pub async fn create_tags(services: &Services, tweet: &Tweet) -> Result<(), ModelError> {
    for name in &tweet.tags {
        let mut tag = Tag::named(name);
        match services.tags.create(&mut tag).await {
            Ok(()) | Err(ModelError::TagExists) => {}
            Err(e) => return Err(e),
        }

        let tagging = Tagging {
            tag_id: tag.id,
            tweet_id: tweet.id,
        };
        match services.taggings.create(&tagging).await {
            Ok(()) | Err(ModelError::TaggingExists) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Replaces the tweet's tags with `requested` (already passed through
/// [`tag_names`]): stale taggings are removed, new ones created.
pub async fn sync_tags(
    services: &Services,
    tweet: &mut Tweet,
    requested: Vec<String>,
) -> Result<(), ModelError> {
    let mut current = Vec::new();
    for tagging in services.taggings.by_tweet(tweet.id).await? {
        match services.tags.by_id(tagging.tag_id).await {
            Ok(tag) => current.push(tag.name),
            Err(e) => {
                warn!(error = %e, tag_id = tagging.tag_id, tweet_id = tweet.id, "skip unresolved tagging");
            }
        }
    }

    for name in missing_from(&current, &requested) {
        let tag = match services.tags.by_name(name).await {
            Ok(tag) => tag,
            Err(e) => {
                warn!(error = %e, tag = name, tweet_id = tweet.id, "skip stale tag");
                continue;
            }
        };
        services.taggings.delete(tag.id, tweet.id).await?;
        debug!(tag = name, tweet_id = tweet.id, "tagging removed");
    }

    tweet.tags = requested;
    create_tags(services, tweet).await
}

/// Fills the derived fields: tag names and, for a retweet, the original.
pub async fn hydrate(services: &Services, tweet: &mut Tweet) -> Result<(), ModelError> {
    tweet.tags = tag_list(services, tweet.id).await?;
    if let Some(original_id) = tweet.retweet_id {
        match services.tweets.by_id(original_id).await {
            Ok(mut original) => {
                original.tags = tag_list(services, original.id).await?;
                tweet.retweet = Some(Box::new(original));
            }
            Err(ModelError::NotFound) => tweet.retweet = None,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

pub async fn hydrate_all(services: &Services, tweets: &mut [Tweet]) -> Result<(), ModelError> {
    for tweet in tweets.iter_mut() {
        hydrate(services, tweet).await?;
    }
    Ok(())
}

async fn tag_list(services: &Services, tweet_id: i64) -> Result<Vec<String>, ModelError> {
    let tags = services.tags.by_tweet(tweet_id).await?;
    Ok(tags.into_iter().map(|t| t.name).collect())
}

/// Recomputes the stored like count from the Like rows.
pub async fn refresh_likes(services: &Services, tweet: &mut Tweet) -> Result<(), ModelError> {
    tweet.likes_count = services.tweets.recount_likes(tweet.id).await?;
    Ok(())
}

/// Recomputes the stored retweet count of an original tweet.
pub async fn refresh_retweets(services: &Services, tweet: &mut Tweet) -> Result<(), ModelError> {
    tweet.retweets_count = services.tweets.recount_retweets(tweet.id).await?;
    Ok(())
}
