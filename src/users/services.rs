use super::model::User;
use crate::{error::ModelError, state::Services};

/// Recomputes both users' follower and following counts from the Follow
/// rows. Only the counters are written; the in-hand copies just pick up the
/// new values.
pub async fn refresh_follow_counts(
    services: &Services,
    followee: &mut User,
    follower: &mut User,
) -> Result<(), ModelError> {
    for user in [followee, follower] {
        (user.follower_count, user.following_count) =
            services.users.recount_follows(user.id).await?;
    }
    Ok(())
}
