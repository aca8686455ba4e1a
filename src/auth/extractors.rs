use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::{error::ApiError, users::model::User};

/// The user identified from the session cookie. Rejects with 401 when the
/// request carries no valid session.
pub struct AuthUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError::unauthorized("You must be logged in to perform this action."))
    }
}
