use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use tracing::{debug, warn};

use super::REMEMBER_COOKIE;
use crate::{error::ModelError, state::AppState};

const SKIPPED_PREFIXES: [&str; 2] = ["/assets/", "/images/"];

/// Attaches the user behind the `remember_token` cookie to the request.
/// Never rejects: unknown or missing tokens continue anonymously.
pub async fn identify(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path();
    if SKIPPED_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return next.run(req).await;
    }

    if let Some(cookie) = jar.get(REMEMBER_COOKIE) {
        match state.services.users.by_remember(cookie.value()).await {
            Ok(user) => {
                debug!(user_id = %user.id, "session identified");
                req.extensions_mut().insert(user);
            }
            Err(ModelError::NotFound | ModelError::TokenInvalid | ModelError::RememberRequired) => {
                debug!("remember token matches no user");
            }
            Err(e) => warn!(error = %e, "remember token lookup failed"),
        }
    }

    next.run(req).await
}
