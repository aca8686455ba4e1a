use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::{info, instrument};

use super::{
    dto::{LoginForm, SignUpForm},
    extractors::AuthUser,
    services::{authenticate, rotate_remember, sign_in},
    REMEMBER_COOKIE,
};
use crate::{
    error::ApiError,
    state::AppState,
    users::model::User,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

fn remember_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((REMEMBER_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .build()
}

#[instrument(skip(state, jar, payload))]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<SignUpForm>, JsonRejection>,
) -> Result<(CookieJar, Json<User>), ApiError> {
    let Json(form) = payload?;
    let mut user = User::new(&form.name, &form.username, &form.email, &form.password);
    state.services.users.create(&mut user).await?;

    let token = sign_in(state.services.users.as_ref(), &mut user).await?;
    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((
        jar.add(remember_cookie(token, state.config.is_prod())),
        Json(user),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginForm>, JsonRejection>,
) -> Result<(CookieJar, Json<User>), ApiError> {
    let Json(form) = payload?;
    let mut user = authenticate(
        state.services.users.as_ref(),
        &state.config.pepper,
        &form.email,
        &form.password,
    )
    .await
    .map_err(|e| ApiError::from_model(e, "Email"))?;

    let token = sign_in(state.services.users.as_ref(), &mut user).await?;
    info!(user_id = %user.id, "user logged in");
    Ok((
        jar.add(remember_cookie(token, state.config.is_prod())),
        Json(user),
    ))
}

#[instrument(skip(state, jar, user))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    AuthUser(mut user): AuthUser,
) -> Result<(StatusCode, CookieJar), ApiError> {
    let jar = jar.remove(Cookie::build(REMEMBER_COOKIE).path("/"));
    rotate_remember(state.services.users.as_ref(), &mut user).await?;
    info!(user_id = %user.id, "user logged out");
    Ok((StatusCode::NO_CONTENT, jar))
}
