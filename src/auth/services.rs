use tracing::{debug, warn};

use super::{password::verify_password, token::generate_remember_token};
use crate::{
    error::ModelError,
    users::model::{User, UserDb},
};

/// Looks the user up by email and checks the password.
pub async fn authenticate(
    users: &dyn UserDb,
    pepper: &str,
    email: &str,
    password: &str,
) -> Result<User, ModelError> {
    let user = users.by_email(email).await?;
    if !verify_password(password, pepper, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ModelError::PasswordIncorrect);
    }
    Ok(user)
}

/// Returns the raw remember token for the session cookie, issuing and
/// storing a fresh one when the record in hand carries none.
pub async fn sign_in(users: &dyn UserDb, user: &mut User) -> Result<String, ModelError> {
    if user.remember.is_empty() {
        user.remember = generate_remember_token();
        users.update(user).await?;
        debug!(user_id = %user.id, "remember token issued");
    }
    Ok(user.remember.clone())
}

/// Replaces the stored token so any copy of the old cookie stops working.
pub async fn rotate_remember(users: &dyn UserDb, user: &mut User) -> Result<(), ModelError> {
    user.remember = generate_remember_token();
    users.update(user).await
}
