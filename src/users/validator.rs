use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

use super::model::{User, UserDb};
use crate::{
    auth::{
        password::hash_password,
        token::{generate_remember_token, token_len, TokenHasher, REMEMBER_TOKEN_BYTES},
    },
    error::ModelError,
    text::normalize,
};

const PASSWORD_MIN_LEN: usize = 8;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,16}$").unwrap();
}

type UserCheck = fn(&mut User) -> Result<(), ModelError>;

fn run_checks(user: &mut User, checks: &[UserCheck]) -> Result<(), ModelError> {
    for check in checks {
        check(user)?;
    }
    Ok(())
}

/// Normalizes and validates users before they reach `D`.
pub struct UserValidator<D> {
    db: D,
    hasher: TokenHasher,
    pepper: String,
}

impl<D: UserDb> UserValidator<D> {
    pub fn new(db: D, hasher: TokenHasher, pepper: &str) -> Self {
        Self {
            db,
            hasher,
            pepper: pepper.to_string(),
        }
    }

    fn hash_password(&self, user: &mut User) -> Result<(), ModelError> {
        if user.password.is_empty() {
            return Ok(());
        }
        user.password_hash = hash_password(&user.password, &self.pepper)?;
        user.password.clear();
        Ok(())
    }

    fn hmac_remember(&self, user: &mut User) {
        if !user.remember.is_empty() {
            user.remember_hash = self.hasher.hash(&user.remember);
        }
    }

    async fn email_is_avail(&self, user: &User) -> Result<(), ModelError> {
        match self.db.by_email(&user.email).await {
            Ok(existing) if existing.id != user.id => Err(ModelError::EmailTaken),
            Ok(_) | Err(ModelError::NotFound) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn username_is_avail(&self, user: &User) -> Result<(), ModelError> {
        match self.db.by_username(&user.username).await {
            Ok(existing) if existing.id != user.id => Err(ModelError::UsernameTaken),
            Ok(_) | Err(ModelError::NotFound) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn identity_is_avail(&self, user: &User) -> Result<(), ModelError> {
        self.email_is_avail(user).await?;
        self.username_is_avail(user).await
    }
}

#[async_trait]
impl<D: UserDb> UserDb for UserValidator<D> {
    async fn by_id(&self, id: i64) -> Result<User, ModelError> {
        if id <= 0 {
            return Err(ModelError::IdInvalid);
        }
        self.db.by_id(id).await
    }

    async fn by_email(&self, email: &str) -> Result<User, ModelError> {
        let email = normalize(email);
        if email.is_empty() {
            return Err(ModelError::EmailRequired);
        }
        self.db.by_email(&email).await
    }

    async fn by_username(&self, username: &str) -> Result<User, ModelError> {
        self.db.by_username(&normalize(username)).await
    }

    async fn by_remember(&self, token: &str) -> Result<User, ModelError> {
        if token.is_empty() {
            return Err(ModelError::RememberRequired);
        }
        if token_len(token).is_none() {
            return Err(ModelError::TokenInvalid);
        }
        self.db.by_remember(&self.hasher.hash(token)).await
    }

    async fn create(&self, user: &mut User) -> Result<(), ModelError> {
        run_checks(user, &[password_required, password_min_length])?;
        self.hash_password(user)?;
        run_checks(user, &[password_hash_required, set_remember_if_unset, remember_min_bytes])?;
        self.hmac_remember(user);
        run_checks(
            user,
            &[
                remember_hash_required,
                normalize_email,
                email_required,
                email_format,
                normalize_username,
                username_required,
                username_begins_with_letter,
                name_required,
            ],
        )?;
        self.identity_is_avail(user).await?;
        self.db.create(user).await
    }

    async fn update(&self, user: &mut User) -> Result<(), ModelError> {
        run_checks(user, &[password_min_length])?;
        self.hash_password(user)?;
        run_checks(user, &[password_hash_required, remember_min_bytes])?;
        self.hmac_remember(user);
        run_checks(
            user,
            &[
                remember_hash_required,
                normalize_email,
                email_required,
                email_format,
                normalize_username,
                username_required,
                username_begins_with_letter,
                name_required,
            ],
        )?;
        self.identity_is_avail(user).await?;
        self.db.update(user).await
    }

    async fn recount_follows(&self, id: i64) -> Result<(i64, i64), ModelError> {
        if id <= 0 {
            return Err(ModelError::IdInvalid);
        }
        self.db.recount_follows(id).await
    }
}

fn password_required(user: &mut User) -> Result<(), ModelError> {
    if user.password.is_empty() {
        return Err(ModelError::PasswordRequired);
    }
    Ok(())
}

/// An empty password passes: on update it means "keep the stored hash".
fn password_min_length(user: &mut User) -> Result<(), ModelError> {
    if !user.password.is_empty() && user.password.chars().count() < PASSWORD_MIN_LEN {
        return Err(ModelError::PasswordTooShort);
    }
    Ok(())
}

fn password_hash_required(user: &mut User) -> Result<(), ModelError> {
    if user.password_hash.is_empty() {
        return Err(ModelError::PasswordRequired);
    }
    Ok(())
}

fn set_remember_if_unset(user: &mut User) -> Result<(), ModelError> {
    if user.remember.is_empty() {
        user.remember = generate_remember_token();
    }
    Ok(())
}

fn remember_min_bytes(user: &mut User) -> Result<(), ModelError> {
    if user.remember.is_empty() {
        return Ok(());
    }
    match token_len(&user.remember) {
        Some(n) if n >= REMEMBER_TOKEN_BYTES => Ok(()),
        _ => Err(ModelError::RememberTooShort),
    }
}

fn remember_hash_required(user: &mut User) -> Result<(), ModelError> {
    if user.remember_hash.is_empty() {
        return Err(ModelError::RememberRequired);
    }
    Ok(())
}

fn normalize_email(user: &mut User) -> Result<(), ModelError> {
    user.email = normalize(&user.email);
    Ok(())
}

fn email_required(user: &mut User) -> Result<(), ModelError> {
    if user.email.is_empty() {
        return Err(ModelError::EmailRequired);
    }
    Ok(())
}

fn email_format(user: &mut User) -> Result<(), ModelError> {
    if !EMAIL_RE.is_match(&user.email) {
        return Err(ModelError::EmailInvalid);
    }
    Ok(())
}

fn normalize_username(user: &mut User) -> Result<(), ModelError> {
    user.username = normalize(&user.username);
    Ok(())
}

fn username_required(user: &mut User) -> Result<(), ModelError> {
    if user.username.is_empty() {
        return Err(ModelError::UsernameRequired);
    }
    Ok(())
}

fn username_begins_with_letter(user: &mut User) -> Result<(), ModelError> {
    match user.username.chars().next() {
        Some(c) if c.is_alphabetic() => Ok(()),
        _ => Err(ModelError::UsernameNoLetter),
    }
}

fn name_required(user: &mut User) -> Result<(), ModelError> {
    if user.name.trim().is_empty() {
        return Err(ModelError::NameRequired);
    }
    Ok(())
}
