use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;

/// Shown for every error whose cause must not reach the client.
pub const GENERAL_ERROR_MSG: &str =
    "Something went wrong. Please try again, and contact us if the problem persists.";

const PREFIX: &str = "models: ";

/// Errors raised by validators and storage.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("models: resource not found")]
    NotFound,
    #[error("models: incorrect password provided")]
    PasswordIncorrect,
    #[error("models: token provided is not valid")]
    TokenInvalid,

    #[error("models: name is required")]
    NameRequired,
    #[error("models: username is required")]
    UsernameRequired,
    #[error("models: username must begin with a letter")]
    UsernameNoLetter,
    #[error("models: username is already taken")]
    UsernameTaken,
    #[error("models: email address is required")]
    EmailRequired,
    #[error("models: email address is not valid")]
    EmailInvalid,
    #[error("models: email address is already taken")]
    EmailTaken,
    #[error("models: password is required")]
    PasswordRequired,
    #[error("models: password must be at least 8 characters long")]
    PasswordTooShort,
    #[error("models: post is required")]
    PostRequired,

    #[error("models: cannot follow yourself")]
    FollowSelf,
    #[error("models: you have followed this user already")]
    FollowExists,
    #[error("models: tag name already exists")]
    TagExists,
    #[error("models: no special characters allowed")]
    TagNoSpecialChar,
    #[error("models: tag associated with this tweet already exists")]
    TaggingExists,
    #[error("models: you have liked this tweet already")]
    LikeExists,
    #[error("models: you have retweeted this tweet already")]
    RetweetExists,

    // Private: never shown to clients.
    #[error("models: ID provided was invalid")]
    IdInvalid,
    #[error("models: remember token is required")]
    RememberRequired,
    #[error("models: remember token must be at least 32 bytes")]
    RememberTooShort,
    #[error("models: user ID is required")]
    UserIdRequired,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// How a [`ModelError`] is reported over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Unauthorized,
    Internal,
}

impl ModelError {
    pub fn kind(&self) -> ErrorKind {
        use ModelError::*;
        match self {
            NameRequired | UsernameRequired | UsernameNoLetter | EmailRequired | EmailInvalid
            | PasswordRequired | PasswordTooShort | PostRequired | TagNoSpecialChar => {
                ErrorKind::Validation
            }
            UsernameTaken | EmailTaken | FollowSelf | FollowExists | TagExists | TaggingExists
            | LikeExists | RetweetExists => ErrorKind::Conflict,
            NotFound => ErrorKind::NotFound,
            PasswordIncorrect | TokenInvalid => ErrorKind::Unauthorized,
            IdInvalid | RememberRequired | RememberTooShort | UserIdRequired | Database(_)
            | Internal(_) => ErrorKind::Internal,
        }
    }

    /// Client-safe message: the text without its `models: ` prefix and with
    /// the first word capitalized. `None` for private and internal errors.
    pub fn public(&self) -> Option<String> {
        if self.kind() == ErrorKind::Internal {
            return None;
        }
        let text = self.to_string();
        let text = text.strip_prefix(PREFIX).unwrap_or(&text);
        let mut chars = text.chars();
        let first = chars.next()?;
        Some(first.to_uppercase().chain(chars).collect())
    }
}

/// JSON error body: `{code, message, details}`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: Value::Null,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_DATA", message)
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{resource} not found"),
        )
        .with_details(json!({ "resource": resource }))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    pub fn not_author() -> Self {
        Self::unauthorized("You are not authorized to modify this resource")
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "UNPROCESSABLE_ENTITY",
            message,
        )
    }

    /// Logs `err` and answers with the generic message only.
    pub fn internal(err: impl std::fmt::Display) -> Self {
        error!(error = %err, "internal error");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_SERVER_ERROR",
            GENERAL_ERROR_MSG,
        )
    }

    /// Maps a model error, answering `NotFound` with the given resource name.
    pub fn from_model(err: ModelError, resource: &str) -> Self {
        match err {
            ModelError::NotFound => Self::not_found(resource),
            other => other.into(),
        }
    }
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        let kind = err.kind();
        match (kind, err.public()) {
            (ErrorKind::Validation, Some(msg)) => Self::invalid_data(msg),
            (ErrorKind::Conflict, Some(msg)) => Self::unprocessable(msg),
            (ErrorKind::NotFound, _) => Self::not_found("Resource"),
            (ErrorKind::Unauthorized, Some(msg)) => Self::unauthorized(msg),
            _ => Self::internal(err),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid_data(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::invalid_data(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(&self)).into_response()
    }
}
