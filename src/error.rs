// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use thiserror::Error;

use crate::store::StoreError;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    AuthError(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., joining a full game)
    Conflict(String),

    // 422 Unprocessable Entity (no quiz data to play with)
    Unprocessable(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Coarse classification of [`GameError`], used to pick a response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    DataUnavailable,
    Persistence,
}

/// Failures raised by the game lifecycle, the quiz selector and the session coordinator.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),
    #[error("the winner score is missing")]
    MissingScore,
    #[error("unknown action '{0}'")]
    UnknownAction(String),
    #[error("game {0} does not exist")]
    GameNotFound(i64),
    #[error("game already has two players")]
    GameAlreadyFull,
    #[error("game is no longer pending")]
    GameNotPending,
    #[error("game is already finished")]
    GameAlreadyFinished,
    #[error("no quiz topic available")]
    NoTopicsAvailable,
    #[error("topic '{0}' has no questions")]
    NoQuestionsAvailable(String),
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::MissingParameter(_)
            | GameError::MissingScore
            | GameError::UnknownAction(_) => ErrorKind::Validation,
            GameError::GameNotFound(_) => ErrorKind::NotFound,
            GameError::GameAlreadyFull
            | GameError::GameNotPending
            | GameError::GameAlreadyFinished => ErrorKind::Conflict,
            GameError::NoTopicsAvailable | GameError::NoQuestionsAvailable(_) => {
                ErrorKind::DataUnavailable
            }
            GameError::Persistence(_) => ErrorKind::Persistence,
        }
    }
}

impl From<GameError> for AppError {
    fn from(err: GameError) -> Self {
        let msg = err.to_string();
        match err.kind() {
            ErrorKind::Validation => AppError::BadRequest(msg),
            ErrorKind::NotFound => AppError::NotFound(msg),
            ErrorKind::Conflict => AppError::Conflict(msg),
            ErrorKind::DataUnavailable => AppError::Unprocessable(msg),
            ErrorKind::Persistence => AppError::InternalServerError(msg),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(msg) => AppError::Conflict(msg),
            other => AppError::InternalServerError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_error_kinds() {
        assert_eq!(GameError::MissingScore.kind(), ErrorKind::Validation);
        assert_eq!(GameError::GameNotFound(3).kind(), ErrorKind::NotFound);
        assert_eq!(GameError::GameAlreadyFinished.kind(), ErrorKind::Conflict);
        assert_eq!(GameError::NoTopicsAvailable.kind(), ErrorKind::DataUnavailable);
    }

    #[test]
    fn test_game_error_status_mapping() {
        let resp = AppError::from(GameError::GameAlreadyFull).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = AppError::from(GameError::UnknownAction("dance".into())).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = AppError::from(GameError::NoTopicsAvailable).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let resp = AppError::from(GameError::Persistence(StoreError::Unavailable(
            "down".into(),
        )))
        .into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
